use std::sync::Arc;

mod app;
mod config;
mod db;
mod error;
mod meals;
mod session;
mod state;

use crate::{config::AppConfig, meals::repo::PgMealStore, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "dailydiet=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config.db).await?;
    db::migrate(&pool).await?;

    let state = AppState::from_parts(Arc::new(PgMealStore::new(pool)), config.clone());
    app::serve(app::build_app(state), &config).await
}
