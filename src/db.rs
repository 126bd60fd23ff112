use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout())
        .connect(&cfg.url)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    tracing::info!("migrations applied");
    Ok(())
}
