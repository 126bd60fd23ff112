use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub max_age_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_age_days: 30 }
    }
}

impl SessionConfig {
    pub fn max_age(&self) -> time::Duration {
        time::Duration::days(self.max_age_days)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db = DbConfig {
            url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", 5),
        };
        let session = SessionConfig {
            max_age_days: env_or("SESSION_MAX_AGE_DAYS", 30),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 3333),
            db,
            session,
        })
    }
}

impl DbConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
