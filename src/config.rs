use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub lookup: LookupConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://food_record.db?mode=rwc".into());
        let max_connections = env_parse("DB_MAX_CONNECTIONS", 5)?;
        let lookup = LookupConfig {
            base_url: std::env::var("LOOKUP_BASE_URL")
                .unwrap_or_else(|_| "https://www.eatsmart.jp".into()),
            timeout_ms: env_parse("LOOKUP_TIMEOUT_MS", 5_000)?,
            user_agent: std::env::var("LOOKUP_USER_AGENT")
                .unwrap_or_else(|_| "food-recorder/0.1".into()),
        };
        Ok(Self {
            database_url,
            max_connections,
            lookup,
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("parse {key}={v}")),
        Err(_) => Ok(default),
    }
}
