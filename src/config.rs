use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            database_url: get("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_or(&get, "RUN_MIGRATIONS", true)?,

            rate_api_per_min: parse_or(&get, "RATE_API_PER_MIN", 1000)?,

            api_prefix: get("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            log_dir: get("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&get, "LOG_LEVEL", Level::DEBUG)?,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
