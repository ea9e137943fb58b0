use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://roomkeep.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 16;
pub const DEFAULT_SESSION_IDLE_MINUTES: i64 = 60;

/// Settings read from the environment, with `.env` loaded first when present.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub session_idle: time::Duration,
    /// Browser origin allowed to call the API with credentials.
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            session_idle: time::Duration::minutes(DEFAULT_SESSION_IDLE_MINUTES),
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url = dotenv::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = dotenv::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .with_context(|| "parse BIND_ADDR")?;
        let max_connections = match dotenv::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().with_context(|| "parse DB_MAX_CONNECTIONS")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        let session_idle = match dotenv::var("SESSION_IDLE_MINUTES") {
            Ok(value) => value.parse().with_context(|| "parse SESSION_IDLE_MINUTES")?,
            Err(_) => DEFAULT_SESSION_IDLE_MINUTES,
        };
        let cors_origin = dotenv::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty());

        Ok(Config {
            database_url,
            bind_addr,
            max_connections,
            session_idle: time::Duration::minutes(session_idle),
            cors_origin,
        })
    }
}
