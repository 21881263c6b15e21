//! Environment-driven configuration, loaded once at startup.

use anyhow::Context;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Base URL that image references are resolved against.
    pub asset_base_url: String,
    pub store_name: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8083".to_string())
            .parse()
            .context("PORT must be a valid port number")?;
        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("MAX_DB_CONNECTIONS must be a number")?;
        Ok(Self {
            port,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections,
            asset_base_url: env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            store_name: env::var("STORE_NAME").unwrap_or_else(|_| "Storefront".to_string()),
        })
    }
}
