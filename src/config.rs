//! Server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "calendar_data";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (`CALFEED_PORT`)
    pub port: u16,
    /// Directory holding per-user event records (`CALFEED_DATA_DIR`)
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from the environment, reading `.env` if present.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let port = match env::var("CALFEED_PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("CALFEED_PORT must be a port number, got '{value}'"))?,
            Err(_) => DEFAULT_PORT,
        };

        let data_dir = env::var("CALFEED_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(ServerConfig { port, data_dir })
    }
}
