use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::info;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

/// Runtime settings shared by the gateway and the server.
///
/// Built once at startup; nothing below this reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn new(tmdb_api_key: impl Into<String>) -> Self {
        Self {
            tmdb_api_key: tmdb_api_key.into(),
            tmdb_base_url: DEFAULT_TMDB_BASE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3146))),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let mut config = Self::new(api_key);

        if let Ok(base) = env::var("TMDB_BASE_URL") {
            if !base.trim().is_empty() {
                config.tmdb_base_url = base.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("BIND_ADDR is not a socket address: {addr}"))?;
        }

        info!(
            base_url = %config.tmdb_base_url,
            bind_addr = %config.bind_addr,
            "Configuration loaded"
        );
        Ok(config)
    }
}
