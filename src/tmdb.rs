use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/500x750?text=No+Image+Available";
pub const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?";

/// Size tokens understood by the image host, four per imagery kind.
#[derive(Debug, Clone, Copy)]
pub struct ImageSizes {
    pub small: &'static str,
    pub medium: &'static str,
    pub large: &'static str,
    pub original: &'static str,
}

pub const POSTER_SIZES: ImageSizes = ImageSizes {
    small: "w185",
    medium: "w342",
    large: "w500",
    original: "original",
};

pub const BACKDROP_SIZES: ImageSizes = ImageSizes {
    small: "w300",
    medium: "w780",
    large: "w1280",
    original: "original",
};

pub const PROFILE_SIZES: ImageSizes = ImageSizes {
    small: "w45",
    medium: "w185",
    large: "h632",
    original: "original",
};

/// Builds an image URL from a relative upstream path; missing paths map to the placeholder.
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{IMAGE_BASE}/{size}{p}"),
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// The single seam between the gateway and the upstream media API.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// GET `path` (relative to the API base) with extra query parameters and return the JSON body.
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.tmdb_api_key.trim().is_empty() {
            return Err(anyhow!("TMDB API key cannot be empty"));
        }
        let user_agent = format!("marquee/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: config.tmdb_api_key.clone(),
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = %path, "TMDB request");

        let mut query: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let res = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", path, status, text));
        }
        let parsed: Value = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}
