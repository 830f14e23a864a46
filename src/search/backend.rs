use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::media::SearchResultSet;

/// Where the palette sends committed queries.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResultSet>;
}

/// Calls the server's `/api/search` endpoint.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: Client,
    base_url: String,
}

impl HttpSearchBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let user_agent = format!("marquee-palette/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .user_agent(user_agent)
            .build()
            .context("Failed to build search HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/api/search?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str) -> Result<SearchResultSet> {
        let url = self.search_url(query);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("search request failed")?;
        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!(
                "Error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }
        res.json::<SearchResultSet>()
            .await
            .context("search response was not a result set")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        let backend = HttpSearchBackend::new("http://localhost:3146/").unwrap();
        assert_eq!(
            backend.search_url("star wars"),
            "http://localhost:3146/api/search?query=star%20wars"
        );
    }
}
