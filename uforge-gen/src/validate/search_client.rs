//! Custom-search API client
//!
//! Queries a Google Custom Search style endpoint (key, cx, q) and maps the
//! result items to search hits. A response without items is an empty hit
//! list, not an error.

use crate::error::SearchError;
use crate::rate_limit::RateLimiter;
use crate::types::{SearchHit, SearchOracle};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use uforge_common::config::SearchConfig;

/// Default timeout for search requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Search oracle backed by a custom-search endpoint
pub struct CseSearchClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
    rate_limiter: RateLimiter,
}

impl CseSearchClient {
    pub fn new(
        config: &SearchConfig,
        api_key: String,
        engine_id: String,
    ) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
            engine_id,
            rate_limiter: RateLimiter::new(config.rate_limit_ms),
        })
    }
}

#[async_trait]
impl SearchOracle for CseSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.rate_limiter.wait().await;

        debug!(query, "Querying search engine");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(status.as_u16(), body));
        }

        let parsed: CseResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(parsed
            .items
            .into_iter()
            .map(|item| SearchHit {
                title: item.title,
                snippet: item.snippet,
                url: item.link,
            })
            .collect())
    }
}

// ============================================================================
// Custom Search API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct CseResponse {
    /// Absent entirely when the query has no results
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}
