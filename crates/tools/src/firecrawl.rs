//! Firecrawl search provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sourcer_core::error::SearchError;
use sourcer_core::search::{SearchProvider, SearchResult};
use tracing::debug;

use crate::http::{build_client, check_status, send_error};

pub const DEFAULT_FIRECRAWL_URL: &str = "https://api.firecrawl.dev";

/// Firecrawl `/v1/search` client. Query expansion is not supported by the
/// API, so `auto_expand` is ignored.
pub struct FirecrawlSearchProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl FirecrawlSearchProvider {
    pub fn new(api_key: Option<String>, base_url: Option<&str>, timeout: Duration) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_FIRECRAWL_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key,
            client: build_client(timeout),
        }
    }
}

#[async_trait]
impl SearchProvider for FirecrawlSearchProvider {
    fn name(&self) -> &str {
        "firecrawl"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        _auto_expand: bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SearchError::NotConfigured("FIRECRAWL_API_KEY is not set".into()))?;

        debug!(max_results, "Sending Firecrawl search request");

        let response = self
            .client
            .post(format!("{}/v1/search", self.base_url))
            .bearer_auth(api_key)
            .json(&serde_json::json!({ "query": query, "limit": max_results }))
            .send()
            .await
            .map_err(send_error)?;
        let response = check_status(response).await?;

        let parsed: FirecrawlResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        if !parsed.success {
            return Err(SearchError::InvalidResponse(
                parsed.error.unwrap_or_else(|| "search unsuccessful".into()),
            ));
        }

        Ok(parsed
            .data
            .into_iter()
            .take(max_results)
            .map(|hit| SearchResult {
                title: hit.title.unwrap_or_default(),
                url: hit.url,
                snippet: hit.description.unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Vec<FirecrawlHit>,
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct FirecrawlHit {
    url: String,
    title: Option<String>,
    description: Option<String>,
}
