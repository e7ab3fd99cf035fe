//! Exa neural search provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sourcer_core::error::SearchError;
use sourcer_core::search::{SearchProvider, SearchResult};
use tracing::debug;

use crate::http::{build_client, check_status, send_error};

pub const DEFAULT_EXA_URL: &str = "https://api.exa.ai";

/// Exa `/search` client. Requests page text with each hit so the summary
/// can show an excerpt before any page is fetched.
pub struct ExaSearchProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExaSearchProvider {
    pub fn new(api_key: Option<String>, base_url: Option<&str>, timeout: Duration) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_EXA_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key,
            client: build_client(timeout),
        }
    }
}

#[async_trait]
impl SearchProvider for ExaSearchProvider {
    fn name(&self) -> &str {
        "exa"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        auto_expand: bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SearchError::NotConfigured("EXA_API_KEY is not set".into()))?;

        let body = serde_json::json!({
            "query": query,
            "numResults": max_results,
            "useAutoprompt": auto_expand,
            "contents": { "text": { "includeHtmlTags": false } },
        });

        debug!(max_results, auto_expand, "Sending Exa search request");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;
        let response = check_status(response).await?;

        let parsed: ExaResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|hit| SearchResult {
                title: hit.title.unwrap_or_default(),
                url: hit.url,
                snippet: hit.text.unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaHit>,
}

#[derive(Debug, Deserialize)]
struct ExaHit {
    url: String,
    title: Option<String>,
    text: Option<String>,
}
