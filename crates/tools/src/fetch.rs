//! Content fetcher: URL in, cleaned [`Document`] out.
//!
//! Fetching never fails upward. Transport errors, bad statuses and pages
//! without readable text all come back as placeholder documents with
//! `is_error` set, so one bad URL cannot sink a batch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use sourcer_config::FetchConfig;
use sourcer_core::document::Document;
use sourcer_core::error::Error;
use sourcer_core::search::Fetcher;
use tracing::{debug, warn};
use url::Url;

use crate::html::{clean_html, extract_title};

/// HTTP page fetcher with a per-request timeout and a browser-like identity.
pub struct ContentFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl ContentFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            client,
            max_chars: config.max_chars,
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, Error> {
        let fail = |reason: String| Error::Fetch { url: url.to_string(), reason };

        Url::parse(url).map_err(|e| fail(format!("invalid URL: {e}")))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            fail(if e.is_timeout() { "request timed out".to_string() } else { e.to_string() })
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| fail(format!("failed to read response body: {e}")))
    }

    /// Cleaned text and page title, or the reason there is none.
    async fn load(&self, url: &str) -> Result<(String, Option<String>), Error> {
        let html = self.fetch_html(url).await?;
        let text = clean_html(&html, self.max_chars);
        if text.is_empty() {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: "no readable text".into(),
            });
        }
        Ok((text, extract_title(&html)))
    }
}

#[async_trait]
impl Fetcher for ContentFetcher {
    async fn fetch(&self, url: &str, title: Option<&str>) -> Document {
        let title = title.filter(|t| !t.is_empty()).map(str::to_string);

        match self.load(url).await {
            Ok((text, page_title)) => {
                debug!(url, chars = text.chars().count(), "Fetched page");
                Document::fetched(url, title.or(page_title), text)
            }
            Err(e) => {
                warn!(url, error = %e, "Fetch failed");
                Document::from_error(url, title, &e)
            }
        }
    }
}
