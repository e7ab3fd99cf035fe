//! Web search and page fetching seams.
//!
//! The [`SearchProvider`] returns ranked hits for a query; the [`Fetcher`]
//! turns a URL into a [`Document`]. Both are implemented over HTTP in
//! `sourcer-tools` and by scripted stand-ins in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::document::Document;
use crate::error::SearchError;

/// A single ranked hit from the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Short text excerpt. Empty when the provider returned no text.
    #[serde(default)]
    pub snippet: String,
}

/// External search backend (Exa, Firecrawl, ...).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// A human-readable name for this provider.
    fn name(&self) -> &str;

    /// Run a search. Results come back in provider rank order.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        auto_expand: bool,
    ) -> std::result::Result<Vec<SearchResult>, SearchError>;
}

/// Retrieves and cleans a page.
///
/// Never fails: a fetch or parse error yields a placeholder document with
/// `is_error` set.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, title: Option<&str>) -> Document;
}
