//! Web Search Client: provider search, then a bounded parallel fetch of
//! every hit.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use serde_json::json;
use sourcer_config::AppConfig;
use sourcer_core::document::Document;
use sourcer_core::error::SearchError;
use sourcer_core::event::{LogLevel, StructuredLogger, metadata, query_sample};
use sourcer_core::search::{Fetcher, SearchProvider, SearchResult};
use tracing::info;

use crate::exa::ExaSearchProvider;
use crate::firecrawl::FirecrawlSearchProvider;

const MODULE: &str = "WebSearcher";
const SUMMARY_HEADER: &str = "## Search results";
const SNIPPET_WORDS: usize = 50;

/// What one search produced.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Markdown list of the hits, or the "no results" message.
    pub summary: String,
    /// Hits in provider rank order.
    pub results: Vec<SearchResult>,
    /// One document per hit, same order, failed fetches included.
    pub documents: Vec<Document>,
}

/// Runs a search and fetches every hit.
pub struct WebSearcher {
    provider: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn Fetcher>,
    logger: Arc<dyn StructuredLogger>,
    max_results: usize,
    auto_expand: bool,
    concurrency: usize,
}

impl WebSearcher {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn Fetcher>,
        logger: Arc<dyn StructuredLogger>,
    ) -> Self {
        Self {
            provider,
            fetcher,
            logger,
            max_results: 3,
            auto_expand: true,
            concurrency: 4,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_auto_expand(mut self, auto_expand: bool) -> Self {
        self.auto_expand = auto_expand;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Search, then fetch all hits.
    ///
    /// A provider failure is logged and reported as zero results.
    pub async fn execute(&self, query: &str) -> SearchOutcome {
        let results = match self.provider.search(query, self.max_results, self.auto_expand).await {
            Ok(results) => results,
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    "Search provider error",
                    MODULE,
                    metadata([
                        ("provider", json!(self.provider.name())),
                        ("error", json!(e.to_string())),
                        ("query_sample", json!(query_sample(query))),
                    ]),
                );
                Vec::new()
            }
        };

        if results.is_empty() {
            return SearchOutcome {
                summary: no_results_message(query),
                ..SearchOutcome::default()
            };
        }

        info!(provider = self.provider.name(), hits = results.len(), "Search returned results");

        let documents = self.fetch_all(&results).await;
        SearchOutcome {
            summary: format_results(&results),
            results,
            documents,
        }
    }

    /// Fetch every hit, at most `concurrency` at a time, keeping rank order.
    pub async fn fetch_all(&self, results: &[SearchResult]) -> Vec<Document> {
        let width = self.concurrency.min(results.len()).max(1);
        let fetches: Vec<_> = results
            .iter()
            .map(|hit| {
                let title = (!hit.title.is_empty()).then_some(hit.title.as_str());
                self.fetcher.fetch(&hit.url, title)
            })
            .collect();
        let documents: Vec<Document> = stream::iter(fetches)
        .buffered(width)
        .collect()
        .await;

        for doc in documents.iter().filter(|d| d.is_error) {
            self.logger.log(
                LogLevel::Warning,
                "Fetch failed",
                MODULE,
                metadata([("url", json!(doc.source)), ("content", json!(doc.content))]),
            );
        }

        documents
    }
}

/// The summary returned when a search yields nothing.
pub fn no_results_message(query: &str) -> String {
    format!("{SUMMARY_HEADER}\n\nNo results found for \"{query}\".")
}

/// Render hits as a numbered markdown list with short excerpts.
pub fn format_results(results: &[SearchResult]) -> String {
    let entries: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let title = if hit.title.trim().is_empty() { "Untitled" } else { hit.title.trim() };
            format!("{}. [{}]({})\n{}", i + 1, title, hit.url, excerpt(&hit.snippet))
        })
        .collect();
    format!("{SUMMARY_HEADER}\n\n{}", entries.join("\n\n"))
}

fn excerpt(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(SNIPPET_WORDS).collect();
    if words.is_empty() {
        "No text content available".to_string()
    } else {
        format!("{}...", words.join(" "))
    }
}

/// Build the search provider named in the configuration.
pub fn build_search_provider(config: &AppConfig) -> Result<Arc<dyn SearchProvider>, SearchError> {
    let search = &config.search;
    let timeout = Duration::from_secs(search.timeout_secs);
    let base_url = search.base_url.as_deref();
    match search.provider.as_str() {
        "exa" => Ok(Arc::new(ExaSearchProvider::new(search.api_key.clone(), base_url, timeout))),
        "firecrawl" => Ok(Arc::new(FirecrawlSearchProvider::new(
            search.api_key.clone(),
            base_url,
            timeout,
        ))),
        other => Err(SearchError::NotConfigured(format!("unknown search provider '{other}'"))),
    }
}
