//! Web retrieval for Sourcer.
//!
//! - [`WebSearcher`]: the Web Search Client (provider search plus fetch)
//! - [`ExaSearchProvider`] / [`FirecrawlSearchProvider`]: search backends
//! - [`ContentFetcher`]: URL to cleaned, bounded plain text

pub mod exa;
pub mod fetch;
pub mod firecrawl;
pub mod html;
mod http;
pub mod searcher;

#[cfg(test)]
mod test_server;

pub use exa::ExaSearchProvider;
pub use fetch::ContentFetcher;
pub use firecrawl::FirecrawlSearchProvider;
pub use searcher::{SearchOutcome, WebSearcher, build_search_provider, format_results, no_results_message};
