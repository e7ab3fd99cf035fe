//! The collaborators every agent is built from.
//!
//! One [`AgentContext`] is constructed at startup and handed to the
//! orchestrator; agents take what they need from it. There is no global
//! logger or registry.

use std::sync::Arc;

use sourcer_config::AppConfig;
use sourcer_core::error::{Error, Result};
use sourcer_core::event::StructuredLogger;
use sourcer_core::provider::Provider;
use sourcer_core::search::{Fetcher, SearchProvider};
use sourcer_tools::{ContentFetcher, build_search_provider};

#[derive(Clone)]
pub struct AgentContext {
    pub config: Arc<AppConfig>,
    pub logger: Arc<dyn StructuredLogger>,
    /// Text generation backend.
    pub generator: Arc<dyn Provider>,
    /// Embedding backend.
    pub embedder: Arc<dyn Provider>,
    pub search: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AgentContext {
    /// Wire the HTTP-backed collaborators named in `config`.
    pub fn from_config(config: AppConfig, logger: Arc<dyn StructuredLogger>) -> Result<Self> {
        let provider = sourcer_providers::build_from_config(&config).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        let search = build_search_provider(&config)?;
        let fetcher = Arc::new(ContentFetcher::new(&config.fetch));

        Ok(Self {
            config: Arc::new(config),
            logger,
            generator: provider.clone(),
            embedder: provider,
            search,
            fetcher,
        })
    }
}
