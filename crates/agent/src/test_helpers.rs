//! Scripted collaborators for agent and orchestrator tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sourcer_config::AppConfig;
use sourcer_core::agent::{Agent, AgentType};
use sourcer_core::document::Document;
use sourcer_core::error::{Error, ProviderError, Result, SearchError};
use sourcer_core::event::EventBus;
use sourcer_core::message::Message;
use sourcer_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
use sourcer_core::search::{Fetcher, SearchProvider, SearchResult};

use crate::context::AgentContext;
use crate::orchestrator::AgentFactory;

/// Returns scripted completions in order and letter-frequency embeddings.
///
/// Every request is recorded so tests can inspect prompts.
pub struct MockProvider {
    replies: Mutex<VecDeque<String>>,
    fail_complete: bool,
    fail_embed: bool,
    requests: Mutex<Vec<ProviderRequest>>,
    embed_calls: AtomicUsize,
}

impl MockProvider {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fail_complete: false,
            fail_embed: false,
            requests: Mutex::new(Vec::new()),
            embed_calls: AtomicUsize::new(0),
        }
    }

    /// Completions fail; embeddings still work.
    pub fn failing() -> Self {
        Self {
            fail_complete: true,
            ..Self::with_replies(Vec::<String>::new())
        }
    }

    /// Embeddings fail; completions come from `replies`.
    pub fn failing_embeddings<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_embed: true,
            ..Self::with_replies(replies)
        }
    }

    pub fn complete_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

pub fn letter_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0; 26];
    for c in text.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
        v[(c - b'a') as usize] += 1.0;
    }
    v
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if self.fail_complete {
            return Err(ProviderError::Network("model unreachable".into()));
        }
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::InvalidResponse("no more scripted replies".into()))?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }

    async fn embed(&self, request: EmbeddingRequest) -> std::result::Result<EmbeddingResponse, ProviderError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_embed {
            return Err(ProviderError::Network("embedder unreachable".into()));
        }
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|t| letter_embedding(t)).collect(),
            model: request.model,
        })
    }
}

/// Search provider returning a fixed outcome.
pub struct ScriptedSearch {
    outcome: std::result::Result<Vec<SearchResult>, SearchError>,
    calls: AtomicUsize,
}

impl ScriptedSearch {
    pub fn results(results: Vec<SearchResult>) -> Self {
        Self { outcome: Ok(results), calls: AtomicUsize::new(0) }
    }

    pub fn failing(error: SearchError) -> Self {
        Self { outcome: Err(error), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(
        &self,
        _query: &str,
        max_results: usize,
        _auto_expand: bool,
    ) -> std::result::Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map(|mut results| {
            results.truncate(max_results);
            results
        })
    }
}

/// Serves page text by URL; unknown URLs fail.
pub struct MapFetcher {
    pages: HashMap<String, String>,
}

impl MapFetcher {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, text)| (url.to_string(), text.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl Fetcher for MapFetcher {
    async fn fetch(&self, url: &str, title: Option<&str>) -> Document {
        let title = title.map(str::to_string);
        match self.pages.get(url) {
            Some(text) => Document::fetched(url, title, text.clone()),
            None => Document::failed(url, title, "HTTP 404 Not Found"),
        }
    }
}

pub fn hit(title: &str, url: &str, snippet: &str) -> SearchResult {
    SearchResult {
        title: title.into(),
        url: url.into(),
        snippet: snippet.into(),
    }
}

/// A context over scripted collaborators with default configuration.
pub fn test_context(
    provider: Arc<MockProvider>,
    search: Arc<ScriptedSearch>,
    fetcher: Arc<MapFetcher>,
    bus: Arc<EventBus>,
) -> AgentContext {
    AgentContext {
        config: Arc::new(AppConfig::default()),
        logger: bus,
        generator: provider.clone(),
        embedder: provider,
        search,
        fetcher,
    }
}

/// Agent that echoes its input, or fails when built to.
pub struct EchoAgent {
    kind: AgentType,
    fail: bool,
}

#[async_trait]
impl Agent for EchoAgent {
    fn kind(&self) -> AgentType {
        self.kind
    }

    async fn query(&self, input: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Internal("agent exploded".into()));
        }
        Ok(format!("{}: {input}", self.kind))
    }
}

/// Factory that counts constructions per type.
#[derive(Default)]
pub struct CountingFactory {
    builds: Mutex<HashMap<AgentType, usize>>,
    failing_agents: bool,
    failing_construction: bool,
}

impl CountingFactory {
    pub fn failing_agents() -> Self {
        Self { failing_agents: true, ..Self::default() }
    }

    pub fn failing_construction() -> Self {
        Self { failing_construction: true, ..Self::default() }
    }

    pub fn builds(&self, kind: AgentType) -> usize {
        self.builds.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_builds(&self) -> usize {
        self.builds.lock().unwrap().values().sum()
    }
}

impl AgentFactory for CountingFactory {
    fn build(&self, kind: AgentType) -> Result<Arc<dyn Agent>> {
        *self.builds.lock().unwrap().entry(kind).or_default() += 1;
        if self.failing_construction {
            return Err(Error::Config { message: "missing model".into() });
        }
        Ok(Arc::new(EchoAgent { kind, fail: self.failing_agents }))
    }
}
