//! Search agent: search, fetch, retrieve, synthesize, assemble.
//!
//! Only the search itself can short-circuit the pipeline. Retrieval
//! failures fall back to the search summary and generation failures to an
//! empty synthesis, so a query with results always gets an answer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use sourcer_core::agent::{Agent, AgentType};
use sourcer_core::document::Document;
use sourcer_core::error::Result;
use sourcer_core::event::{LogLevel, StructuredLogger, metadata, query_sample};
use sourcer_rag::{RagEngine, ScoredChunk};
use sourcer_tools::WebSearcher;
use tracing::info;

use crate::context::AgentContext;
use crate::response::{SourceEntry, assemble, source_entries};
use crate::synthesis::Summarizer;

const MODULE: &str = "SearchAgent";

pub struct SearchAgent {
    searcher: WebSearcher,
    rag: RagEngine,
    summarizer: Summarizer,
    logger: Arc<dyn StructuredLogger>,
}

impl SearchAgent {
    pub fn new(ctx: &AgentContext) -> Self {
        let config = &ctx.config;
        let searcher = WebSearcher::new(ctx.search.clone(), ctx.fetcher.clone(), ctx.logger.clone())
            .with_max_results(config.search.max_results)
            .with_auto_expand(config.search.auto_expand)
            .with_concurrency(config.fetch.concurrency);

        Self {
            searcher,
            rag: RagEngine::from_config(ctx.embedder.clone(), config),
            summarizer: Summarizer::from_context(ctx),
            logger: ctx.logger.clone(),
        }
    }

    async fn retrieve(&self, documents: &[Document], query: &str) -> Result<Vec<ScoredChunk>> {
        let index = self.rag.build_index(documents).await?;
        self.rag.search(&index, query, self.rag.default_k()).await
    }

    async fn synthesize(&self, summary: &str, sources: &[SourceEntry], query: &str) -> (String, usize) {
        let rendered: Vec<String> = sources.iter().map(SourceEntry::render).collect();
        let combined = format!("{summary}\n\n{}", rendered.join("\n"));
        let prompt_chars = self.summarizer.prompt(&combined).chars().count();

        match self.summarizer.summarize(&combined).await {
            Ok(text) => (text, prompt_chars),
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    "Synthesis failed",
                    MODULE,
                    metadata([
                        ("error", json!(e.to_string())),
                        ("query_sample", json!(query_sample(query))),
                    ]),
                );
                (String::new(), prompt_chars)
            }
        }
    }
}

#[async_trait]
impl Agent for SearchAgent {
    fn kind(&self) -> AgentType {
        AgentType::Search
    }

    async fn query(&self, input: &str) -> Result<String> {
        info!(query_chars = input.len(), "Search agent started");

        let outcome = self.searcher.execute(input).await;
        if outcome.documents.is_empty() {
            self.logger.log(
                LogLevel::Warning,
                "No documents found",
                MODULE,
                metadata([("query_sample", json!(query_sample(input)))]),
            );
            return Ok(outcome.summary);
        }

        let retrieved = match self.retrieve(&outcome.documents, input).await {
            Ok(chunks) => chunks,
            Err(e) => {
                self.logger.log(
                    LogLevel::Warning,
                    "Retrieval failed, returning search summary",
                    MODULE,
                    metadata([
                        ("error", json!(e.to_string())),
                        ("query_sample", json!(query_sample(input))),
                    ]),
                );
                return Ok(outcome.summary);
            }
        };

        let sources = source_entries(&outcome.documents, &retrieved);
        let (synthesis, prompt_chars) = self.synthesize(&outcome.summary, &sources, input).await;
        let response = assemble(&synthesis, &sources);

        self.logger.log(
            LogLevel::Info,
            "interaction completed",
            MODULE,
            metadata([
                ("query_sample", json!(query_sample(input))),
                ("prompt_chars", json!(prompt_chars)),
                ("response_chars", json!(response.chars().count())),
                ("sources", json!(sources.len())),
            ]),
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use sourcer_core::error::SearchError;
    use sourcer_core::event::{EventBus, LogRecord};
    use sourcer_tools::no_results_message;

    const PARIS: &str = "Paris is the capital and largest city of France.";
    const LYON: &str = "Lyon is the third largest city in France.";

    fn france_search() -> Arc<ScriptedSearch> {
        Arc::new(ScriptedSearch::results(vec![
            hit("Paris", "https://en.wikipedia.org/wiki/Paris", "Paris is the capital of France."),
            hit("Dead link", "https://gone.example/france", "Unavailable page."),
            hit("Lyon", "https://en.wikipedia.org/wiki/Lyon", "Lyon is a city."),
        ]))
    }

    fn france_pages() -> Arc<MapFetcher> {
        Arc::new(MapFetcher::new([
            ("https://en.wikipedia.org/wiki/Paris", PARIS),
            ("https://en.wikipedia.org/wiki/Lyon", LYON),
        ]))
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<Arc<LogRecord>>) -> Vec<Arc<LogRecord>> {
        let mut records = Vec::new();
        while let Ok(record) = rx.try_recv() {
            records.push(record);
        }
        records
    }

    #[tokio::test]
    async fn full_pipeline_cites_fetched_sources() {
        let provider = Arc::new(MockProvider::with_replies(["Paris is the capital of France."]));
        let ctx = test_context(provider.clone(), france_search(), france_pages(), Arc::new(EventBus::default()));
        let response = SearchAgent::new(&ctx).query("capital of France").await.unwrap();

        assert!(response.starts_with("## Synthesis\n\nParis is the capital of France.\n\n## Sources"));
        assert_eq!(response.matches("**URL:**").count(), 2);
        assert!(!response.contains("gone.example"));
        let urls = response.split("### URLs:\n").nth(1).unwrap();
        assert_eq!(
            urls,
            "- https://en.wikipedia.org/wiki/Paris\n- https://en.wikipedia.org/wiki/Lyon"
        );
        assert_eq!(provider.complete_calls(), 1);
    }

    #[tokio::test]
    async fn synthesis_prompt_carries_summary_and_sources() {
        let provider = Arc::new(MockProvider::with_replies(["ok"]));
        let ctx = test_context(provider.clone(), france_search(), france_pages(), Arc::new(EventBus::default()));
        SearchAgent::new(&ctx).query("capital of France").await.unwrap();

        let prompt = provider.last_request().unwrap().messages[0].content.clone();
        assert!(prompt.contains("## Search results"));
        assert!(prompt.contains("**URL:** https://en.wikipedia.org/wiki/Lyon"));
    }

    #[tokio::test]
    async fn zero_results_short_circuits() {
        let provider = Arc::new(MockProvider::with_replies(["unused"]));
        let ctx = test_context(
            provider.clone(),
            Arc::new(ScriptedSearch::results(vec![])),
            france_pages(),
            Arc::new(EventBus::default()),
        );
        let response = SearchAgent::new(&ctx).query("xyzzy").await.unwrap();

        assert_eq!(response, no_results_message("xyzzy"));
        assert_eq!(provider.complete_calls(), 0);
        assert_eq!(provider.embed_calls(), 0);
    }

    #[tokio::test]
    async fn search_failure_degrades_to_no_results() {
        let provider = Arc::new(MockProvider::with_replies(["unused"]));
        let ctx = test_context(
            provider.clone(),
            Arc::new(ScriptedSearch::failing(SearchError::Network("dns".into()))),
            france_pages(),
            Arc::new(EventBus::default()),
        );
        let response = SearchAgent::new(&ctx).query("paris").await.unwrap();
        assert_eq!(response, no_results_message("paris"));
        assert_eq!(provider.complete_calls(), 0);
    }

    #[tokio::test]
    async fn generation_failure_leaves_empty_synthesis() {
        let bus = Arc::new(EventBus::new(64));
        let mut rx = bus.subscribe();
        let ctx = test_context(Arc::new(MockProvider::failing()), france_search(), france_pages(), bus);

        let response = SearchAgent::new(&ctx).query("capital of France").await.unwrap();
        assert!(response.starts_with("## Synthesis\n\n\n\n## Sources\n\n**Title:** Paris"));
        assert_eq!(response.matches("**URL:**").count(), 2);

        let records = drain(&mut rx);
        assert!(records.iter().any(|r| r.message == "Synthesis failed" && r.level == LogLevel::Error));
    }

    #[tokio::test]
    async fn index_failure_returns_search_summary() {
        let provider = Arc::new(MockProvider::failing_embeddings(["unused"]));
        let ctx = test_context(provider.clone(), france_search(), france_pages(), Arc::new(EventBus::default()));

        let response = SearchAgent::new(&ctx).query("capital of France").await.unwrap();
        assert!(response.starts_with("## Search results\n\n1. [Paris](https://en.wikipedia.org/wiki/Paris)"));
        assert_eq!(provider.complete_calls(), 0);
    }

    #[tokio::test]
    async fn all_fetches_failed_still_answers() {
        let provider = Arc::new(MockProvider::with_replies(["From snippets only."]));
        let ctx = test_context(
            provider.clone(),
            france_search(),
            Arc::new(MapFetcher::new([])),
            Arc::new(EventBus::default()),
        );
        let response = SearchAgent::new(&ctx).query("capital of France").await.unwrap();

        assert!(response.starts_with("## Synthesis\n\nFrom snippets only."));
        assert!(response.ends_with("### URLs:\n"));
        assert_eq!(provider.embed_calls(), 0);
    }

    #[tokio::test]
    async fn emits_interaction_completed() {
        let bus = Arc::new(EventBus::new(64));
        let mut rx = bus.subscribe();
        let ctx = test_context(Arc::new(MockProvider::with_replies(["s"])), france_search(), france_pages(), bus);
        SearchAgent::new(&ctx).query("capital of France").await.unwrap();

        let records = drain(&mut rx);
        let done = records.iter().find(|r| r.message == "interaction completed").unwrap();
        assert_eq!(done.metadata["sources"], 2);
        assert_eq!(done.metadata["query_sample"], "capital of France");
        assert!(done.metadata["prompt_chars"].as_u64().unwrap() > 0);
    }
}
