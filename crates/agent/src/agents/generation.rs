//! Generation agent: the prompt goes straight to the model.

use async_trait::async_trait;
use sourcer_core::agent::{Agent, AgentType};
use sourcer_core::error::Result;

use crate::context::AgentContext;
use crate::synthesis::Summarizer;

pub struct GenerationAgent {
    summarizer: Summarizer,
}

impl GenerationAgent {
    pub fn new(ctx: &AgentContext) -> Self {
        Self {
            summarizer: Summarizer::from_context(ctx),
        }
    }
}

#[async_trait]
impl Agent for GenerationAgent {
    fn kind(&self) -> AgentType {
        AgentType::Generate
    }

    async fn query(&self, input: &str) -> Result<String> {
        let text = self.summarizer.generate(input).await?;
        Ok(format!("## Generated response\n\n{text}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use sourcer_core::error::Error;
    use sourcer_core::event::EventBus;
    use std::sync::Arc;

    fn agent(provider: Arc<MockProvider>) -> GenerationAgent {
        GenerationAgent::new(&test_context(
            provider,
            Arc::new(ScriptedSearch::results(vec![])),
            Arc::new(MapFetcher::new([])),
            Arc::new(EventBus::default()),
        ))
    }

    #[tokio::test]
    async fn wraps_generated_text() {
        let provider = Arc::new(MockProvider::with_replies(["Roses are red."]));
        let response = agent(provider.clone()).query("Write a poem").await.unwrap();
        assert_eq!(response, "## Generated response\n\nRoses are red.");
        assert_eq!(provider.last_request().unwrap().messages[0].content, "Write a poem");
        assert_eq!(provider.embed_calls(), 0);
    }

    #[tokio::test]
    async fn generation_failure_propagates() {
        let err = agent(Arc::new(MockProvider::failing())).query("x").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }
}
