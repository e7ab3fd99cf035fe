//! Synthesis Service: one prompt in, generated text out.

use std::sync::Arc;

use sourcer_core::error::{Error, Result};
use sourcer_core::provider::{Provider, ProviderRequest, SamplingOptions};
use tracing::debug;

use crate::context::AgentContext;

pub struct Summarizer {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: SamplingOptions,
    language: String,
}

impl Summarizer {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        sampling: SamplingOptions,
        language: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            sampling,
            language: language.into(),
        }
    }

    /// Built from the `[provider]` and `[generation]` config sections.
    pub fn from_context(ctx: &AgentContext) -> Self {
        let generation = &ctx.config.generation;
        Self::new(
            ctx.generator.clone(),
            ctx.config.provider.model.clone(),
            SamplingOptions {
                temperature: generation.temperature,
                top_p: Some(generation.top_p),
                max_tokens: Some(generation.max_tokens),
            },
            generation.language.clone(),
        )
    }

    /// The summarization prompt for `text`.
    pub fn prompt(&self, text: &str) -> String {
        format!(
            "Summarize the following sources in clear paragraphs, in {}:\n\n{text}",
            self.language
        )
    }

    /// Summarize `text` with the fixed template.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        self.generate(&self.prompt(text)).await
    }

    /// Send `prompt` as-is and return the generated text verbatim.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting generation");
        let request = ProviderRequest::prompt(self.model.clone(), prompt, self.sampling.clone());
        let response = self.provider.complete(request).await.map_err(Error::Generation)?;
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockProvider;

    #[tokio::test]
    async fn summarize_wraps_text_in_template() {
        let provider = Arc::new(MockProvider::with_replies(["A short synthesis."]));
        let summarizer =
            Summarizer::new(provider.clone(), "llama3.2", SamplingOptions::default(), "English");

        let text = summarizer.summarize("Paris is the capital of France.").await.unwrap();
        assert_eq!(text, "A short synthesis.");

        let request = provider.last_request().unwrap();
        let prompt = &request.messages[0].content;
        assert!(prompt.starts_with("Summarize the following sources in clear paragraphs, in English:"));
        assert!(prompt.ends_with("Paris is the capital of France."));
        assert!(request.sampling.temperature <= 0.3);
    }

    #[tokio::test]
    async fn generate_sends_prompt_verbatim() {
        let provider = Arc::new(MockProvider::with_replies(["ok"]));
        let summarizer = Summarizer::new(provider.clone(), "m", SamplingOptions::default(), "French");
        summarizer.generate("Write a haiku").await.unwrap();
        assert_eq!(provider.last_request().unwrap().messages[0].content, "Write a haiku");
    }

    #[tokio::test]
    async fn provider_failure_is_generation_error() {
        let summarizer =
            Summarizer::new(Arc::new(MockProvider::failing()), "m", SamplingOptions::default(), "English");
        let err = summarizer.summarize("x").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn prompt_uses_configured_language() {
        let summarizer =
            Summarizer::new(Arc::new(MockProvider::failing()), "m", SamplingOptions::default(), "French");
        assert!(summarizer.prompt("t").contains("in French:"));
    }
}
