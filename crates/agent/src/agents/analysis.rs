//! Analysis agent: descriptive statistics over user-supplied text.

use std::collections::HashSet;

use async_trait::async_trait;
use sourcer_core::agent::{Agent, AgentType};
use sourcer_core::document::Document;
use sourcer_core::error::Result;
use sourcer_rag::RagEngine;
use tracing::debug;

use crate::context::AgentContext;

pub struct AnalysisAgent {
    rag: RagEngine,
}

impl AnalysisAgent {
    pub fn new(ctx: &AgentContext) -> Self {
        Self {
            rag: RagEngine::from_config(ctx.embedder.clone(), &ctx.config),
        }
    }
}

/// Unique words over total words, case-insensitive. 0.0 for empty input.
pub fn lexical_density(text: &str) -> f64 {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    unique.len() as f64 / words.len() as f64
}

#[async_trait]
impl Agent for AnalysisAgent {
    fn kind(&self) -> AgentType {
        AgentType::Analyze
    }

    async fn query(&self, input: &str) -> Result<String> {
        let index = self
            .rag
            .build_index(&[Document::from_text("user_input", input)])
            .await?;
        debug!(chunks = index.len(), "Indexed user text");

        let words = input.split_whitespace().count();
        Ok(format!(
            "## Text analysis\n\n- Length: {} characters\n- Words: {}\n- Lexical density: {:.2}\n- Indexed chunks: {}",
            input.chars().count(),
            words,
            lexical_density(input),
            index.len()
        ))
    }
}
