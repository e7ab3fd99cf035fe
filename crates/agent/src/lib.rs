//! Agents and orchestration for Sourcer.
//!
//! A query flows through the [`Orchestrator`], which picks the agent for the
//! requested [`AgentType`](sourcer_core::AgentType):
//!
//! 1. **search**: web search, page fetch, retrieval, synthesis, cited answer
//! 2. **analyze**: statistics over the given text
//! 3. **generate**: the prompt goes straight to the model
//!
//! Failures are logged through the context's structured logger; callers of
//! [`Orchestrator::process`] only ever see a response string.

pub mod agents;
pub mod context;
pub mod orchestrator;
pub mod response;
pub mod synthesis;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agents::{AnalysisAgent, GenerationAgent, SearchAgent, lexical_density};
pub use context::AgentContext;
pub use orchestrator::{AgentFactory, DEGRADED_MESSAGE, HealthStatus, Orchestrator, PipelineFactory, health};
pub use response::{SourceEntry, assemble, source_entries};
pub use synthesis::Summarizer;
