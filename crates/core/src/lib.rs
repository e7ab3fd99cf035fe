//! # Sourcer Core
//!
//! Domain types, collaborator traits, and error definitions for the Sourcer
//! research agent. This crate has **no network or model dependencies**; it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here: the LLM/embedding
//! [`Provider`], the [`SearchProvider`], the page [`Fetcher`] and the
//! [`StructuredLogger`]. Implementations live in their respective crates,
//! so the pipeline can be exercised end-to-end with scripted stand-ins.

pub mod agent;
pub mod document;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod search;

// Re-export key types at crate root for ergonomics
pub use agent::{Agent, AgentType};
pub use document::{Chunk, Document};
pub use error::{Error, ProviderError, Result, SearchError};
pub use event::{EventBus, LogLevel, LogRecord, StructuredLogger, metadata, query_sample};
pub use message::{Message, Role};
pub use provider::{EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, SamplingOptions};
pub use search::{Fetcher, SearchProvider, SearchResult};
