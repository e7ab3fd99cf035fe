//! LLM provider implementations for Sourcer.
//!
//! All providers implement the `sourcer_core::Provider` trait.
//! The router builds the configured backend.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
