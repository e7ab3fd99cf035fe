//! Error types for the Sourcer domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! The top-level [`Error`] carries the pipeline taxonomy; each external
//! collaborator has its own bounded-context error.

use thiserror::Error;

/// The top-level error type for all Sourcer operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Search ---
    #[error("Search provider error: {0}")]
    SearchProvider(#[from] SearchError),

    // --- Fetch (always absorbed into a placeholder document) ---
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    // --- Retrieval index ---
    #[error("Index build failed: {0}")]
    Index(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    // --- Generation ---
    #[error("Generation failed: {0}")]
    Generation(#[from] ProviderError),

    // --- Routing ---
    #[error("Unsupported agent type: {0}")]
    UnsupportedAgentType(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures talking to an LLM or embedding backend.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures talking to the external search provider.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search provider not configured: {0}")]
    NotConfigured(String),

    #[error("Search authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Search API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Search network error: {0}")]
    Network(String),

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),
}
