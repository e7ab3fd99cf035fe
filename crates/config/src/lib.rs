//! Configuration loading, validation, and management for Sourcer.
//!
//! Loads configuration from `~/.sourcer/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.sourcer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation and embedding backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Sampling settings for synthesis
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Chunking and retrieval settings
    #[serde(default)]
    pub rag: RagConfig,

    /// Web search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Page fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Request routing settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// "ollama", "openai", "openrouter", or "custom:<base url>"
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_model")]
    pub embedding_model: String,

    #[serde(default = "default_provider_timeout")]
    pub request_timeout_secs: u64,
}

fn default_provider_name() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "llama3.2".into()
}
fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: None,
            api_key: None,
            model: default_model(),
            embedding_model: default_model(),
            request_timeout_secs: default_provider_timeout(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Language the synthesis is written in
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_temperature() -> f32 {
    0.3
}
fn default_top_p() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_language() -> String {
    "English".into()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per query (k)
    #[serde(default = "default_results")]
    pub results: usize,

    /// Texts per embedding request
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

fn default_chunk_size() -> usize {
    1024
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_results() -> usize {
    3
}
fn default_embed_batch_size() -> usize {
    32
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            results: default_results(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// "exa" or "firecrawl"
    #[serde(default = "default_search_provider")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// Let the provider rewrite the query (Exa autoprompt)
    #[serde(default = "default_true")]
    pub auto_expand: bool,
}

fn default_search_provider() -> String {
    "exa".into()
}
fn default_max_results() -> usize {
    3
}
fn default_search_timeout() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            api_key: None,
            base_url: None,
            max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
            auto_expand: true,
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .field("timeout_secs", &self.timeout_secs)
            .field("auto_expand", &self.auto_expand)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// Character ceiling for cleaned page text
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Maximum pages fetched in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout() -> u64 {
    15
}
fn default_max_chars() -> usize {
    5000
}
fn default_concurrency() -> usize {
    4
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_chars: default_max_chars(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Deadline for one whole request, 0 = none
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_agent")]
    pub default_agent: String,
}

fn default_request_timeout() -> u64 {
    180
}
fn default_agent() -> String {
    "search".into()
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            default_agent: default_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const SEARCH_PROVIDERS: &[&str] = &["exa", "firecrawl"];

impl AppConfig {
    /// Load configuration from the default path (~/.sourcer/config.toml),
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with(&config_path, |key| std::env::var(key).ok())
    }

    /// Load configuration from a specific file path, without overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |_| None)
    }

    /// Read `path`, apply overrides from `lookup`, then validate the result.
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::read_file(path)?;
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Sourcer-specific names win over the generic ones.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k));

        if let Some(model) = first(&["SOURCER_MODEL", "OLLAMA_MODEL"]) {
            self.provider.model = model;
        }
        if let Some(url) = first(&["SOURCER_BASE_URL", "OLLAMA_BASE_URL"]) {
            self.provider.base_url = Some(url);
        }
        if let Some(model) = first(&["SOURCER_EMBEDDING_MODEL", "EMBEDDING_MODEL"]) {
            self.provider.embedding_model = model;
        }
        if self.provider.api_key.is_none() {
            self.provider.api_key = first(&["SOURCER_API_KEY", "OPENAI_API_KEY"]);
        }
        if let Some(provider) = first(&["SOURCER_SEARCH_PROVIDER", "SEARCH_PROVIDER"]) {
            self.search.provider = provider;
        }
        if self.search.api_key.is_none() {
            self.search.api_key = match self.search.provider.as_str() {
                "firecrawl" => lookup("FIRECRAWL_API_KEY"),
                _ => lookup("EXA_API_KEY"),
            };
        }

        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(v) = parsed("CHUNK_SIZE") {
            self.rag.chunk_size = v as usize;
        }
        if let Some(v) = parsed("CHUNK_OVERLAP") {
            self.rag.chunk_overlap = v as usize;
        }
        if let Some(v) = parsed("RAG_RESULTS") {
            self.rag.results = v as usize;
        }
        if let Some(v) = parsed("MAX_RESULTS") {
            self.search.max_results = v as usize;
        }
        if let Some(v) = parsed("SEARCH_TIMEOUT") {
            self.search.timeout_secs = v;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sourcer")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.generation.top_p <= 0.0 || self.generation.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "generation.top_p must be in (0.0, 1.0]".into(),
            ));
        }
        if self.rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError("rag.chunk_size must be > 0".into()));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.results == 0 || self.rag.embed_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.results and rag.embed_batch_size must be > 0".into(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::ValidationError("search.max_results must be > 0".into()));
        }
        if !SEARCH_PROVIDERS.contains(&self.search.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown search.provider '{}' (expected one of: {})",
                self.search.provider,
                SEARCH_PROVIDERS.join(", ")
            )));
        }
        if self.fetch.max_chars == 0 || self.fetch.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.max_chars and fetch.concurrency must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// The effective configuration as TOML, with secrets removed.
    pub fn redacted_toml(&self) -> String {
        let mut config = self.clone();
        config.provider.api_key = None;
        config.search.api_key = None;
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
