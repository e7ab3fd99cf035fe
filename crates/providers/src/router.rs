//! Provider selection from configuration.
//!
//! Every supported backend speaks the OpenAI-compatible API, so routing is a
//! matter of picking the base URL, key and timeout for the named provider.

use std::sync::Arc;
use std::time::Duration;

use sourcer_config::AppConfig;
use sourcer_core::error::ProviderError;
use sourcer_core::provider::Provider;
use tracing::info;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured LLM provider.
///
/// The same instance serves completions and embeddings.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider = &config.provider;
    let name = provider.name.as_str();

    let (label, base_url) = match name.strip_prefix("custom:") {
        Some(url) if !url.is_empty() => ("custom", url.to_string()),
        Some(_) => {
            return Err(ProviderError::NotConfigured(
                "custom provider requires a URL after 'custom:'".into(),
            ));
        }
        None => {
            let url = provider
                .base_url
                .clone()
                .or_else(|| default_base_url(name).map(str::to_string))
                .ok_or_else(|| {
                    ProviderError::NotConfigured(format!(
                        "unknown provider '{name}' and no base_url given"
                    ))
                })?;
            (name, url)
        }
    };

    let api_key = match (&provider.api_key, label) {
        (Some(key), _) => key.clone(),
        // Ollama ignores the key but some proxies reject an empty header
        (None, "ollama") => "ollama".to_string(),
        (None, "openai" | "openrouter") => {
            return Err(ProviderError::NotConfigured(format!(
                "provider '{label}' requires an api_key"
            )));
        }
        (None, _) => String::new(),
    };

    info!(provider = label, base_url = %base_url, model = %provider.model, "Provider configured");

    Ok(Arc::new(OpenAiCompatProvider::with_timeout(
        label,
        base_url,
        api_key,
        Duration::from_secs(provider.request_timeout_secs),
    )))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "ollama" => Some("http://localhost:11434/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        "llamacpp" | "llama.cpp" => Some("http://localhost:8080/v1"),
        _ => None,
    }
}
