//! `sourcer health`: print the service identity as JSON.
//!
//! With `--check-provider`, the configured model endpoint is checked and the
//! outcome added under `provider`.

use serde_json::{Value, json};
use sourcer_config::AppConfig;
use sourcer_core::provider::Provider;

pub async fn run(config: Option<&AppConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let mut report = serde_json::to_value(sourcer_agent::health())?;
    if let Some(config) = config {
        let provider = sourcer_providers::build_from_config(config)?;
        report["provider"] = provider_status(provider.as_ref()).await;
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Reachability of a model endpoint, as reported by its health check.
pub async fn provider_status(provider: &dyn Provider) -> Value {
    match provider.health_check().await {
        Ok(reachable) => json!({ "name": provider.name(), "reachable": reachable }),
        Err(e) => json!({ "name": provider.name(), "reachable": false, "error": e.to_string() }),
    }
}
