//! `sourcer query`: route one query and print the response.

use std::sync::Arc;

use sourcer_agent::{AgentContext, Orchestrator};
use sourcer_config::AppConfig;
use sourcer_core::event::EventBus;
use tracing::debug;

pub async fn run(
    config: AppConfig,
    agent: Option<String>,
    text: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = text.join(" ");
    let agent_type = agent.unwrap_or_else(|| config.orchestrator.default_agent.clone());
    debug!(agent_type = %agent_type, "Dispatching query");

    let ctx = AgentContext::from_config(config, Arc::new(EventBus::default()))?;
    let orchestrator = Orchestrator::new(ctx);

    eprintln!("Processing...");
    let response = orchestrator.process(&query, &agent_type).await;
    println!("{response}");
    Ok(())
}
