//! Routing and agent lifecycle.
//!
//! The orchestrator owns one lazily-built instance per [`AgentType`]. Each
//! slot is a `OnceCell`, so concurrent first use constructs at most once and
//! later calls only clone an `Arc`. Every failure below `process` is logged
//! and replaced with [`DEGRADED_MESSAGE`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use sourcer_core::agent::{Agent, AgentType};
use sourcer_core::error::{Error, Result};
use sourcer_core::event::{LogLevel, StructuredLogger, metadata, query_sample};
use tokio::sync::OnceCell;
use tracing::info;

use crate::agents::{AnalysisAgent, GenerationAgent, SearchAgent};
use crate::context::AgentContext;

const MODULE: &str = "Orchestrator";

/// The only text a caller sees when processing fails.
pub const DEGRADED_MESSAGE: &str = "Sorry, an error occurred while processing your request. \
                                    Our technical team has been notified.";

/// Builds the agent for a type.
pub trait AgentFactory: Send + Sync {
    fn build(&self, kind: AgentType) -> Result<Arc<dyn Agent>>;
}

/// Builds the real pipeline agents from a shared context.
pub struct PipelineFactory {
    ctx: AgentContext,
}

impl PipelineFactory {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }
}

impl AgentFactory for PipelineFactory {
    fn build(&self, kind: AgentType) -> Result<Arc<dyn Agent>> {
        Ok(match kind {
            AgentType::Search => Arc::new(SearchAgent::new(&self.ctx)),
            AgentType::Analyze => Arc::new(AnalysisAgent::new(&self.ctx)),
            AgentType::Generate => Arc::new(GenerationAgent::new(&self.ctx)),
        })
    }
}

/// Service identity reported by the health check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub service_name: &'static str,
}

pub struct Orchestrator {
    factory: Arc<dyn AgentFactory>,
    logger: Arc<dyn StructuredLogger>,
    instances: HashMap<AgentType, OnceCell<Arc<dyn Agent>>>,
    request_timeout: Option<Duration>,
}

impl Orchestrator {
    /// Orchestrator over the real agents, with the configured deadline.
    pub fn new(ctx: AgentContext) -> Self {
        let timeout = Duration::from_secs(ctx.config.orchestrator.request_timeout_secs);
        let logger = ctx.logger.clone();
        Self::with_factory(Arc::new(PipelineFactory::new(ctx)), logger).with_request_timeout(timeout)
    }

    /// Orchestrator over any factory, without a deadline.
    pub fn with_factory(factory: Arc<dyn AgentFactory>, logger: Arc<dyn StructuredLogger>) -> Self {
        Self {
            factory,
            logger,
            instances: AgentType::ALL.iter().map(|kind| (*kind, OnceCell::new())).collect(),
            request_timeout: None,
        }
    }

    /// Whole-request deadline for `process`. Zero disables it.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// The instance for `agent_type`, built on first use.
    ///
    /// Unknown types fail with [`Error::UnsupportedAgentType`] before any
    /// construction is attempted.
    pub async fn get_agent(&self, agent_type: &str) -> Result<Arc<dyn Agent>> {
        let kind = match agent_type.parse::<AgentType>() {
            Ok(kind) => kind,
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    "Unsupported agent type",
                    MODULE,
                    metadata([("agent_type", json!(agent_type))]),
                );
                return Err(e);
            }
        };

        let cell = self
            .instances
            .get(&kind)
            .ok_or_else(|| Error::UnsupportedAgentType(agent_type.to_string()))?;

        let agent = cell
            .get_or_try_init(|| async {
                let agent = self.factory.build(kind)?;
                info!(agent_type = %kind, "Agent instance created");
                self.logger.log(
                    LogLevel::Info,
                    "Agent instance created",
                    MODULE,
                    metadata([("agent_type", json!(kind.as_str()))]),
                );
                Ok::<_, Error>(agent)
            })
            .await?;

        Ok(Arc::clone(agent))
    }

    /// Whether the instance for `kind` has been built.
    pub fn is_initialized(&self, kind: AgentType) -> bool {
        self.instances.get(&kind).is_some_and(|cell| cell.initialized())
    }

    /// Route `query` to `agent_type` and return its response, or
    /// [`DEGRADED_MESSAGE`] on any failure.
    pub async fn process(&self, query: &str, agent_type: &str) -> String {
        self.logger.log(
            LogLevel::Info,
            "Request received",
            MODULE,
            metadata([
                ("agent_type", json!(agent_type)),
                ("query_length", json!(query.chars().count())),
                ("query_sample", json!(query_sample(query))),
            ]),
        );

        let work = async {
            let agent = self.get_agent(agent_type).await?;
            agent.query(query).await
        };

        let result = match self.request_timeout {
            Some(deadline) => tokio::time::timeout(deadline, work)
                .await
                .unwrap_or(Err(Error::Timeout { secs: deadline.as_secs() })),
            None => work.await,
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    "Processing error",
                    MODULE,
                    metadata([
                        ("error", json!(e.to_string())),
                        ("agent_type", json!(agent_type)),
                        ("query_sample", json!(query_sample(query))),
                    ]),
                );
                DEGRADED_MESSAGE.to_string()
            }
        }
    }

    /// Static service identity.
    pub fn health(&self) -> HealthStatus {
        health()
    }
}

/// Static service identity, available without an orchestrator.
pub fn health() -> HealthStatus {
    HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service_name: "sourcer",
    }
}
