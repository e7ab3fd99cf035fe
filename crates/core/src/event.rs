//! Structured logging, the observability seam of the pipeline.
//!
//! Components report noteworthy events (request received, fetch failed,
//! generation failed, ...) through a [`StructuredLogger`] handed to them at
//! construction time. The default implementation, [`EventBus`], forwards
//! every record to `tracing` and broadcasts it to any subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Severity of a structured record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// One structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// The component that emitted the record (e.g. "Orchestrator").
    pub module: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Sink for structured records.
pub trait StructuredLogger: Send + Sync {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        module: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    );
}

/// A broadcast-based structured logger.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Every record is
/// also emitted as a `tracing` event so the installed subscriber (plain or
/// JSON) sees it.
pub struct EventBus {
    sender: broadcast::Sender<Arc<LogRecord>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to receive records.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<LogRecord>> {
        self.sender.subscribe()
    }

    /// Publish a prepared record.
    pub fn publish(&self, record: LogRecord) {
        emit_tracing(&record);
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(record));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl StructuredLogger for EventBus {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        module: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) {
        self.publish(LogRecord {
            timestamp: Utc::now(),
            level,
            module: module.to_string(),
            message: message.to_string(),
            metadata,
        });
    }
}

fn emit_tracing(record: &LogRecord) {
    let metadata = serde_json::Value::Object(record.metadata.clone());
    match record.level {
        LogLevel::Debug => tracing::debug!(module = %record.module, metadata = %metadata, "{}", record.message),
        LogLevel::Info => tracing::info!(module = %record.module, metadata = %metadata, "{}", record.message),
        LogLevel::Warning => tracing::warn!(module = %record.module, metadata = %metadata, "{}", record.message),
        LogLevel::Error | LogLevel::Critical => {
            tracing::error!(module = %record.module, level = ?record.level, metadata = %metadata, "{}", record.message)
        }
    }
}

/// Build a metadata map from key/value pairs.
pub fn metadata<I, K>(pairs: I) -> serde_json::Map<String, serde_json::Value>
where
    I: IntoIterator<Item = (K, serde_json::Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Truncate a query for log metadata.
pub fn query_sample(query: &str) -> String {
    query.chars().take(200).collect()
}
