//! Agent kinds and the query contract every agent implements.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The closed set of agent variants the orchestrator can route to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Web search → fetch → retrieve → synthesize
    #[default]
    Search,
    /// Descriptive statistics over user-supplied text
    Analyze,
    /// Direct generation, no retrieval
    Generate,
}

impl AgentType {
    pub const ALL: [AgentType; 3] = [AgentType::Search, AgentType::Analyze, AgentType::Generate];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Search => "search",
            AgentType::Analyze => "analyze",
            AgentType::Generate => "generate",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "search" => Ok(AgentType::Search),
            "analyze" => Ok(AgentType::Analyze),
            "generate" => Ok(AgentType::Generate),
            other => Err(Error::UnsupportedAgentType(other.to_string())),
        }
    }
}

/// A long-lived processing unit: `query -> response`.
///
/// Implementations hold only immutable collaborators, so one instance can
/// serve concurrent queries.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Which registry slot this agent fills.
    fn kind(&self) -> AgentType;

    /// Process one query and return the formatted response.
    async fn query(&self, input: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types() {
        for kind in AgentType::ALL {
            assert_eq!(kind.as_str().parse::<AgentType>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "translate".parse::<AgentType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedAgentType(ref t) if t == "translate"));
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("Search".parse::<AgentType>().is_err());
    }

    #[test]
    fn defaults_to_search() {
        assert_eq!(AgentType::default(), AgentType::Search);
    }
}
