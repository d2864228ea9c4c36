//! Agent entities - identity, configuration, and state snapshots.

use super::action::Action;
use super::guardrail::{DEFAULT_CONFIDENCE_THRESHOLD, Guardrail};
use crate::report::BottleneckReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default retry budget declared for external calls.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default timeout for a single external call (1 hour).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// The role an agent plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Synthesizes sub-agent reports into a plan
    Orchestrator,
    /// Diagnoses and acts within one domain
    SubAgent,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "orchestrator",
            AgentType::SubAgent => "sub_agent",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counters maintained across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub diagnoses_run: u64,
    pub actions_executed: u64,
    pub errors: u64,
}

/// Construction-time agent configuration.
///
/// `max_retries` and `timeout` describe the contract for the agent's
/// external calls; the timeout is enforced by the call middleware, retries
/// are left to whoever drives the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSettings {
    pub confidence_threshold: f64,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AgentSettings {
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The guardrail gate derived from this configuration.
    pub fn guardrail(&self) -> Guardrail {
        Guardrail::new(self.confidence_threshold)
    }
}

/// Snapshot of an agent, as returned by `get_state()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub agent_id: String,
    pub agent_type: AgentType,
    /// Empty for the orchestrator
    pub domain: String,
    pub created_at: DateTime<Utc>,
    pub last_run: Option<DateTime<Utc>>,
    pub last_diagnosis: Option<DateTime<Utc>>,
    pub bottleneck: Option<BottleneckReport>,
    pub actions_queued: Vec<Action>,
    pub metrics: AgentMetrics,
    pub confidence_threshold: f64,
    pub max_retries: u32,
    pub timeout_seconds: u64,
}
