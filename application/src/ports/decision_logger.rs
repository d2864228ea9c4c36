//! Port for structured decision logging.
//!
//! Defines the [`DecisionLogger`] trait for recording the decisions agents
//! make (diagnosis scans, orchestration runs) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures an audit
//! trail in a machine-readable format (JSONL).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One decision made by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub agent_id: String,
    /// Decision type identifier (e.g., "github_triage_scan", "orchestration").
    #[serde(rename = "type")]
    pub decision_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: f64,
    /// Decision-specific data.
    #[serde(default)]
    pub context: Value,
}

impl DecisionRecord {
    /// Create a record stamped with the current UTC time.
    pub fn new(agent_id: impl Into<String>, decision_type: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            decision_type: decision_type.into(),
            timestamp: Utc::now(),
            reasoning: String::new(),
            confidence: 0.0,
            context: Value::Null,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// Port for logging decisions to a structured log.
///
/// The `log` method is synchronous and non-fallible; write failures are
/// dropped by the implementation.
pub trait DecisionLogger: Send + Sync {
    fn log(&self, record: DecisionRecord);
}

/// No-op implementation for tests and when decision logging is disabled.
pub struct NoDecisionLogger;

impl DecisionLogger for NoDecisionLogger {
    fn log(&self, _record: DecisionRecord) {}
}
