//! Outcomes of agent operations.

use crate::report::BottleneckReport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reason attached to a guardrail rejection.
pub const BLOCKED_REASON: &str = "Failed confidence threshold";

/// Result of `execute(action)`.
///
/// `status` is always present; everything else is executor-defined and
/// flattened next to it (`message`, `summary`, `reason`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ExecutionResult {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            fields: Map::new(),
        }
    }

    /// The guardrail rejected the action.
    pub fn blocked() -> Self {
        Self::new("blocked").with_field("reason", BLOCKED_REASON)
    }

    /// The agent has no executor for its domain.
    pub fn not_implemented() -> Self {
        Self::new("not_implemented")
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("success").with_field("message", message.into())
    }

    /// The executor understood the request but could not satisfy it.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new("failed").with_field("message", message.into())
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_blocked(&self) -> bool {
        self.status == "blocked"
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Status of one diagnostic cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Success,
    Error,
}

/// Result of `run()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    pub agent_id: String,
    pub status: CycleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottleneck: Option<BottleneckReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CycleResult {
    pub fn success(agent_id: impl Into<String>, bottleneck: BottleneckReport) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: CycleStatus::Success,
            bottleneck: Some(bottleneck),
            error: None,
        }
    }

    pub fn error(agent_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: CycleStatus::Error,
            bottleneck: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CycleStatus::Success
    }
}
