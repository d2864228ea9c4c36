//! Actions requested of an agent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A side-effecting operation a caller asks an agent to perform.
///
/// `confidence` is what the *caller* asserts; the agent compares it against
/// its own threshold and never recomputes it. A payload without a confidence
/// deserializes to `0.0`.
///
/// # Example
///
/// ```
/// use sentinel_domain::agent::Action;
///
/// let action: Action = serde_json::from_str(
///     r#"{"type": "close_issue", "parameters": {"issue_id": 42}, "confidence": 0.9}"#,
/// ).unwrap();
/// assert_eq!(action.action_type, "close_issue");
/// assert_eq!(action.param_str("issue_id"), Some("42".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    /// Action type, e.g. `assign_issue`
    #[serde(rename = "type")]
    pub action_type: String,
    /// Free-form parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Caller-asserted confidence
    #[serde(default)]
    pub confidence: f64,
}

impl Action {
    pub fn new(action_type: impl Into<String>, confidence: f64) -> Self {
        Self {
            action_type: action_type.into(),
            parameters: Map::new(),
            confidence,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Get a parameter rendered as a string (numbers are stringified).
    pub fn param_str(&self, key: &str) -> Option<String> {
        match self.parameters.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
