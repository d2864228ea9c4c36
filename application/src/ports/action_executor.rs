//! Action executor port
//!
//! Performs an admitted [`Action`] against a domain's external system.
//! Executors are only ever reached after the guardrail has admitted the
//! action.

use crate::observability::CallInterrupted;
use async_trait::async_trait;
use sentinel_domain::{Action, ExecutionResult};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while performing an admitted action
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Action '{action}' is missing parameter '{parameter}'")]
    MissingParameter { action: String, parameter: String },

    #[error("Action failed: {0}")]
    Failed(String),

    #[error("Action timed out after {0:?}")]
    Timeout(Duration),

    #[error("Action cancelled")]
    Cancelled,
}

impl From<CallInterrupted> for ActionError {
    fn from(interrupted: CallInterrupted) -> Self {
        match interrupted {
            CallInterrupted::TimedOut(after) => ActionError::Timeout(after),
            CallInterrupted::Cancelled => ActionError::Cancelled,
        }
    }
}

impl ActionError {
    pub fn missing(action: &Action, parameter: &str) -> Self {
        ActionError::MissingParameter {
            action: action.action_type.clone(),
            parameter: parameter.to_string(),
        }
    }
}

/// Performs side-effecting actions for one domain.
///
/// Unknown action types should produce a `failed` [`ExecutionResult`]
/// rather than an error.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn perform(&self, action: &Action) -> Result<ExecutionResult, ActionError>;
}
