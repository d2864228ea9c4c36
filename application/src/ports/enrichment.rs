//! Enrichment gateway port
//!
//! Defines the interface for the external reasoning collaborator (typically
//! an LLM) that diagnosticians and the orchestrator consult.

use crate::observability::CallInterrupted;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during an enrichment call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnrichmentError {
    #[error("Enrichment is not configured")]
    NotConfigured,

    #[error("Enrichment unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cancelled")]
    Cancelled,
}

impl From<CallInterrupted> for EnrichmentError {
    fn from(interrupted: CallInterrupted) -> Self {
        match interrupted {
            CallInterrupted::TimedOut(after) => EnrichmentError::Timeout(after),
            CallInterrupted::Cancelled => EnrichmentError::Cancelled,
        }
    }
}

/// A role instruction plus a task payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRequest {
    pub system: String,
    pub task: String,
}

impl EnrichmentRequest {
    pub fn new(system: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            task: task.into(),
        }
    }
}

/// Gateway to the enrichment collaborator
///
/// Implementations (adapters) live in the infrastructure layer. The returned
/// text is raw; callers parse and validate it.
#[async_trait]
pub trait EnrichmentGateway: Send + Sync {
    async fn enrich(&self, request: &EnrichmentRequest) -> Result<String, EnrichmentError>;
}
