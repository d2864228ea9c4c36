//! Security finding source port

use async_trait::async_trait;
use sentinel_domain::SecurityFinding;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FindingSourceError {
    #[error("Failed to read findings: {0}")]
    Read(String),

    #[error("Malformed findings document: {0}")]
    Malformed(String),
}

/// Supplies the current set of security findings (scanner output, advisories).
#[async_trait]
pub trait FindingSource: Send + Sync {
    async fn collect(&self) -> Result<Vec<SecurityFinding>, FindingSourceError>;
}
