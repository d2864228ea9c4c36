//! Diagnosticians: the domain-specific half of a sub-agent.
//!
//! A [`Diagnostician`] produces the raw material for one bottleneck report.
//! Enrichment-backed diagnosticians return the collaborator's text for the
//! sub-agent to parse; local ones (security) build the report themselves.

use crate::observability::CallInterrupted;
use crate::ports::enrichment::{EnrichmentError, EnrichmentGateway, EnrichmentRequest};
use crate::ports::finding_source::{FindingSource, FindingSourceError};
use async_trait::async_trait;
use sentinel_domain::{BottleneckReport, DiagnosisProfile, PromptTemplate, SecuritySummary};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// What a diagnostician hands back to its sub-agent.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosisPayload {
    /// Raw collaborator output, still to be parsed
    Text(String),
    /// A report built locally
    Report(BottleneckReport),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosisError {
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Findings(#[from] FindingSourceError),

    #[error("Diagnosis timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Diagnosis cancelled")]
    Cancelled,
}

impl From<CallInterrupted> for DiagnosisError {
    fn from(interrupted: CallInterrupted) -> Self {
        match interrupted {
            CallInterrupted::TimedOut(after) => DiagnosisError::TimedOut(after),
            CallInterrupted::Cancelled => DiagnosisError::Cancelled,
        }
    }
}

#[async_trait]
pub trait Diagnostician: Send + Sync {
    /// Decision type recorded after a successful diagnosis.
    fn decision_type(&self) -> &'static str;

    async fn diagnose(&self, domain: &str) -> Result<DiagnosisPayload, DiagnosisError>;
}

/// Diagnoses a domain by asking the enrichment collaborator.
pub struct EnrichedDiagnostician {
    gateway: Arc<dyn EnrichmentGateway>,
    profile: DiagnosisProfile,
}

impl EnrichedDiagnostician {
    pub fn new(gateway: Arc<dyn EnrichmentGateway>, profile: DiagnosisProfile) -> Self {
        Self { gateway, profile }
    }

    pub fn profile(&self) -> DiagnosisProfile {
        self.profile
    }
}

#[async_trait]
impl Diagnostician for EnrichedDiagnostician {
    fn decision_type(&self) -> &'static str {
        self.profile.decision_type()
    }

    async fn diagnose(&self, domain: &str) -> Result<DiagnosisPayload, DiagnosisError> {
        let request = EnrichmentRequest::new(
            PromptTemplate::diagnosis_system(self.profile, domain),
            PromptTemplate::diagnosis_task(self.profile, domain),
        );
        let text = self.gateway.enrich(&request).await?;
        Ok(DiagnosisPayload::Text(text))
    }
}

/// Diagnoses security posture from scanner findings, without enrichment.
pub struct SecurityDiagnostician {
    source: Arc<dyn FindingSource>,
}

impl SecurityDiagnostician {
    pub fn new(source: Arc<dyn FindingSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Diagnostician for SecurityDiagnostician {
    fn decision_type(&self) -> &'static str {
        "security_scan"
    }

    async fn diagnose(&self, _domain: &str) -> Result<DiagnosisPayload, DiagnosisError> {
        let findings = self.source.collect().await?;
        let summary = SecuritySummary::from_findings(&findings);
        Ok(DiagnosisPayload::Report(summary.to_report()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_domain::{SecurityFinding, Severity};
    use std::sync::Mutex;

    struct RecordingGateway {
        requests: Mutex<Vec<EnrichmentRequest>>,
    }

    #[async_trait]
    impl EnrichmentGateway for RecordingGateway {
        async fn enrich(&self, request: &EnrichmentRequest) -> Result<String, EnrichmentError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok("{}".to_string())
        }
    }

    struct FixedFindings(Vec<SecurityFinding>);

    #[async_trait]
    impl FindingSource for FixedFindings {
        async fn collect(&self) -> Result<Vec<SecurityFinding>, FindingSourceError> {
            Ok(self.0.clone())
        }
    }

    fn finding(severity: Severity) -> SecurityFinding {
        SecurityFinding {
            source: "eslint".to_string(),
            severity,
            rule_id: "no-eval".to_string(),
            description: "eval is evil".to_string(),
            file_path: None,
            line_number: None,
            remediation: None,
        }
    }

    #[tokio::test]
    async fn test_enriched_sends_profile_prompts() {
        let gateway = Arc::new(RecordingGateway {
            requests: Mutex::new(Vec::new()),
        });
        let diagnostician =
            EnrichedDiagnostician::new(gateway.clone(), DiagnosisProfile::ResearchAnalyst);

        let payload = diagnostician.diagnose("ai-systems-research").await.unwrap();
        assert_eq!(payload, DiagnosisPayload::Text("{}".to_string()));
        assert_eq!(diagnostician.decision_type(), "intelligence_scan");

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system.contains("arXiv"));
    }

    #[tokio::test]
    async fn test_security_builds_report_locally() {
        let source = Arc::new(FixedFindings(vec![
            finding(Severity::Critical),
            finding(Severity::High),
            finding(Severity::Low),
        ]));
        let diagnostician = SecurityDiagnostician::new(source);

        let DiagnosisPayload::Report(report) = diagnostician.diagnose("security").await.unwrap()
        else {
            panic!("expected a local report");
        };
        assert_eq!(report.impact_score, 4.0);
        assert_eq!(report.confidence, 0.95);
        assert!(report.description.starts_with("Found 3 security vulnerabilities"));
    }
}
