//! Security findings and their summary.

use crate::report::BottleneckReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence attached to a summary-derived report with findings.
const FINDINGS_CONFIDENCE: f64 = 0.95;
/// Confidence attached to a clean summary.
const CLEAN_CONFIDENCE: f64 = 0.9;

/// Finding severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Map a SARIF result `level` to a severity.
    ///
    /// Unknown levels are treated as `medium`.
    pub fn from_sarif_level(level: &str) -> Self {
        match level {
            "error" => Severity::High,
            "warning" => Severity::Medium,
            "note" => Severity::Low,
            "none" => Severity::Info,
            _ => Severity::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A vulnerability reported by some tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFinding {
    /// Tool that reported it (e.g. `eslint`, `zap`)
    pub source: String,
    pub severity: Severity,
    /// Tool rule or CVE id
    pub rule_id: String,
    pub description: String,
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
    pub remediation: Option<String>,
}

/// Aggregated view of findings across tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub total_findings: usize,
    pub counts_by_severity: BTreeMap<Severity, usize>,
    pub counts_by_source: BTreeMap<String, usize>,
}

impl SecuritySummary {
    pub fn from_findings(findings: &[SecurityFinding]) -> Self {
        let mut summary = Self {
            total_findings: findings.len(),
            ..Default::default()
        };
        for finding in findings {
            *summary.counts_by_severity.entry(finding.severity).or_default() += 1;
            *summary
                .counts_by_source
                .entry(finding.source.clone())
                .or_default() += 1;
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts_by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// The security domain's bottleneck for this summary.
    ///
    /// Impact grows with critical (2.5 each) and high (1.5 each) findings,
    /// capped at 10.
    pub fn to_report(&self) -> BottleneckReport {
        if self.total_findings == 0 {
            return BottleneckReport::new(
                "No significant security vulnerabilities identified.",
                CLEAN_CONFIDENCE,
                0.0,
            )
            .with_recommended_action("Continue regular security scans.");
        }

        let critical = self.count(Severity::Critical);
        let high = self.count(Severity::High);
        let impact = (critical as f64 * 2.5 + high as f64 * 1.5).min(10.0);

        BottleneckReport::new(
            format!(
                "Found {} security vulnerabilities ({} critical, {} high).",
                self.total_findings, critical, high
            ),
            FINDINGS_CONFIDENCE,
            impact,
        )
        .with_blocking(["production deployment", "security compliance"])
        .with_recommended_action(
            "Review critical security findings in the Command Center dashboard.",
        )
        .with_reasoning(format!(
            "Findings by source: {}",
            self.counts_by_source
                .iter()
                .map(|(source, count)| format!("{}={}", source, count))
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(source: &str, severity: Severity) -> SecurityFinding {
        SecurityFinding {
            source: source.to_string(),
            severity,
            rule_id: "rule".to_string(),
            description: "desc".to_string(),
            file_path: None,
            line_number: None,
            remediation: None,
        }
    }

    #[test]
    fn test_sarif_level_mapping() {
        assert_eq!(Severity::from_sarif_level("error"), Severity::High);
        assert_eq!(Severity::from_sarif_level("warning"), Severity::Medium);
        assert_eq!(Severity::from_sarif_level("note"), Severity::Low);
        assert_eq!(Severity::from_sarif_level("none"), Severity::Info);
        assert_eq!(Severity::from_sarif_level("bogus"), Severity::Medium);
    }

    #[test]
    fn test_summary_counts() {
        let summary = SecuritySummary::from_findings(&[
            finding("eslint", Severity::High),
            finding("eslint", Severity::Medium),
            finding("zap", Severity::Critical),
        ]);
        assert_eq!(summary.total_findings, 3);
        assert_eq!(summary.count(Severity::High), 1);
        assert_eq!(summary.count(Severity::Low), 0);
        assert_eq!(summary.counts_by_source.get("eslint"), Some(&2));
    }

    #[test]
    fn test_clean_report() {
        let report = SecuritySummary::default().to_report();
        assert_eq!(report.confidence, 0.9);
        assert_eq!(report.impact_score, 0.0);
        assert!(report.blocking.is_empty());
    }

    #[test]
    fn test_findings_report_impact() {
        let summary = SecuritySummary::from_findings(&[
            finding("zap", Severity::Critical),
            finding("eslint", Severity::High),
            finding("eslint", Severity::Low),
        ]);
        let report = summary.to_report();
        assert_eq!(report.impact_score, 4.0);
        assert_eq!(report.confidence, 0.95);
        assert_eq!(
            report.description,
            "Found 3 security vulnerabilities (1 critical, 1 high)."
        );
        assert_eq!(
            report.blocking,
            vec!["production deployment", "security compliance"]
        );
    }

    #[test]
    fn test_impact_capped() {
        let findings: Vec<_> = (0..6).map(|_| finding("zap", Severity::Critical)).collect();
        let report = SecuritySummary::from_findings(&findings).to_report();
        assert_eq!(report.impact_score, 10.0);
    }
}
