//! SARIF 2.1 report reader.
//!
//! Only the parts the security agent needs are modelled: each run's rules
//! (for remediation links) and results.

use async_trait::async_trait;
use sentinel_application::ports::finding_source::{FindingSource, FindingSourceError};
use sentinel_domain::{SecurityFinding, Severity};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DEFAULT_LEVEL: &str = "warning";
const NO_DESCRIPTION: &str = "No description provided";
const NO_REMEDIATION: &str = "Check tool documentation for remediation";

#[derive(Debug, Default, Deserialize)]
struct SarifLog {
    #[serde(default)]
    runs: Vec<SarifRun>,
}

#[derive(Debug, Default, Deserialize)]
struct SarifRun {
    #[serde(default)]
    tool: SarifTool,
    #[serde(default)]
    results: Vec<SarifResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SarifTool {
    #[serde(default)]
    driver: SarifDriver,
}

#[derive(Debug, Default, Deserialize)]
struct SarifDriver {
    #[serde(default)]
    rules: Vec<SarifRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    help_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: Option<String>,
    level: Option<String>,
    message: Option<SarifMessage>,
    #[serde(default)]
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Deserialize)]
struct SarifMessage {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: Option<PhysicalLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhysicalLocation {
    artifact_location: Option<ArtifactLocation>,
    region: Option<Region>,
}

#[derive(Debug, Deserialize)]
struct ArtifactLocation {
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Region {
    start_line: Option<u32>,
}

/// Parse a SARIF document into findings attributed to `source`.
pub fn parse_sarif(content: &str, source: &str) -> Result<Vec<SecurityFinding>, FindingSourceError> {
    let log: SarifLog = serde_json::from_str(content)
        .map_err(|e| FindingSourceError::Malformed(e.to_string()))?;

    let mut findings = Vec::new();
    for run in log.runs {
        let help: HashMap<String, Option<String>> = run
            .tool
            .driver
            .rules
            .into_iter()
            .map(|rule| (rule.id, rule.help_uri))
            .collect();

        for result in run.results {
            let rule_id = result.rule_id.unwrap_or_else(|| "unknown".to_string());
            let level = result.level.as_deref().unwrap_or(DEFAULT_LEVEL);
            let location = result
                .locations
                .into_iter()
                .next()
                .and_then(|l| l.physical_location);
            let (file_path, line_number) = match location {
                Some(physical) => (
                    physical.artifact_location.and_then(|a| a.uri),
                    physical.region.and_then(|r| r.start_line),
                ),
                None => (None, None),
            };
            let remediation = help
                .get(&rule_id)
                .cloned()
                .flatten()
                .unwrap_or_else(|| NO_REMEDIATION.to_string());

            findings.push(SecurityFinding {
                source: source.to_string(),
                severity: Severity::from_sarif_level(level),
                description: result
                    .message
                    .and_then(|m| m.text)
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                rule_id,
                file_path,
                line_number,
                remediation: Some(remediation),
            });
        }
    }
    Ok(findings)
}

/// Reads findings from SARIF files on disk.
///
/// The tool name is taken from the file name up to the first `-` or `.`
/// (`eslint-results.sarif` is attributed to `eslint`). Missing or unreadable
/// files contribute no findings.
pub struct SarifFindingSource {
    paths: Vec<PathBuf>,
}

impl SarifFindingSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn source_name(path: &Path) -> String {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split(['-', '.']).next())
            .filter(|name| !name.is_empty())
            .unwrap_or("sarif")
            .to_string()
    }
}

#[async_trait]
impl FindingSource for SarifFindingSource {
    async fn collect(&self) -> Result<Vec<SecurityFinding>, FindingSourceError> {
        let mut findings = Vec::new();
        for path in &self.paths {
            let content = match tokio::fs::read_to_string(path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping SARIF report {}: {}", path.display(), e);
                    continue;
                }
            };
            match parse_sarif(&content, &Self::source_name(path)) {
                Ok(parsed) => {
                    debug!("{} findings from {}", parsed.len(), path.display());
                    findings.extend(parsed);
                }
                Err(e) => warn!("Skipping SARIF report {}: {}", path.display(), e),
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "version": "2.1.0",
        "runs": [{
            "tool": {"driver": {"name": "ESLint", "rules": [
                {"id": "no-eval", "helpUri": "https://eslint.org/docs/rules/no-eval"}
            ]}},
            "results": [
                {
                    "ruleId": "no-eval",
                    "level": "error",
                    "message": {"text": "eval can be harmful."},
                    "locations": [{"physicalLocation": {
                        "artifactLocation": {"uri": "src/app.js"},
                        "region": {"startLine": 12}
                    }}]
                },
                {"ruleId": "no-unused-vars"}
            ]
        }]
    }"#;

    #[test]
    fn test_parse_results() {
        let findings = parse_sarif(REPORT, "eslint").unwrap();
        assert_eq!(findings.len(), 2);

        let first = &findings[0];
        assert_eq!(first.severity, Severity::High);
        assert_eq!(first.description, "eval can be harmful.");
        assert_eq!(first.file_path.as_deref(), Some("src/app.js"));
        assert_eq!(first.line_number, Some(12));
        assert_eq!(
            first.remediation.as_deref(),
            Some("https://eslint.org/docs/rules/no-eval")
        );

        let second = &findings[1];
        assert_eq!(second.severity, Severity::Medium);
        assert_eq!(second.description, NO_DESCRIPTION);
        assert_eq!(second.remediation.as_deref(), Some(NO_REMEDIATION));
        assert!(second.file_path.is_none());
    }

    #[test]
    fn test_malformed_report() {
        assert!(matches!(
            parse_sarif("not json", "eslint"),
            Err(FindingSourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_source_name() {
        assert_eq!(
            SarifFindingSource::source_name(Path::new("reports/eslint-results.sarif")),
            "eslint"
        );
        assert_eq!(SarifFindingSource::source_name(Path::new("zap.sarif")), "zap");
    }

    #[tokio::test]
    async fn test_collect_skips_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("eslint-results.sarif");
        let bad = dir.path().join("broken.sarif");
        std::fs::write(&good, REPORT).unwrap();
        std::fs::write(&bad, "{").unwrap();

        let source = SarifFindingSource::new(vec![
            dir.path().join("missing.sarif"),
            bad,
            good,
        ]);
        let findings = source.collect().await.unwrap();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.source == "eslint"));
    }
}
