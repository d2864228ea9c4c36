//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types by
//! the binary.

use sentinel_application::{AgentDefaults, OrchestrationParams};
use sentinel_domain::AgentSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default SARIF report the security agent reads.
pub const DEFAULT_SARIF_PATH: &str = "security-reports/eslint-results.sarif";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0}.timeout_seconds cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("confidence_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("agent_id cannot be empty")]
    EmptyAgentId,

    #[error("agent '{0}' has an empty domain")]
    EmptyDomain(String),

    #[error("duplicate agent id: {0}")]
    DuplicateAgentId(String),

    #[error("enrichment.command cannot be empty")]
    EmptyCommand,
}

/// Defaults for every agent (`[agent]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub confidence_threshold: f64,
    pub max_retries: u32,
    /// Upper bound on each external call an agent makes
    pub timeout_seconds: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let settings = AgentSettings::default();
        Self {
            confidence_threshold: settings.confidence_threshold,
            max_retries: settings.max_retries,
            timeout_seconds: settings.timeout.as_secs(),
        }
    }
}

impl FileAgentConfig {
    pub fn to_defaults(&self) -> AgentDefaults {
        AgentDefaults::new(
            AgentSettings::default()
                .with_confidence_threshold(self.confidence_threshold)
                .with_max_retries(self.max_retries)
                .with_timeout(Duration::from_secs(self.timeout_seconds)),
        )
    }
}

/// One registered agent (`[[agents]]` entries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAgentEntry {
    pub agent_id: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

/// Enrichment collaborator (`[enrichment]` section)
///
/// # Example
///
/// ```toml
/// [enrichment]
/// command = "llm-bridge"
/// args = ["--model", "large"]
/// timeout_seconds = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEnrichmentConfig {
    /// Command that reads a request on stdin and answers on stdout.
    /// Absent: enrichment is not configured.
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Upper bound on the synthesis call
    pub timeout_seconds: u64,
}

impl Default for FileEnrichmentConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_seconds: OrchestrationParams::default().synthesis_timeout.as_secs(),
        }
    }
}

/// Persistence (`[storage]` section). No path: in-memory only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub path: Option<PathBuf>,
}

/// Log destinations (`[logging]` section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL decision audit trail
    pub decision_log: Option<PathBuf>,
    /// Operational log file (in addition to stderr)
    pub log_file: Option<PathBuf>,
}

/// Security scanner output (`[security]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSecurityConfig {
    pub sarif_paths: Vec<PathBuf>,
}

impl Default for FileSecurityConfig {
    fn default() -> Self {
        Self {
            sarif_paths: vec![PathBuf::from(DEFAULT_SARIF_PATH)],
        }
    }
}

/// GitHub triage actions (`[github]` section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGitHubConfig {
    /// Perform actions through the `gh` CLI instead of acknowledging them
    pub use_gh_cli: bool,
    /// `owner/name`; defaults to the repository of the working directory
    pub repo: Option<String>,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: FileAgentConfig,
    pub agents: Vec<FileAgentEntry>,
    pub enrichment: FileEnrichmentConfig,
    pub storage: FileStorageConfig,
    pub logging: FileLoggingConfig,
    pub security: FileSecurityConfig,
    pub github: FileGitHubConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.agent.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("agent"));
        }
        if self.enrichment.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("enrichment"));
        }
        check_threshold(self.agent.confidence_threshold)?;

        if let Some(command) = &self.enrichment.command
            && command.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyCommand);
        }

        let mut seen = HashSet::new();
        for entry in &self.agents {
            if entry.agent_id.trim().is_empty() {
                return Err(ConfigValidationError::EmptyAgentId);
            }
            if entry.domain.trim().is_empty() {
                return Err(ConfigValidationError::EmptyDomain(entry.agent_id.clone()));
            }
            if let Some(threshold) = entry.confidence_threshold {
                check_threshold(threshold)?;
            }
            if !seen.insert(entry.agent_id.as_str()) {
                return Err(ConfigValidationError::DuplicateAgentId(
                    entry.agent_id.clone(),
                ));
            }
        }

        Ok(())
    }

    pub fn orchestration_params(&self) -> OrchestrationParams {
        OrchestrationParams::from_timeout_seconds(self.enrichment.timeout_seconds)
    }
}

fn check_threshold(threshold: f64) -> Result<(), ConfigValidationError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidThreshold(threshold))
    }
}
