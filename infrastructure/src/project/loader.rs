//! Reads a [`ProjectConfig`] from disk.
//!
//! `.toml` files are parsed as TOML; anything else as JSON.

use sentinel_domain::{ProjectConfig, ProjectValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid project {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ProjectValidationError,
    },
}

/// Load and validate a project definition.
pub async fn load_project(path: &Path) -> Result<ProjectConfig, ProjectLoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ProjectLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let parsed = if is_toml {
        toml::from_str::<ProjectConfig>(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<ProjectConfig>(&content).map_err(|e| e.to_string())
    };
    let project = parsed.map_err(|message| ProjectLoadError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    project
        .validate()
        .map_err(|source| ProjectLoadError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_TOML: &str = r#"
project = "payments-v2"
description = "Move checkout to the new processor"
definition_of_done = ["Checkout error rate below 0.1%"]

[outcome_metrics]
conversion = "+2%"

[[milestones]]
name = "shadow traffic"
deadline = "2026-11-01"

[[risks]]
description = "Processor rate limits"
mitigation = "Negotiate burst quota"
probability = "high"

[[sub_agents]]
agent_id = "payments-gh"
domain = "github-triage"
confidence_threshold = 0.8
"#;

    #[tokio::test]
    async fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.toml");
        std::fs::write(&path, PROJECT_TOML).unwrap();

        let project = load_project(&path).await.unwrap();
        assert_eq!(project.project, "payments-v2");
        assert_eq!(project.milestones[0].status, "pending");
        assert_eq!(project.risks[0].probability, "high");
        assert_eq!(project.sub_agents[0].confidence_threshold, Some(0.8));
    }

    #[tokio::test]
    async fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(
            &path,
            r#"{
                "project": "docs",
                "description": "Docs refresh",
                "outcome_metrics": {},
                "definition_of_done": ["Every page reviewed"],
                "milestones": [],
                "risks": []
            }"#,
        )
        .unwrap();

        let project = load_project(&path).await.unwrap();
        assert!(project.sub_agents.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(
            &path,
            r#"{
                "project": "docs",
                "description": "",
                "outcome_metrics": {},
                "definition_of_done": [],
                "milestones": [],
                "risks": []
            }"#,
        )
        .unwrap();

        assert!(matches!(
            load_project(&path).await,
            Err(ProjectLoadError::Invalid {
                source: ProjectValidationError::EmptyDefinitionOfDone,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_parse_and_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.toml");
        std::fs::write(&path, "project = ").unwrap();
        assert!(matches!(
            load_project(&path).await,
            Err(ProjectLoadError::Parse { .. })
        ));
        assert!(matches!(
            load_project(&dir.path().join("missing.json")).await,
            Err(ProjectLoadError::Read { .. })
        ));
    }
}
