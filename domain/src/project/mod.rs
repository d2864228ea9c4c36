//! Project definitions
//!
//! A project names the outcome it is driving toward, how "done" is judged,
//! a short list of milestones and risks, and the sub-agents that watch it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// At most this many milestones per project.
pub const MAX_MILESTONES: usize = 7;
/// At most this many tracked risks per project.
pub const MAX_RISKS: usize = 3;

/// Project validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ProjectValidationError {
    #[error("project name cannot be empty")]
    EmptyName,

    #[error("definition_of_done needs at least one criterion")]
    EmptyDefinitionOfDone,

    #[error("too many milestones: {0} (max {MAX_MILESTONES})")]
    TooManyMilestones(usize),

    #[error("too many risks: {0} (max {MAX_RISKS})")]
    TooManyRisks(usize),

    #[error("sub-agent entry has an empty agent_id or domain")]
    IncompleteSubAgent,

    #[error("duplicate sub-agent id: {0}")]
    DuplicateSubAgent(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMilestone {
    pub name: String,
    #[serde(default)]
    pub deadline: Option<String>,
    /// pending, in-progress, done
    #[serde(default = "default_milestone_status")]
    pub status: String,
}

fn default_milestone_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRisk {
    pub description: String,
    pub mitigation: String,
    /// low, medium, high
    #[serde(default = "default_probability")]
    pub probability: String,
}

fn default_probability() -> String {
    "medium".to_string()
}

/// A sub-agent declared by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSubAgent {
    pub agent_id: String,
    pub domain: String,
    #[serde(default)]
    pub confidence_threshold: Option<f64>,
}

/// A project definition. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: String,
    pub description: String,
    /// Measurable success metrics
    pub outcome_metrics: BTreeMap<String, String>,
    /// Acceptance criteria
    pub definition_of_done: Vec<String>,
    pub milestones: Vec<ProjectMilestone>,
    pub risks: Vec<ProjectRisk>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub required_artifacts: Vec<String>,
    #[serde(default)]
    pub sub_agents: Vec<ProjectSubAgent>,
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.project.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        if self.definition_of_done.is_empty() {
            return Err(ProjectValidationError::EmptyDefinitionOfDone);
        }
        if self.milestones.len() > MAX_MILESTONES {
            return Err(ProjectValidationError::TooManyMilestones(
                self.milestones.len(),
            ));
        }
        if self.risks.len() > MAX_RISKS {
            return Err(ProjectValidationError::TooManyRisks(self.risks.len()));
        }

        let mut seen = HashSet::new();
        for agent in &self.sub_agents {
            if agent.agent_id.trim().is_empty() || agent.domain.trim().is_empty() {
                return Err(ProjectValidationError::IncompleteSubAgent);
            }
            if !seen.insert(agent.agent_id.as_str()) {
                return Err(ProjectValidationError::DuplicateSubAgent(
                    agent.agent_id.clone(),
                ));
            }
        }
        Ok(())
    }
}
