//! GitHub triage actions.
//!
//! Supports `assign_issue` (`issue_id`, `user`) and `close_issue`
//! (`issue_id`). By default actions are acknowledged without touching
//! GitHub; [`GitHubActionExecutor::with_gh_cli`] routes them through the
//! `gh` CLI instead.

use async_trait::async_trait;
use sentinel_application::ports::action_executor::{ActionError, ActionExecutor};
use sentinel_domain::{Action, ExecutionResult};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
enum Mode {
    #[default]
    Acknowledge,
    GhCli { repo: Option<String> },
}

#[derive(Debug, Clone, Default)]
pub struct GitHubActionExecutor {
    mode: Mode,
}

impl GitHubActionExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Perform actions with `gh issue ...`, optionally against `repo`
    /// (`owner/name`) instead of the current directory's repository.
    pub fn with_gh_cli(repo: Option<String>) -> Self {
        Self {
            mode: Mode::GhCli { repo },
        }
    }

    async fn gh_issue(&self, args: &[&str]) -> Result<(), ActionError> {
        let Mode::GhCli { repo } = &self.mode else {
            return Ok(());
        };

        let mut cmd = Command::new("gh");
        cmd.arg("issue").args(args);
        if let Some(repo) = repo {
            cmd.arg("--repo").arg(repo);
        }
        debug!("Running gh issue {}", args.join(" "));

        let output = cmd
            .output()
            .await
            .map_err(|e| ActionError::Failed(format!("Failed to execute gh: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ActionError::Failed(format!(
                "gh issue {} failed: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

fn required(action: &Action, parameter: &str) -> Result<String, ActionError> {
    action
        .param_str(parameter)
        .ok_or_else(|| ActionError::missing(action, parameter))
}

#[async_trait]
impl ActionExecutor for GitHubActionExecutor {
    async fn perform(&self, action: &Action) -> Result<ExecutionResult, ActionError> {
        match action.action_type.as_str() {
            "assign_issue" => {
                let issue_id = required(action, "issue_id")?;
                let user = required(action, "user")?;
                self.gh_issue(&["edit", &issue_id, "--add-assignee", &user])
                    .await?;
                info!("Assigned issue {} to {}", issue_id, user);
                Ok(ExecutionResult::success(format!(
                    "Assigned issue {} to {}",
                    issue_id, user
                )))
            }
            "close_issue" => {
                let issue_id = required(action, "issue_id")?;
                self.gh_issue(&["close", &issue_id]).await?;
                info!("Closed issue {}", issue_id);
                Ok(ExecutionResult::success(format!("Closed issue {}", issue_id)))
            }
            other => Ok(ExecutionResult::failed(format!(
                "Unknown action type: {}",
                other
            ))),
        }
    }
}
