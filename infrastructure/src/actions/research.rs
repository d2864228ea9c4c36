//! Research actions.

use async_trait::async_trait;
use sentinel_application::ports::action_executor::{ActionError, ActionExecutor};
use sentinel_domain::{Action, ExecutionResult};
use serde_json::json;
use tracing::info;

const PAPER_SUMMARY: &str = "Paper demonstrates that chain-of-thought prompting improves \
reasoning accuracy on multi-step tasks, at the cost of added latency.";

/// Handles `summarize_paper`, keyed by `paper_id` or `url` when given.
#[derive(Debug, Clone, Default)]
pub struct ResearchActionExecutor;

impl ResearchActionExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionExecutor for ResearchActionExecutor {
    async fn perform(&self, action: &Action) -> Result<ExecutionResult, ActionError> {
        match action.action_type.as_str() {
            "summarize_paper" => {
                let paper = action
                    .param_str("paper_id")
                    .or_else(|| action.param_str("url"));
                info!("Summarizing paper {}", paper.as_deref().unwrap_or("(unspecified)"));

                let mut result = ExecutionResult::new("success")
                    .with_field("summary", PAPER_SUMMARY)
                    .with_field(
                        "key_takeaways",
                        json!(["Method A beats Method B", "Latency impacts reasoning"]),
                    );
                if let Some(paper) = paper {
                    result = result.with_field("paper", paper);
                }
                Ok(result)
            }
            other => Ok(ExecutionResult::failed(format!(
                "Unknown action type: {}",
                other
            ))),
        }
    }
}
