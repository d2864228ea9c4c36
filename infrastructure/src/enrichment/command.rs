//! Enrichment through an external command.
//!
//! The command receives one JSON object on stdin,
//! `{"system": "...", "task": "..."}`, and answers with the raw response
//! text on stdout. Any LLM CLI or bridge script can sit behind it.

use async_trait::async_trait;
use sentinel_application::ports::enrichment::{
    EnrichmentError, EnrichmentGateway, EnrichmentRequest,
};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub struct CommandEnrichmentGateway {
    program: String,
    args: Vec<String>,
}

impl CommandEnrichmentGateway {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl EnrichmentGateway for CommandEnrichmentGateway {
    async fn enrich(&self, request: &EnrichmentRequest) -> Result<String, EnrichmentError> {
        let payload = serde_json::json!({
            "system": request.system,
            "task": request.task,
        })
        .to_string();

        debug!("Spawning enrichment command: {}", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                EnrichmentError::Unavailable(format!("Failed to start {}: {}", self.program, e))
            })?;

        // Write the request while draining stdout: the command may answer
        // before it has read all of its input.
        let stdin = child.stdin.take();
        let write_request = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(payload.as_bytes()).await?;
                // Dropping stdin closes the pipe so the command sees EOF
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write_request, child.wait_with_output());

        let output = output.map_err(|e| {
            EnrichmentError::RequestFailed(format!("Failed to read response: {}", e))
        })?;
        // A command may exit without reading its input; its exit status decides.
        if let Err(e) = written
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(EnrichmentError::RequestFailed(format!(
                "Failed to write request: {}",
                e
            )));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EnrichmentError::RequestFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Stand-in used when no enrichment command is configured.
///
/// Every call fails with [`EnrichmentError::NotConfigured`], so diagnoses
/// become agent-error reports and synthesis surfaces the error.
pub struct UnconfiguredEnrichment;

#[async_trait]
impl EnrichmentGateway for UnconfiguredEnrichment {
    async fn enrich(&self, _request: &EnrichmentRequest) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::NotConfigured)
    }
}
