//! Observability context and external call middleware.
//!
//! There is no process-global tracer. An [`ObservabilityContext`] is built
//! once per run (or per command) and threaded through every agent. It
//! carries:
//!
//! - a run identifier attached to every span,
//! - the [`DecisionLogger`] agents write their audit trail to,
//! - a [`CancellationToken`] that aborts in-flight external calls.
//!
//! Every external call (enrichment, finding collection, action execution)
//! goes through [`instrumented_call`], which composes timeout, span,
//! cancellation, and the call itself.

use crate::ports::decision_logger::{DecisionLogger, NoDecisionLogger};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, field, info_span, warn};

/// Why an external call ended before its future resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallInterrupted {
    TimedOut(Duration),
    Cancelled,
}

/// Per-run observability state, cheap to clone.
#[derive(Clone)]
pub struct ObservabilityContext {
    run_id: String,
    agent_id: Option<String>,
    domain: Option<String>,
    decisions: Arc<dyn DecisionLogger>,
    cancellation: CancellationToken,
}

impl ObservabilityContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            agent_id: None,
            domain: None,
            decisions: Arc::new(NoDecisionLogger),
            cancellation: CancellationToken::new(),
        }
    }

    /// A context for a single run, identified by the current UTC time.
    pub fn for_run() -> Self {
        Self::new(chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string())
    }

    pub fn with_decision_logger(mut self, logger: Arc<dyn DecisionLogger>) -> Self {
        self.decisions = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Scope the context to one agent; spans opened from it carry the agent
    /// identity.
    pub fn for_agent(&self, agent_id: &str, domain: &str) -> Self {
        let mut scoped = self.clone();
        scoped.agent_id = Some(agent_id.to_string());
        scoped.domain = Some(domain.to_string());
        scoped
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn decisions(&self) -> &dyn DecisionLogger {
        self.decisions.as_ref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for ObservabilityContext {
    fn default() -> Self {
        Self::for_run()
    }
}

/// Run an external call with a timeout, a tracing span, and cancellation.
///
/// Timeout and cancellation are mapped into the caller's error type through
/// `From<CallInterrupted>`, so they surface exactly like an error returned by
/// the collaborator itself.
pub async fn instrumented_call<T, E, F>(
    ctx: &ObservabilityContext,
    name: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<CallInterrupted> + Display,
{
    let span = info_span!(
        "external_call",
        run.id = %ctx.run_id,
        agent.id = ctx.agent_id.as_deref().unwrap_or("-"),
        agent.domain = ctx.domain.as_deref().unwrap_or("-"),
        call = name,
        success = field::Empty,
    );

    let cancellation = ctx.cancellation.clone();
    let guarded = async move {
        if cancellation.is_cancelled() {
            return Err(E::from(CallInterrupted::Cancelled));
        }
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(E::from(CallInterrupted::Cancelled)),
            outcome = tokio::time::timeout(timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(E::from(CallInterrupted::TimedOut(timeout))),
            },
        }
    };

    let result = guarded.instrument(span.clone()).await;
    span.record("success", result.is_ok());
    match &result {
        Ok(_) => debug!(parent: &span, "{} completed", name),
        Err(e) => warn!(parent: &span, "{} failed: {}", name, e),
    }
    result
}
