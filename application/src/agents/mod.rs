//! Agents
//!
//! Two kinds of agent share the flat [`Agent`] trait:
//!
//! - [`SubAgent`]: diagnoses one domain and, when the guardrail admits it,
//!   acts on it. Composes a [`Diagnostician`] and an optional
//!   [`ActionExecutor`](crate::ports::action_executor::ActionExecutor).
//! - [`Orchestrator`]: synthesizes the sub-agents' reports into a plan.

pub mod diagnostician;
pub mod orchestrator;
pub mod registry;
pub mod sub_agent;

pub use diagnostician::{
    DiagnosisError, DiagnosisPayload, Diagnostician, EnrichedDiagnostician, SecurityDiagnostician,
};
pub use orchestrator::{Orchestrator, SynthesisError};
pub use registry::{AgentFactory, AgentRegistry, DomainComponents, RegistryError, SharedSubAgent};
pub use sub_agent::SubAgent;

use async_trait::async_trait;
use sentinel_domain::{AgentType, CycleResult};
use serde_json::Value;
use std::fmt::Display;

#[async_trait]
pub trait Agent: Send + Sync {
    fn agent_id(&self) -> &str;

    fn agent_type(&self) -> AgentType;

    /// One cycle of the agent's work. Never fails; problems are reported in
    /// the returned [`CycleResult`].
    async fn run(&mut self) -> CycleResult;

    /// Record a decision to the audit trail.
    fn log_decision(&self, decision_type: &str, reasoning: &str, confidence: f64, context: Value);

    fn log_error(&self, error: &dyn Display, context: Value);
}
