//! Domain layer for sentinel
//!
//! This crate contains the core rules of bottleneck orchestration. It has no
//! dependencies on infrastructure or presentation concerns and performs no
//! I/O.
//!
//! # Core Concepts
//!
//! ## Bottleneck reports
//!
//! Every sub-agent produces one [`BottleneckReport`] per diagnostic cycle.
//! Confidence and impact are clamped into range on every construction path.
//!
//! ## Guardrail
//!
//! Agents act only when an action's asserted confidence clears the agent's
//! threshold ([`Guardrail`]).
//!
//! ## Planning
//!
//! The orchestrator ranks reports by `impact_score * confidence`
//! ([`rank_by_impact`]), detects contention over shared resources
//! ([`find_conflicts`]), and produces a [`WeeklyPlan`], either from an
//! enrichment response ([`parse_synthesis_response`]) or locally
//! ([`WeeklyPlan::local_fallback`]).

pub mod agent;
pub mod core;
pub mod orchestration;
pub mod planning;
pub mod project;
pub mod prompt;
pub mod report;
pub mod security;

// Re-export commonly used types
pub use agent::{
    Action, AgentMetrics, AgentSettings, AgentState, AgentType, BLOCKED_REASON, CycleResult,
    CycleStatus, DEFAULT_CONFIDENCE_THRESHOLD, ExecutionResult, Guardrail,
};
pub use core::error::DomainError;
pub use orchestration::{SynthesisMachine, SynthesisPhase};
pub use planning::{
    Conflict, PlanItem, SynthesisResponse, WeeklyPlan, find_conflicts, parse_synthesis_response,
    rank_by_impact,
};
pub use project::{ProjectConfig, ProjectSubAgent, ProjectValidationError};
pub use prompt::{DiagnosisProfile, PromptTemplate};
pub use report::{BottleneckReport, ParsedDiagnosis, parse_diagnosis_payload};
pub use security::{SecurityFinding, SecuritySummary, Severity};
