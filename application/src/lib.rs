//! Application layer for sentinel
//!
//! This crate contains the agents, the orchestration use case, port
//! definitions, and application configuration. It depends only on the
//! domain layer.

pub mod agents;
pub mod config;
pub mod observability;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{
    Agent, AgentFactory, AgentRegistry, DiagnosisError, DiagnosisPayload, Diagnostician,
    DomainComponents, EnrichedDiagnostician, Orchestrator, RegistryError, SecurityDiagnostician,
    SharedSubAgent, SubAgent, SynthesisError,
};
pub use config::{AgentDefaults, OrchestrationParams};
pub use observability::{CallInterrupted, ObservabilityContext, instrumented_call};
pub use ports::{
    action_executor::{ActionError, ActionExecutor},
    decision_logger::{DecisionLogger, DecisionRecord, NoDecisionLogger},
    enrichment::{EnrichmentError, EnrichmentGateway, EnrichmentRequest},
    finding_source::{FindingSource, FindingSourceError},
    progress::{CyclePhase, CycleProgressNotifier, NoCycleProgress},
    state_store::{AgentRecord, AgentReport, StateStore, StoreError},
};
pub use use_cases::run_cycle::{
    CycleSummary, ExecuteActionError, RunCycleError, RunCycleUseCase, RunMode,
};
