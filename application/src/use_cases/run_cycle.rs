//! Run cycle use case
//!
//! Drives one orchestration cycle: every registered sub-agent diagnoses
//! concurrently, the reports are persisted, and (in full mode) the
//! orchestrator synthesizes them into a plan.

use crate::agents::{Agent, AgentRegistry, Orchestrator, RegistryError, SynthesisError};
use crate::ports::action_executor::ActionError;
use crate::ports::decision_logger::DecisionRecord;
use crate::ports::progress::{CycleProgressNotifier, CyclePhase, NoCycleProgress};
use crate::ports::state_store::{StateStore, StoreError};
use sentinel_domain::{Action, AgentState, BottleneckReport, CycleResult, ExecutionResult, WeeklyPlan};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that can occur during a run cycle
#[derive(Error, Debug)]
pub enum RunCycleError {
    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors from [`RunCycleUseCase::execute_action`]
#[derive(Error, Debug)]
pub enum ExecuteActionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// How much of the cycle to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Diagnose only
    Diagnostic,
    /// Diagnose, then synthesize and store a plan
    #[default]
    Full,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Diagnostic => "diagnostic",
            RunMode::Full => "full",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diagnostic" => Ok(RunMode::Diagnostic),
            "full" => Ok(RunMode::Full),
            other => Err(format!("unknown run mode: {}", other)),
        }
    }
}

/// Outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub mode: RunMode,
    /// One result per registered agent, ordered by agent id
    pub agent_results: Vec<CycleResult>,
    pub plan: Option<WeeklyPlan>,
}

impl CycleSummary {
    pub fn succeeded(&self) -> usize {
        self.agent_results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.agent_results.len() - self.succeeded()
    }
}

/// Use case for running an orchestration cycle
pub struct RunCycleUseCase {
    registry: Arc<AgentRegistry>,
    orchestrator: Mutex<Orchestrator>,
    store: Arc<dyn StateStore>,
}

impl RunCycleUseCase {
    pub fn new(
        registry: Arc<AgentRegistry>,
        orchestrator: Orchestrator,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            registry,
            orchestrator: Mutex::new(orchestrator),
            store,
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, mode: RunMode) -> Result<CycleSummary, RunCycleError> {
        self.execute_with_progress(mode, &NoCycleProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        mode: RunMode,
        progress: &dyn CycleProgressNotifier,
    ) -> Result<CycleSummary, RunCycleError> {
        info!(
            "Starting {} cycle with {} agents",
            mode,
            self.registry.len()
        );

        let agent_results = self.phase_diagnose(progress).await;

        let plan = match mode {
            RunMode::Diagnostic => None,
            RunMode::Full => {
                let reports: Vec<BottleneckReport> = agent_results
                    .iter()
                    .filter_map(|result| result.bottleneck.clone())
                    .collect();
                Some(self.phase_synthesize(reports, progress).await?)
            }
        };

        Ok(CycleSummary {
            mode,
            agent_results,
            plan,
        })
    }

    /// Synthesize a plan from the latest stored report of every agent.
    pub async fn synthesize_stored(
        &self,
        progress: &dyn CycleProgressNotifier,
    ) -> Result<WeeklyPlan, RunCycleError> {
        let reports: Vec<BottleneckReport> = self
            .store
            .get_all_reports()
            .await?
            .into_iter()
            .filter_map(|stored| {
                stored
                    .bottleneck
                    .map(|report| report.attributed(stored.agent_id, stored.domain))
            })
            .collect();
        info!("Synthesizing {} stored reports", reports.len());
        self.phase_synthesize(reports, progress).await
    }

    /// Run a single agent's cycle and persist its report.
    pub async fn run_agent(&self, agent_id: &str) -> Result<CycleResult, RunCycleError> {
        let agent = self.registry.get(agent_id)?;
        let domain = agent.lock().await.domain().to_string();
        let result = agent.lock().await.run().await;
        let result = attribute(result, &domain);
        self.persist(&result).await;
        Ok(result)
    }

    /// Ask one agent to perform an action, behind its guardrail. Admitted
    /// actions are recorded in the store.
    pub async fn execute_action(
        &self,
        agent_id: &str,
        action: Action,
    ) -> Result<ExecutionResult, ExecuteActionError> {
        let agent = self.registry.get(agent_id)?;
        let result = agent.lock().await.execute(action.clone()).await?;

        if !result.is_blocked() {
            let record = DecisionRecord::new(agent_id, "action")
                .with_reasoning(result.status.clone())
                .with_confidence(action.confidence)
                .with_context(json!({
                    "action_type": action.action_type,
                    "parameters": action.parameters,
                    "result": result,
                }));
            if let Err(e) = self.store.log_decision(&record).await {
                warn!("Failed to record action for {}: {}", agent_id, e);
            }
        }
        Ok(result)
    }

    /// Snapshot of one registered agent, completed from the store.
    ///
    /// An agent rebuilt in a fresh process has no report or run stamp of its
    /// own yet; the persisted ones fill those gaps. Metrics are per process.
    pub async fn agent_state(&self, agent_id: &str) -> Result<AgentState, RunCycleError> {
        let agent = self.registry.get(agent_id)?;
        let mut state = agent.lock().await.get_state();

        if let Some(record) = self.store.get_agent_state(agent_id).await? {
            state.created_at = record.registered_at;
            if state.last_run.is_none() {
                state.last_run = record.last_run;
            }
        }

        if state.bottleneck.is_none() {
            let stored = self
                .store
                .get_all_reports()
                .await?
                .into_iter()
                .find(|stored| stored.agent_id == agent_id);
            if let Some(stored) = stored
                && let Some(report) = stored.bottleneck
            {
                state.last_diagnosis = stored.last_run;
                state.bottleneck = Some(report.attributed(stored.agent_id, stored.domain));
            }
        }
        Ok(state)
    }

    pub async fn orchestrator_state(&self) -> AgentState {
        self.orchestrator.lock().await.get_state()
    }

    /// Phase 1: every registered agent diagnoses in its own task
    async fn phase_diagnose(&self, progress: &dyn CycleProgressNotifier) -> Vec<CycleResult> {
        info!("Phase 1: Diagnose");
        progress.on_phase_start(CyclePhase::Diagnose, self.registry.len());

        let mut join_set = JoinSet::new();

        for (agent_id, agent) in self.registry.agents() {
            let agent = Arc::clone(agent);
            let agent_id = agent_id.to_string();
            join_set.spawn(async move {
                let mut agent = agent.lock().await;
                let domain = agent.domain().to_string();
                let result = agent.run().await;
                (agent_id, attribute(result, &domain))
            });
        }

        let mut results = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((agent_id, result)) => {
                    if result.is_success() {
                        info!("Agent {} completed diagnosis", agent_id);
                    } else {
                        warn!(
                            "Agent {} failed: {}",
                            agent_id,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    progress.on_agent_complete(CyclePhase::Diagnose, &agent_id, result.is_success());
                    self.persist(&result).await;
                    results.push(result);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        results.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));
        progress.on_phase_complete(CyclePhase::Diagnose);
        results
    }

    /// Phase 2: synthesize and store the plan
    async fn phase_synthesize(
        &self,
        reports: Vec<BottleneckReport>,
        progress: &dyn CycleProgressNotifier,
    ) -> Result<WeeklyPlan, RunCycleError> {
        info!("Phase 2: Synthesize");
        progress.on_phase_start(CyclePhase::Synthesize, 1);

        let report_count = reports.len();
        let mut orchestrator = self.orchestrator.lock().await;
        let plan = match orchestrator.synthesize(reports).await {
            Ok(plan) => plan,
            Err(e) => {
                progress.on_agent_complete(CyclePhase::Synthesize, orchestrator.agent_id(), false);
                progress.on_phase_complete(CyclePhase::Synthesize);
                return Err(e.into());
            }
        };
        progress.on_agent_complete(CyclePhase::Synthesize, orchestrator.agent_id(), true);

        self.store.save_plan(&plan).await?;
        let decision = DecisionRecord::new(orchestrator.agent_id(), "orchestration")
            .with_reasoning(if orchestrator.fell_back() {
                "local fallback plan"
            } else {
                "enriched plan"
            })
            .with_confidence(
                plan.top_bottleneck
                    .as_ref()
                    .map(|top| top.confidence)
                    .unwrap_or(0.0),
            )
            .with_context(json!({
                "week": plan.week,
                "reports_synthesized": report_count,
                "conflicts": plan.cross_domain_conflicts.len(),
                "plan_items": plan.weekly_plan.len(),
            }));
        self.store.log_decision(&decision).await?;

        progress.on_phase_complete(CyclePhase::Synthesize);
        Ok(plan)
    }

    /// Persist a successful agent result. Storage failures are logged; they
    /// do not fail the cycle.
    async fn persist(&self, result: &CycleResult) {
        let Some(report) = &result.bottleneck else {
            return;
        };
        if let Err(e) = self.store.save_bottleneck(&result.agent_id, report).await {
            warn!("Failed to save report for {}: {}", result.agent_id, e);
        }
        if let Err(e) = self.store.update_last_run(&result.agent_id).await {
            warn!("Failed to update last_run for {}: {}", result.agent_id, e);
        }
    }
}

fn attribute(mut result: CycleResult, domain: &str) -> CycleResult {
    result.bottleneck = result
        .bottleneck
        .map(|report| report.attributed(result.agent_id.clone(), domain));
    result
}
