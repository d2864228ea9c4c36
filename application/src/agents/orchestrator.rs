//! Orchestrator: turns the fleet's reports into a weekly plan.
//!
//! # Synthesis pipeline
//!
//! ```text
//! reports ─▶ Collecting ─▶ Ranking ─▶ Enriching ─▶ Finalizing ─▶ plan
//!                │                       │  unparseable  ▲
//!                │                       └─(local plan)──┘
//!                └─(empty)─▶ Finalizing
//! ```
//!
//! A collaborator that fails to respond (error, timeout, cancellation) is
//! the one case that surfaces as [`SynthesisError`]; the machine returns to
//! `Idle` and no plan is stored.

use super::Agent;
use crate::config::OrchestrationParams;
use crate::observability::{ObservabilityContext, instrumented_call};
use crate::ports::decision_logger::DecisionRecord;
use crate::ports::enrichment::{EnrichmentError, EnrichmentGateway, EnrichmentRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentinel_domain::{
    AgentMetrics, AgentState, AgentType, BottleneckReport, CycleResult, CycleStatus, DomainError,
    PromptTemplate, SynthesisMachine, SynthesisPhase, WeeklyPlan, parse_synthesis_response,
    rank_by_impact,
};
use serde_json::{Value, json};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that surface from `synthesize`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisError {
    #[error("Synthesis collaborator failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct Orchestrator {
    agent_id: String,
    gateway: Arc<dyn EnrichmentGateway>,
    params: OrchestrationParams,
    ctx: ObservabilityContext,
    machine: SynthesisMachine,
    created_at: DateTime<Utc>,
    last_run: Option<DateTime<Utc>>,
    last_synthesis: Option<DateTime<Utc>>,
    current_plan: Option<WeeklyPlan>,
    pending: Vec<BottleneckReport>,
    metrics: AgentMetrics,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn EnrichmentGateway>) -> Self {
        let params = OrchestrationParams::default();
        Self {
            agent_id: params.orchestrator_id.clone(),
            gateway,
            params,
            ctx: ObservabilityContext::default(),
            machine: SynthesisMachine::new(),
            created_at: Utc::now(),
            last_run: None,
            last_synthesis: None,
            current_plan: None,
            pending: Vec::new(),
            metrics: AgentMetrics::default(),
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.agent_id = params.orchestrator_id.clone();
        self.params = params;
        self
    }

    pub fn with_context(mut self, ctx: ObservabilityContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn phase(&self) -> SynthesisPhase {
        self.machine.phase()
    }

    /// Whether the last synthesis used the local fallback plan.
    pub fn fell_back(&self) -> bool {
        self.machine.fell_back()
    }

    pub fn current_plan(&self) -> Option<&WeeklyPlan> {
        self.current_plan.as_ref()
    }

    pub fn last_synthesis(&self) -> Option<DateTime<Utc>> {
        self.last_synthesis
    }

    /// Queue reports for the next `run()`.
    pub fn submit(&mut self, reports: impl IntoIterator<Item = BottleneckReport>) {
        self.pending.extend(reports);
    }

    /// Synthesize `reports` into a weekly plan.
    pub async fn synthesize(
        &mut self,
        reports: Vec<BottleneckReport>,
    ) -> Result<WeeklyPlan, SynthesisError> {
        if self.machine.phase() != SynthesisPhase::Idle {
            warn!(
                "Orchestrator found synthesis in {} state, resetting",
                self.machine.phase()
            );
            self.machine.reset();
        }
        self.machine.advance(SynthesisPhase::Collecting)?;
        info!("Synthesizing {} reports", reports.len());

        let reports: Vec<BottleneckReport> =
            reports.into_iter().map(BottleneckReport::clamped).collect();

        let plan = if reports.is_empty() {
            self.machine.advance(SynthesisPhase::Finalizing)?;
            WeeklyPlan::empty(String::new())
        } else {
            self.machine.advance(SynthesisPhase::Ranking)?;
            let ranked = rank_by_impact(reports);

            self.machine.advance(SynthesisPhase::Enriching)?;
            match self.enrich(&ranked).await {
                Ok(text) => match parse_synthesis_response(&text) {
                    Ok(response) => {
                        for field in &response.missing_fields {
                            warn!("Synthesis response is missing '{}', using empty default", field);
                        }
                        self.machine.advance(SynthesisPhase::Finalizing)?;
                        response.into_plan(String::new())
                    }
                    Err(e) => {
                        warn!("Unparseable synthesis response, using local plan: {}", e);
                        self.machine.fall_back()?;
                        WeeklyPlan::local_fallback(ranked, String::new())
                    }
                },
                Err(e) => {
                    self.machine.reset();
                    self.metrics.errors += 1;
                    self.log_error(&e, json!({ "reports": ranked.len() }));
                    return Err(SynthesisError::Enrichment(e));
                }
            }
        };

        let now = Utc::now();
        let plan = plan.stamped(now.to_rfc3339());
        self.current_plan = Some(plan.clone());
        self.last_synthesis = Some(now);
        self.last_run = Some(now);
        self.metrics.diagnoses_run += 1;

        self.log_decision(
            "orchestration",
            if self.machine.fell_back() {
                "local fallback plan"
            } else {
                "enriched plan"
            },
            plan.top_bottleneck
                .as_ref()
                .map(|top| top.confidence)
                .unwrap_or(0.0),
            json!({
                "reports_synthesized": plan.priority_ranking.len(),
                "top_bottleneck": plan.top_bottleneck.as_ref().map(|top| top.description.clone()),
                "conflicts": plan.cross_domain_conflicts.len(),
            }),
        );

        self.machine.advance(SynthesisPhase::Idle)?;
        Ok(plan)
    }

    async fn enrich(&self, ranked: &[BottleneckReport]) -> Result<String, EnrichmentError> {
        let request = EnrichmentRequest::new(
            PromptTemplate::synthesis_system(),
            PromptTemplate::synthesis_task(ranked),
        );
        let ctx = self.ctx.for_agent(&self.agent_id, "orchestration");
        instrumented_call(
            &ctx,
            "synthesize",
            self.params.synthesis_timeout,
            self.gateway.enrich(&request),
        )
        .await
    }

    pub fn get_state(&self) -> AgentState {
        AgentState {
            agent_id: self.agent_id.clone(),
            agent_type: AgentType::Orchestrator,
            domain: String::new(),
            created_at: self.created_at,
            last_run: self.last_run,
            last_diagnosis: self.last_synthesis,
            bottleneck: self
                .current_plan
                .as_ref()
                .and_then(|plan| plan.top_bottleneck.clone()),
            actions_queued: Vec::new(),
            metrics: self.metrics,
            confidence_threshold: 0.0,
            max_retries: 0,
            timeout_seconds: self.params.synthesis_timeout.as_secs(),
        }
    }
}

#[async_trait]
impl Agent for Orchestrator {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn agent_type(&self) -> AgentType {
        AgentType::Orchestrator
    }

    /// Synthesize everything submitted since the last run.
    async fn run(&mut self) -> CycleResult {
        let reports = std::mem::take(&mut self.pending);
        match self.synthesize(reports).await {
            Ok(plan) => CycleResult {
                agent_id: self.agent_id.clone(),
                status: CycleStatus::Success,
                bottleneck: plan.top_bottleneck,
                error: None,
            },
            Err(e) => CycleResult::error(self.agent_id.clone(), e.to_string()),
        }
    }

    fn log_decision(&self, decision_type: &str, reasoning: &str, confidence: f64, context: Value) {
        info!("Orchestrator decision: {} ({})", decision_type, reasoning);
        self.ctx.decisions().log(
            DecisionRecord::new(&self.agent_id, decision_type)
                .with_reasoning(reasoning)
                .with_confidence(confidence)
                .with_context(context),
        );
    }

    fn log_error(&self, error: &dyn Display, context: Value) {
        error!(context = %context, "Orchestrator error: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<String, EnrichmentError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<String, EnrichmentError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EnrichmentGateway for ScriptedGateway {
        async fn enrich(&self, _request: &EnrichmentRequest) -> Result<String, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(EnrichmentError::NotConfigured))
        }
    }

    struct HangingGateway;

    #[async_trait]
    impl EnrichmentGateway for HangingGateway {
        async fn enrich(&self, _request: &EnrichmentRequest) -> Result<String, EnrichmentError> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    fn report(description: &str, impact: f64, confidence: f64, blocking: &[&str]) -> BottleneckReport {
        BottleneckReport::new(description, confidence, impact)
            .with_blocking(blocking.iter().copied())
            .attributed(description, description)
    }

    fn three_reports() -> Vec<BottleneckReport> {
        vec![
            report("five", 5.0, 0.8, &["release"]),
            report("eight", 8.0, 0.9, &["hiring"]),
            report("three", 3.0, 0.7, &["release"]),
        ]
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_empty_reports_skip_enrichment() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut orchestrator = Orchestrator::new(gateway.clone());

        let plan = orchestrator.synthesize(vec![]).await.unwrap();
        assert!(plan.top_bottleneck.is_none());
        assert!(plan.priority_ranking.is_empty());
        assert!(plan.cross_domain_conflicts.is_empty());
        assert!(plan.weekly_plan.is_empty());
        assert!(!plan.week.is_empty());
        assert_eq!(gateway.calls(), 0);
        assert_eq!(orchestrator.phase(), SynthesisPhase::Idle);
        assert!(orchestrator.last_synthesis().is_some());
    }

    #[tokio::test]
    async fn test_enriched_plan_with_missing_conflicts() {
        let gateway = ScriptedGateway::new(vec![Ok(r#"{
            "week": "2020-01-01",
            "top_bottleneck": {"description": "eight", "confidence": 0.9, "impact_score": 8},
            "priority_ranking": [
                {"description": "eight", "confidence": 0.9, "impact_score": 8},
                {"description": "five", "confidence": 0.8, "impact_score": 5}
            ],
            "weekly_plan": [
                {"action": "Open two reqs", "domain": "hiring", "priority": 12, "rationale": "blocks all"}
            ]
        }"#
        .to_string())]);
        let mut orchestrator = Orchestrator::new(gateway.clone());

        let plan = orchestrator.synthesize(three_reports()).await.unwrap();
        assert_eq!(gateway.calls(), 1);
        assert!(plan.cross_domain_conflicts.is_empty());
        assert_eq!(
            plan.top_bottleneck.as_ref().map(|b| b.description.as_str()),
            Some("eight")
        );
        assert_eq!(plan.priority_ranking.len(), 2);
        assert_eq!(plan.weekly_plan.len(), 1);
        assert_eq!(plan.weekly_plan[0].priority, 10);
        assert_ne!(plan.week, "2020-01-01");
        assert!(!orchestrator.fell_back());
        assert_eq!(orchestrator.current_plan(), Some(&plan));
    }

    #[tokio::test]
    async fn test_unparseable_response_uses_local_plan() {
        let gateway = ScriptedGateway::new(vec![Ok("Here is my plan: focus on hiring".to_string())]);
        let mut orchestrator = Orchestrator::new(gateway);

        let plan = orchestrator.synthesize(three_reports()).await.unwrap();
        let order: Vec<&str> = plan
            .priority_ranking
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(order, vec!["eight", "five", "three"]);
        assert_eq!(
            plan.top_bottleneck.as_ref().map(|b| b.description.as_str()),
            Some("eight")
        );
        assert_eq!(plan.cross_domain_conflicts.len(), 1);
        assert!(plan.weekly_plan.is_empty());
        assert!(plan.resource_allocation.is_empty());
        assert!(orchestrator.fell_back());
        assert_eq!(orchestrator.phase(), SynthesisPhase::Idle);
    }

    #[tokio::test]
    async fn test_collaborator_failure_propagates() {
        let gateway = ScriptedGateway::new(vec![
            Err(EnrichmentError::Unavailable("down".to_string())),
            Ok("not json".to_string()),
        ]);
        let mut orchestrator = Orchestrator::new(gateway);

        let err = orchestrator.synthesize(three_reports()).await.unwrap_err();
        assert_eq!(
            err,
            SynthesisError::Enrichment(EnrichmentError::Unavailable("down".to_string()))
        );
        assert!(orchestrator.current_plan().is_none());
        assert_eq!(orchestrator.phase(), SynthesisPhase::Idle);
        assert_eq!(orchestrator.get_state().metrics.errors, 1);

        // The machine is usable again after a failed cycle
        assert!(orchestrator.synthesize(three_reports()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collaborator_timeout_propagates() {
        let mut orchestrator = Orchestrator::new(Arc::new(HangingGateway)).with_params(
            OrchestrationParams::default().with_synthesis_timeout(Duration::from_secs(10)),
        );
        let err = orchestrator.synthesize(three_reports()).await.unwrap_err();
        assert_eq!(
            err,
            SynthesisError::Enrichment(EnrichmentError::Timeout(Duration::from_secs(10)))
        );
    }

    #[tokio::test]
    async fn test_input_reports_are_clamped() {
        let gateway = ScriptedGateway::new(vec![Ok("garbage".to_string())]);
        let mut orchestrator = Orchestrator::new(gateway);

        let mut wild = BottleneckReport::new("wild", 0.5, 5.0);
        wild.confidence = 4.0;
        wild.impact_score = 40.0;
        let plan = orchestrator.synthesize(vec![wild]).await.unwrap();
        assert_eq!(plan.priority_ranking[0].confidence, 1.0);
        assert_eq!(plan.priority_ranking[0].impact_score, 10.0);
    }

    #[tokio::test]
    async fn test_run_synthesizes_submitted_reports() {
        let gateway = ScriptedGateway::new(vec![Ok("{}".to_string())]);
        let mut orchestrator = Orchestrator::new(gateway);
        orchestrator.submit(three_reports());

        let result = orchestrator.run().await;
        assert!(result.is_success());
        // Every key missing: all defaults, including no top bottleneck
        assert!(result.bottleneck.is_none());
        assert_eq!(orchestrator.get_state().agent_type, AgentType::Orchestrator);
    }
}
