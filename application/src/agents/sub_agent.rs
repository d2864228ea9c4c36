//! Sub-agent: per-domain diagnostician and executor.

use super::Agent;
use super::diagnostician::{DiagnosisPayload, Diagnostician};
use crate::observability::{ObservabilityContext, instrumented_call};
use crate::ports::action_executor::{ActionError, ActionExecutor};
use crate::ports::decision_logger::DecisionRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use sentinel_domain::{
    Action, AgentMetrics, AgentSettings, AgentState, AgentType, BottleneckReport, CycleResult,
    ExecutionResult, Guardrail, parse_diagnosis_payload,
};
use serde_json::{Value, json};
use std::any::Any;
use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A domain agent.
///
/// Owns its latest report and action history. All mutation happens after
/// the external call has returned, so an interrupted diagnosis leaves no
/// partial state behind.
pub struct SubAgent {
    agent_id: String,
    domain: String,
    settings: AgentSettings,
    guardrail: Guardrail,
    diagnostician: Arc<dyn Diagnostician>,
    executor: Option<Arc<dyn ActionExecutor>>,
    ctx: ObservabilityContext,
    created_at: DateTime<Utc>,
    last_run: Option<DateTime<Utc>>,
    last_diagnosis: Option<DateTime<Utc>>,
    bottleneck: Option<BottleneckReport>,
    actions_queued: Vec<Action>,
    metrics: AgentMetrics,
}

impl SubAgent {
    pub fn new(
        agent_id: impl Into<String>,
        domain: impl Into<String>,
        diagnostician: Arc<dyn Diagnostician>,
    ) -> Self {
        let settings = AgentSettings::default();
        Self {
            agent_id: agent_id.into(),
            domain: domain.into(),
            guardrail: settings.guardrail(),
            settings,
            diagnostician,
            executor: None,
            ctx: ObservabilityContext::default(),
            created_at: Utc::now(),
            last_run: None,
            last_diagnosis: None,
            bottleneck: None,
            actions_queued: Vec::new(),
            metrics: AgentMetrics::default(),
        }
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.guardrail = settings.guardrail();
        self.settings = settings;
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_context(mut self, ctx: ObservabilityContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn guardrail(&self) -> Guardrail {
        self.guardrail
    }

    pub fn metrics(&self) -> AgentMetrics {
        self.metrics
    }

    fn scoped_context(&self) -> ObservabilityContext {
        self.ctx.for_agent(&self.agent_id, &self.domain)
    }

    /// Produce this cycle's bottleneck report.
    ///
    /// Never fails: malformed output becomes a parse-failure report and
    /// collaborator failures become an agent-error report (counted in
    /// `metrics.errors`).
    pub async fn diagnose(&mut self) -> BottleneckReport {
        let ctx = self.scoped_context();
        let diagnostician = Arc::clone(&self.diagnostician);
        let result = instrumented_call(
            &ctx,
            "diagnose",
            self.settings.timeout,
            diagnostician.diagnose(&self.domain),
        )
        .await;

        match result {
            Ok(DiagnosisPayload::Report(report)) => {
                let report = report.clamped();
                self.record_diagnosis(&report);
                report
            }
            Ok(DiagnosisPayload::Text(text)) => match parse_diagnosis_payload(&text) {
                Ok(parsed) => {
                    for field in &parsed.missing_fields {
                        warn!(
                            "Agent {}: diagnosis is missing field '{}', using default",
                            self.agent_id, field
                        );
                    }
                    for field in &parsed.mistyped_fields {
                        warn!(
                            "Agent {}: diagnosis field '{}' has the wrong type, using default",
                            self.agent_id, field
                        );
                    }
                    self.record_diagnosis(&parsed.report);
                    parsed.report
                }
                Err(e) => {
                    warn!("Agent {}: unparseable diagnosis: {}", self.agent_id, e);
                    BottleneckReport::parse_failure()
                }
            },
            Err(e) => {
                self.metrics.errors += 1;
                self.log_error(&e, json!({ "operation": "diagnose" }));
                BottleneckReport::agent_error(e)
            }
        }
    }

    fn record_diagnosis(&self, report: &BottleneckReport) {
        self.log_decision(
            self.diagnostician.decision_type(),
            &report.reasoning,
            report.confidence,
            json!({
                "finding": report.description,
                "impact_score": report.impact_score,
            }),
        );
    }

    /// Perform `action` if the guardrail admits it.
    ///
    /// A blocked action is a normal outcome, not an error. Executor errors
    /// are counted and propagated.
    pub async fn execute(&mut self, action: Action) -> Result<ExecutionResult, ActionError> {
        if !self.guardrail.can_execute(&action) {
            info!(
                "Agent {}: blocked '{}' (confidence {:.2} < threshold {:.2})",
                self.agent_id,
                action.action_type,
                action.confidence,
                self.guardrail.threshold()
            );
            return Ok(ExecutionResult::blocked());
        }

        self.actions_queued.push(action.clone());

        let Some(executor) = self.executor.clone() else {
            return Ok(ExecutionResult::not_implemented());
        };

        let ctx = self.scoped_context();
        match instrumented_call(&ctx, "execute", self.settings.timeout, executor.perform(&action))
            .await
        {
            Ok(result) => {
                self.metrics.actions_executed += 1;
                info!(
                    "Agent {}: executed '{}' -> {}",
                    self.agent_id, action.action_type, result.status
                );
                Ok(result)
            }
            Err(e) => {
                self.metrics.errors += 1;
                self.log_error(
                    &e,
                    json!({ "operation": "execute", "action": action.action_type }),
                );
                Err(e)
            }
        }
    }

    /// Pure snapshot of the agent.
    pub fn get_state(&self) -> AgentState {
        AgentState {
            agent_id: self.agent_id.clone(),
            agent_type: AgentType::SubAgent,
            domain: self.domain.clone(),
            created_at: self.created_at,
            last_run: self.last_run,
            last_diagnosis: self.last_diagnosis,
            bottleneck: self.bottleneck.clone(),
            actions_queued: self.actions_queued.clone(),
            metrics: self.metrics,
            confidence_threshold: self.guardrail.threshold(),
            max_retries: self.settings.max_retries,
            timeout_seconds: self.settings.timeout.as_secs(),
        }
    }
}

#[async_trait]
impl Agent for SubAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn agent_type(&self) -> AgentType {
        AgentType::SubAgent
    }

    /// One diagnostic cycle. A panicking diagnostician is contained here and
    /// reported as an error result.
    async fn run(&mut self) -> CycleResult {
        info!("Agent {}: starting diagnostic cycle", self.agent_id);
        match AssertUnwindSafe(self.diagnose()).catch_unwind().await {
            Ok(report) => {
                let now = Utc::now();
                self.bottleneck = Some(report.clone());
                self.last_diagnosis = Some(now);
                self.last_run = Some(now);
                self.metrics.diagnoses_run += 1;
                self.log_decision(
                    "diagnosis",
                    &report.description,
                    report.confidence,
                    json!({ "bottleneck": report }),
                );
                CycleResult::success(self.agent_id.clone(), report)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                self.metrics.errors += 1;
                self.log_error(&message, json!({ "operation": "run" }));
                CycleResult::error(self.agent_id.clone(), message)
            }
        }
    }

    fn log_decision(&self, decision_type: &str, reasoning: &str, confidence: f64, context: Value) {
        info!(
            "Agent {}: decision {} (confidence {:.2})",
            self.agent_id, decision_type, confidence
        );
        self.ctx.decisions().log(
            DecisionRecord::new(&self.agent_id, decision_type)
                .with_reasoning(reasoning)
                .with_confidence(confidence)
                .with_context(context),
        );
    }

    fn log_error(&self, error: &dyn Display, context: Value) {
        error!(
            agent.id = %self.agent_id,
            context = %context,
            "Agent {} error: {}",
            self.agent_id,
            error
        );
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "diagnosis panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::diagnostician::{DiagnosisError, EnrichedDiagnostician};
    use crate::ports::decision_logger::DecisionLogger;
    use crate::ports::enrichment::{EnrichmentError, EnrichmentGateway, EnrichmentRequest};
    use sentinel_domain::DiagnosisProfile;
    use sentinel_domain::report::bottleneck::PARSE_FAILURE_DESCRIPTION;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<String, EnrichmentError>>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<String, EnrichmentError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(VecDeque::from(responses)),
            })
        }
    }

    #[async_trait]
    impl EnrichmentGateway for ScriptedGateway {
        async fn enrich(&self, _request: &EnrichmentRequest) -> Result<String, EnrichmentError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(EnrichmentError::Unavailable("script exhausted".into())))
        }
    }

    struct PanickingDiagnostician;

    #[async_trait]
    impl Diagnostician for PanickingDiagnostician {
        fn decision_type(&self) -> &'static str {
            "diagnosis_scan"
        }

        async fn diagnose(&self, _domain: &str) -> Result<DiagnosisPayload, DiagnosisError> {
            panic!("diagnostician exploded");
        }
    }

    struct HangingDiagnostician;

    #[async_trait]
    impl Diagnostician for HangingDiagnostician {
        fn decision_type(&self) -> &'static str {
            "diagnosis_scan"
        }

        async fn diagnose(&self, _domain: &str) -> Result<DiagnosisPayload, DiagnosisError> {
            std::future::pending::<()>().await;
            Ok(DiagnosisPayload::Text(String::new()))
        }
    }

    struct EchoExecutor;

    #[async_trait]
    impl ActionExecutor for EchoExecutor {
        async fn perform(&self, action: &Action) -> Result<ExecutionResult, ActionError> {
            Ok(ExecutionResult::success(format!("did {}", action.action_type)))
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl ActionExecutor for FailingExecutor {
        async fn perform(&self, _action: &Action) -> Result<ExecutionResult, ActionError> {
            Err(ActionError::Failed("remote said no".to_string()))
        }
    }

    #[derive(Default)]
    struct CollectingLogger {
        records: Mutex<Vec<DecisionRecord>>,
    }

    impl DecisionLogger for CollectingLogger {
        fn log(&self, record: DecisionRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    fn agent_with(responses: Vec<Result<String, EnrichmentError>>) -> SubAgent {
        let gateway = ScriptedGateway::new(responses);
        SubAgent::new(
            "gh-1",
            "github-triage",
            Arc::new(EnrichedDiagnostician::new(
                gateway,
                DiagnosisProfile::GitHubTriage,
            )),
        )
    }

    const FULL_PAYLOAD: &str = r#"{
        "description": "Review queue is stalled",
        "confidence": 0.8,
        "impact_score": 7,
        "blocking": ["release 2.1"],
        "recommended_action": "Add a second reviewer",
        "reasoning": "12 PRs older than a week"
    }"#;

    // ==================== diagnose ====================

    #[tokio::test]
    async fn test_diagnose_parses_payload() {
        let mut agent = agent_with(vec![Ok(FULL_PAYLOAD.to_string())]);
        let report = agent.diagnose().await;
        assert_eq!(report.description, "Review queue is stalled");
        assert_eq!(report.impact_score, 7.0);
        assert_eq!(report.blocking, vec!["release 2.1".to_string()]);
        assert_eq!(agent.metrics().errors, 0);
    }

    #[tokio::test]
    async fn test_diagnose_clamps_out_of_range() {
        let mut agent = agent_with(vec![Ok(
            r#"{"description": "x", "confidence": 1.7, "impact_score": -3}"#.to_string(),
        )]);
        let report = agent.diagnose().await;
        assert_eq!(report.confidence, 1.0);
        assert_eq!(report.impact_score, 0.0);
    }

    #[tokio::test]
    async fn test_diagnose_defaults_missing_fields() {
        let mut agent = agent_with(vec![Ok(r#"{"description": "partial"}"#.to_string())]);
        let report = agent.diagnose().await;
        assert_eq!(report.description, "partial");
        assert_eq!(report.confidence, 0.0);
        assert!(report.blocking.is_empty());
        assert_eq!(report.recommended_action, "");
    }

    #[tokio::test]
    async fn test_diagnose_malformed_payload() {
        let mut agent = agent_with(vec![Ok("I think the bottleneck is reviews".to_string())]);
        let report = agent.diagnose().await;
        assert_eq!(report.description, PARSE_FAILURE_DESCRIPTION);
        assert_eq!(report.confidence, 0.0);
        assert_eq!(report.recommended_action, "Retry analysis");
        assert_eq!(agent.metrics().errors, 0);
    }

    #[tokio::test]
    async fn test_diagnose_failing_collaborator() {
        let mut agent = agent_with(vec![Err(EnrichmentError::Unavailable(
            "connection refused".to_string(),
        ))]);
        let report = agent.diagnose().await;
        assert_eq!(report.confidence, 0.0);
        assert_eq!(report.impact_score, 0.0);
        assert!(report.description.starts_with("Agent error: "));
        assert!(report.description.contains("connection refused"));
        assert_eq!(report.recommended_action, "Check agent logs and retry");
        assert_eq!(agent.metrics().errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_diagnose_timeout_is_an_agent_error() {
        let mut agent = SubAgent::new("slow", "generic", Arc::new(HangingDiagnostician))
            .with_settings(AgentSettings::default().with_timeout(Duration::from_secs(2)));
        let report = agent.diagnose().await;
        assert!(report.description.starts_with("Agent error: "));
        assert_eq!(agent.metrics().errors, 1);
    }

    #[tokio::test]
    async fn test_diagnose_logs_decision() {
        let logger = Arc::new(CollectingLogger::default());
        let mut agent = agent_with(vec![Ok(FULL_PAYLOAD.to_string())])
            .with_context(ObservabilityContext::new("run-1").with_decision_logger(logger.clone()));
        agent.diagnose().await;

        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decision_type, "github_triage_scan");
        assert_eq!(records[0].confidence, 0.8);
        assert_eq!(records[0].context["finding"], "Review queue is stalled");
    }

    // ==================== execute ====================

    #[tokio::test]
    async fn test_execute_blocked_below_threshold() {
        let mut agent = agent_with(vec![]).with_executor(Arc::new(EchoExecutor));
        let result = agent.execute(Action::new("assign_issue", 0.3)).await.unwrap();
        assert!(result.is_blocked());
        assert_eq!(result.field_str("reason"), Some("Failed confidence threshold"));
        assert_eq!(agent.metrics().actions_executed, 0);
        assert!(agent.get_state().actions_queued.is_empty());
    }

    #[tokio::test]
    async fn test_execute_admitted_at_threshold() {
        let mut agent = agent_with(vec![]).with_executor(Arc::new(EchoExecutor));
        let result = agent.execute(Action::new("assign_issue", 0.5)).await.unwrap();
        assert_eq!(result.status, "success");
        assert_eq!(agent.metrics().actions_executed, 1);
        assert_eq!(agent.get_state().actions_queued.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_without_executor() {
        let mut agent = agent_with(vec![]);
        let result = agent.execute(Action::new("assign_issue", 0.9)).await.unwrap();
        assert_eq!(result.status, "not_implemented");
        assert_eq!(agent.metrics().actions_executed, 0);
    }

    #[tokio::test]
    async fn test_execute_executor_error_propagates() {
        let mut agent = agent_with(vec![]).with_executor(Arc::new(FailingExecutor));
        let err = agent
            .execute(Action::new("close_issue", 0.9))
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::Failed("remote said no".to_string()));
        assert_eq!(agent.metrics().errors, 1);
        assert_eq!(agent.metrics().actions_executed, 0);
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let mut agent = agent_with(vec![])
            .with_settings(AgentSettings::default().with_confidence_threshold(0.9))
            .with_executor(Arc::new(EchoExecutor));
        let result = agent.execute(Action::new("assign_issue", 0.6)).await.unwrap();
        assert!(result.is_blocked());
    }

    // ==================== run / get_state ====================

    #[tokio::test]
    async fn test_run_updates_state() {
        let mut agent = agent_with(vec![Ok(FULL_PAYLOAD.to_string())]);
        let result = agent.run().await;
        assert!(result.is_success());
        assert_eq!(
            result.bottleneck.as_ref().map(|b| b.description.as_str()),
            Some("Review queue is stalled")
        );

        let state = agent.get_state();
        assert_eq!(state.metrics.diagnoses_run, 1);
        assert!(state.last_run.is_some());
        assert!(state.last_diagnosis.is_some());
        assert_eq!(state.bottleneck, result.bottleneck);
    }

    #[tokio::test]
    async fn test_run_logs_diagnosis_for_every_outcome() {
        let logger = Arc::new(CollectingLogger::default());
        let mut agent = agent_with(vec![
            Ok("not json".to_string()),
            Err(EnrichmentError::NotConfigured),
        ])
        .with_context(ObservabilityContext::new("run-1").with_decision_logger(logger.clone()));

        agent.run().await;
        agent.run().await;

        let records = logger.records.lock().unwrap();
        let types: Vec<&str> = records.iter().map(|r| r.decision_type.as_str()).collect();
        assert_eq!(types, vec!["diagnosis", "diagnosis"]);
        assert_eq!(records[0].context["bottleneck"]["description"], PARSE_FAILURE_DESCRIPTION);
        assert_eq!(records[1].confidence, 0.0);
    }

    #[tokio::test]
    async fn test_run_with_failing_collaborator_still_succeeds() {
        let mut agent = agent_with(vec![Err(EnrichmentError::NotConfigured)]);
        let result = agent.run().await;
        assert!(result.is_success());
        assert_eq!(agent.metrics().errors, 1);
        assert_eq!(agent.metrics().diagnoses_run, 1);
    }

    #[tokio::test]
    async fn test_run_contains_panic() {
        let mut agent = SubAgent::new("boom", "generic", Arc::new(PanickingDiagnostician));
        let result = agent.run().await;
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("diagnostician exploded"));

        let state = agent.get_state();
        assert_eq!(state.metrics.errors, 1);
        assert_eq!(state.metrics.diagnoses_run, 0);
        assert!(state.bottleneck.is_none());
        assert!(state.last_run.is_none());
    }

    #[tokio::test]
    async fn test_get_state_is_idempotent() {
        let mut agent = agent_with(vec![Ok(FULL_PAYLOAD.to_string())]);
        agent.run().await;
        let first = agent.get_state();
        let second = agent.get_state();
        assert_eq!(first, second);
        assert_eq!(first.agent_type, AgentType::SubAgent);
        assert_eq!(first.confidence_threshold, 0.5);
        assert_eq!(first.timeout_seconds, 3600);
    }
}
