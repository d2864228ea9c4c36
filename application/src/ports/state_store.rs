//! Persistence port
//!
//! The relational store of the deployed system sits behind this trait. The
//! core only needs a handful of operations: registering agents, recording
//! reports, plans, and decisions, and reading back the latest state.

use super::decision_logger::DecisionRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentinel_domain::{BottleneckReport, WeeklyPlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a state store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

/// A registered agent, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: String,
    pub domain: String,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Per-agent override of the configured default threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

impl AgentRecord {
    pub fn new(agent_id: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            domain: domain.into(),
            registered_at: Utc::now(),
            last_run: None,
            confidence_threshold: None,
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: Option<f64>) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

/// The latest report of one registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub agent_id: String,
    pub domain: String,
    pub bottleneck: Option<BottleneckReport>,
    pub last_run: Option<DateTime<Utc>>,
}

/// Persistence for agents, reports, plans, and decisions.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Register an agent. Registering an existing id returns the stored record.
    async fn register_agent(&self, record: AgentRecord) -> Result<AgentRecord, StoreError>;

    /// Stamp the agent's `last_run` with the current time.
    async fn update_last_run(&self, agent_id: &str) -> Result<(), StoreError>;

    async fn save_bottleneck(
        &self,
        agent_id: &str,
        report: &BottleneckReport,
    ) -> Result<(), StoreError>;

    async fn save_plan(&self, plan: &WeeklyPlan) -> Result<(), StoreError>;

    async fn log_decision(&self, record: &DecisionRecord) -> Result<(), StoreError>;

    async fn get_agent_state(&self, agent_id: &str) -> Result<Option<AgentRecord>, StoreError>;

    async fn get_all_agents(&self) -> Result<Vec<AgentRecord>, StoreError>;

    /// Latest report of every registered agent (absent when never diagnosed).
    async fn get_all_reports(&self) -> Result<Vec<AgentReport>, StoreError>;
}
