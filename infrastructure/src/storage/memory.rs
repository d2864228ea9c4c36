//! Process-local state store.

use super::state::StoreState;
use async_trait::async_trait;
use sentinel_application::ports::decision_logger::DecisionRecord;
use sentinel_application::ports::state_store::{AgentRecord, AgentReport, StateStore, StoreError};
use sentinel_domain::{BottleneckReport, WeeklyPlan};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: Mutex<StoreState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored so far.
    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // A poisoned lock still holds consistent data: every mutation is a
        // single insert or push.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn register_agent(&self, record: AgentRecord) -> Result<AgentRecord, StoreError> {
        Ok(self.lock().register(record))
    }

    async fn update_last_run(&self, agent_id: &str) -> Result<(), StoreError> {
        self.lock().touch(agent_id)
    }

    async fn save_bottleneck(
        &self,
        agent_id: &str,
        report: &BottleneckReport,
    ) -> Result<(), StoreError> {
        self.lock().save_bottleneck(agent_id, report)
    }

    async fn save_plan(&self, plan: &WeeklyPlan) -> Result<(), StoreError> {
        self.lock().plans.push(plan.clone());
        Ok(())
    }

    async fn log_decision(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        self.lock().decisions.push(record.clone());
        Ok(())
    }

    async fn get_agent_state(&self, agent_id: &str) -> Result<Option<AgentRecord>, StoreError> {
        Ok(self.lock().agents.get(agent_id).cloned())
    }

    async fn get_all_agents(&self) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self.lock().agents.values().cloned().collect())
    }

    async fn get_all_reports(&self) -> Result<Vec<AgentReport>, StoreError> {
        Ok(self.lock().reports())
    }
}
