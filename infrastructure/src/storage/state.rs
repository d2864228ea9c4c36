use sentinel_application::ports::decision_logger::DecisionRecord;
use sentinel_application::ports::state_store::{AgentRecord, AgentReport, StoreError};
use sentinel_domain::{BottleneckReport, WeeklyPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreState {
    pub agents: BTreeMap<String, AgentRecord>,
    /// Latest report per agent id
    pub reports: BTreeMap<String, BottleneckReport>,
    pub plans: Vec<WeeklyPlan>,
    pub decisions: Vec<DecisionRecord>,
}

impl StoreState {
    pub(super) fn register(&mut self, record: AgentRecord) -> AgentRecord {
        self.agents
            .entry(record.agent_id.clone())
            .or_insert(record)
            .clone()
    }

    fn agent_mut(&mut self, agent_id: &str) -> Result<&mut AgentRecord, StoreError> {
        self.agents
            .get_mut(agent_id)
            .ok_or_else(|| StoreError::UnknownAgent(agent_id.to_string()))
    }

    pub(super) fn touch(&mut self, agent_id: &str) -> Result<(), StoreError> {
        self.agent_mut(agent_id)?.last_run = Some(chrono::Utc::now());
        Ok(())
    }

    pub(super) fn save_bottleneck(
        &mut self,
        agent_id: &str,
        report: &BottleneckReport,
    ) -> Result<(), StoreError> {
        self.agent_mut(agent_id)?;
        self.reports.insert(agent_id.to_string(), report.clone());
        Ok(())
    }

    pub(super) fn reports(&self) -> Vec<AgentReport> {
        self.agents
            .values()
            .map(|agent| AgentReport {
                agent_id: agent.agent_id.clone(),
                domain: agent.domain.clone(),
                bottleneck: self.reports.get(&agent.agent_id).cloned(),
                last_run: agent.last_run,
            })
            .collect()
    }

    pub fn latest_plan(&self) -> Option<&WeeklyPlan> {
        self.plans.last()
    }
}
