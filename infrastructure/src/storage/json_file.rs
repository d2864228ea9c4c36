//! JSON-file state store.
//!
//! The whole [`StoreState`] lives in one JSON document. It is loaded on
//! open and rewritten (via a sibling temp file and rename) after every
//! mutation, so a crash never leaves a half-written document behind.

use super::state::StoreState;
use async_trait::async_trait;
use sentinel_application::ports::decision_logger::DecisionRecord;
use sentinel_application::ports::state_store::{AgentRecord, AgentReport, StateStore, StoreError};
use sentinel_domain::{BottleneckReport, WeeklyPlan};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct JsonFileStateStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStateStore {
    /// Open the store at `path`, starting empty when the file doesn't exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StoreError::Serialization(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No state at {}, starting empty", path.display());
                StoreState::default()
            }
            Err(e) => return Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> StoreState {
        self.state.lock().await.clone()
    }

    /// Apply `mutation` to a copy of the state and persist it. The copy
    /// replaces the in-memory state only once it is on disk, so a failed
    /// mutation or a failed write leaves both unchanged.
    async fn mutate<T>(
        &self,
        mutation: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let value = mutation(&mut next)?;
        self.write(&next).await?;
        *state = next;
        Ok(value)
    }

    async fn write(&self, state: &StoreState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", self.path.display(), e)))?;
        debug!("State written to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn register_agent(&self, record: AgentRecord) -> Result<AgentRecord, StoreError> {
        if let Some(existing) = self.state.lock().await.agents.get(&record.agent_id) {
            return Ok(existing.clone());
        }
        self.mutate(|state| Ok(state.register(record))).await
    }

    async fn update_last_run(&self, agent_id: &str) -> Result<(), StoreError> {
        self.mutate(|state| state.touch(agent_id)).await
    }

    async fn save_bottleneck(
        &self,
        agent_id: &str,
        report: &BottleneckReport,
    ) -> Result<(), StoreError> {
        self.mutate(|state| state.save_bottleneck(agent_id, report))
            .await
    }

    async fn save_plan(&self, plan: &WeeklyPlan) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.plans.push(plan.clone());
            Ok(())
        })
        .await
    }

    async fn log_decision(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.decisions.push(record.clone());
            Ok(())
        })
        .await
    }

    async fn get_agent_state(&self, agent_id: &str) -> Result<Option<AgentRecord>, StoreError> {
        Ok(self.state.lock().await.agents.get(agent_id).cloned())
    }

    async fn get_all_agents(&self) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self.state.lock().await.agents.values().cloned().collect())
    }

    async fn get_all_reports(&self) -> Result<Vec<AgentReport>, StoreError> {
        Ok(self.state.lock().await.reports())
    }
}
