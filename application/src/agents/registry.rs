//! Agent registry
//!
//! Maps each domain to the factory that assembles its sub-agent. Dispatch is
//! an exact lookup on the domain name; anything unregistered gets the
//! generic factory. Each agent lives behind its own async mutex, so at most
//! one `run()` or `execute()` is in flight per agent id.

use super::diagnostician::Diagnostician;
use super::sub_agent::SubAgent;
use crate::config::AgentDefaults;
use crate::observability::ObservabilityContext;
use crate::ports::action_executor::ActionExecutor;
use crate::ports::state_store::{AgentRecord, StateStore, StoreError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A registered sub-agent, shared between the registry and in-flight tasks.
pub type SharedSubAgent = Arc<Mutex<SubAgent>>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Failed to persist registration: {0}")]
    Store(#[from] StoreError),
}

/// The domain-specific parts of a sub-agent.
pub struct DomainComponents {
    pub diagnostician: Arc<dyn Diagnostician>,
    pub executor: Option<Arc<dyn ActionExecutor>>,
}

impl DomainComponents {
    pub fn new(diagnostician: Arc<dyn Diagnostician>) -> Self {
        Self {
            diagnostician,
            executor: None,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }
}

/// Assembles the components for a domain.
pub trait AgentFactory: Send + Sync {
    fn components(&self, domain: &str) -> DomainComponents;
}

impl<F> AgentFactory for F
where
    F: Fn(&str) -> DomainComponents + Send + Sync,
{
    fn components(&self, domain: &str) -> DomainComponents {
        self(domain)
    }
}

pub struct AgentRegistry {
    factories: HashMap<String, Arc<dyn AgentFactory>>,
    generic: Arc<dyn AgentFactory>,
    agents: BTreeMap<String, SharedSubAgent>,
    domains: BTreeMap<String, String>,
    defaults: AgentDefaults,
    ctx: ObservabilityContext,
    store: Option<Arc<dyn StateStore>>,
}

impl AgentRegistry {
    pub fn new(generic: Arc<dyn AgentFactory>) -> Self {
        Self {
            factories: HashMap::new(),
            generic,
            agents: BTreeMap::new(),
            domains: BTreeMap::new(),
            defaults: AgentDefaults::default(),
            ctx: ObservabilityContext::default(),
            store: None,
        }
    }

    pub fn with_factory(mut self, domain: impl Into<String>, factory: Arc<dyn AgentFactory>) -> Self {
        self.factories.insert(domain.into(), factory);
        self
    }

    pub fn with_defaults(mut self, defaults: AgentDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_context(mut self, ctx: ObservabilityContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Mirror registrations to a state store.
    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a sub-agent, or return the one already registered under
    /// `agent_id`.
    pub async fn register(
        &mut self,
        agent_id: &str,
        domain: &str,
        confidence_threshold: Option<f64>,
    ) -> Result<SharedSubAgent, RegistryError> {
        if let Some(existing) = self.agents.get(agent_id) {
            debug!("Agent {} already registered", agent_id);
            return Ok(Arc::clone(existing));
        }
        if agent_id.trim().is_empty() {
            return Err(RegistryError::InvalidRegistration(
                "agent_id cannot be empty".to_string(),
            ));
        }
        if domain.trim().is_empty() {
            return Err(RegistryError::InvalidRegistration(format!(
                "agent '{}' has an empty domain",
                agent_id
            )));
        }

        if let Some(store) = &self.store {
            store
                .register_agent(
                    AgentRecord::new(agent_id, domain)
                        .with_confidence_threshold(confidence_threshold),
                )
                .await?;
        }

        let factory = self
            .factories
            .get(domain)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.generic));
        let components = factory.components(domain);

        let mut agent = SubAgent::new(agent_id, domain, components.diagnostician)
            .with_settings(self.defaults.settings_for(confidence_threshold))
            .with_context(self.ctx.clone());
        if let Some(executor) = components.executor {
            agent = agent.with_executor(executor);
        }

        info!("Registered agent {} ({})", agent_id, domain);
        let shared = Arc::new(Mutex::new(agent));
        self.agents.insert(agent_id.to_string(), Arc::clone(&shared));
        self.domains.insert(agent_id.to_string(), domain.to_string());
        Ok(shared)
    }

    pub fn get(&self, agent_id: &str) -> Result<SharedSubAgent, RegistryError> {
        self.agents
            .get(agent_id)
            .map(Arc::clone)
            .ok_or_else(|| RegistryError::UnknownAgent(agent_id.to_string()))
    }

    pub fn domain_of(&self, agent_id: &str) -> Option<&str> {
        self.domains.get(agent_id).map(String::as_str)
    }

    /// Registered agents, ordered by id.
    pub fn agents(&self) -> impl Iterator<Item = (&str, &SharedSubAgent)> {
        self.agents.iter().map(|(id, agent)| (id.as_str(), agent))
    }

    pub fn ids(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
