//! Application-level configuration.
//!
//! These types control how use cases and agents behave at runtime. They are
//! built by the binary from the loaded file configuration.

use sentinel_domain::AgentSettings;
use sentinel_domain::agent::entities::DEFAULT_TIMEOUT;
use std::time::Duration;

/// Identifier the orchestrator uses in logs and decisions.
pub const ORCHESTRATOR_ID: &str = "orchestrator";

/// Orchestrator behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationParams {
    pub orchestrator_id: String,
    /// Upper bound on the synthesis enrichment call.
    pub synthesis_timeout: Duration,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            orchestrator_id: ORCHESTRATOR_ID.to_string(),
            synthesis_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OrchestrationParams {
    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    /// Creates params with the synthesis timeout given in seconds.
    pub fn from_timeout_seconds(seconds: u64) -> Self {
        Self::default().with_synthesis_timeout(Duration::from_secs(seconds))
    }
}

/// Defaults applied to every agent the registry creates, unless the
/// registration overrides the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentDefaults {
    pub settings: AgentSettings,
}

impl AgentDefaults {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }

    /// Settings for one agent, applying an optional threshold override.
    pub fn settings_for(&self, threshold: Option<f64>) -> AgentSettings {
        match threshold {
            Some(threshold) => self.settings.with_confidence_threshold(threshold),
            None => self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestration_defaults() {
        let params = OrchestrationParams::default();
        assert_eq!(params.orchestrator_id, "orchestrator");
        assert_eq!(params.synthesis_timeout, Duration::from_secs(3600));
        assert_eq!(
            OrchestrationParams::from_timeout_seconds(90).synthesis_timeout,
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_threshold_override() {
        let defaults = AgentDefaults::new(AgentSettings::default().with_max_retries(7));
        let overridden = defaults.settings_for(Some(0.8));
        assert_eq!(overridden.confidence_threshold, 0.8);
        assert_eq!(overridden.max_retries, 7);
        assert_eq!(defaults.settings_for(None).confidence_threshold, 0.5);
    }
}
