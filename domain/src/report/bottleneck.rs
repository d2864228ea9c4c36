//! The bottleneck report value type.

use crate::core::score::{clamp_confidence, clamp_impact};
use serde::{Deserialize, Serialize};

/// Description used when an enrichment payload could not be parsed.
pub const PARSE_FAILURE_DESCRIPTION: &str = "Analysis failed - unable to parse response";

/// A single diagnosed obstacle in some domain.
///
/// `confidence` and `impact_score` are always inside their ranges: every
/// constructor and the `Deserialize` impl clamp them.
///
/// # Example
///
/// ```
/// use sentinel_domain::report::BottleneckReport;
///
/// let report = BottleneckReport::new("Review queue is stalled", 1.5, -3.0);
/// assert_eq!(report.confidence, 1.0);
/// assert_eq!(report.impact_score, 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawBottleneckReport")]
pub struct BottleneckReport {
    /// Human-readable description
    pub description: String,
    /// Confidence that this is a real bottleneck (0.0 to 1.0)
    pub confidence: f64,
    /// Estimated impact (0.0 to 10.0)
    pub impact_score: f64,
    /// Things this bottleneck blocks
    pub blocking: Vec<String>,
    /// Suggested next step
    pub recommended_action: String,
    /// Why the agent thinks this is a bottleneck
    pub reasoning: String,
    /// Source agent (attached by the orchestration layer)
    pub agent_id: String,
    /// Source domain (attached by the orchestration layer)
    pub domain: String,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawBottleneckReport {
    description: String,
    confidence: f64,
    impact_score: f64,
    blocking: Vec<String>,
    recommended_action: String,
    reasoning: String,
    agent_id: String,
    domain: String,
}

impl Default for RawBottleneckReport {
    fn default() -> Self {
        Self {
            description: String::new(),
            confidence: 0.0,
            impact_score: 0.0,
            blocking: Vec::new(),
            recommended_action: String::new(),
            reasoning: String::new(),
            agent_id: String::new(),
            domain: String::new(),
        }
    }
}

impl From<RawBottleneckReport> for BottleneckReport {
    fn from(raw: RawBottleneckReport) -> Self {
        Self {
            description: raw.description,
            confidence: clamp_confidence(raw.confidence),
            impact_score: clamp_impact(raw.impact_score),
            blocking: raw.blocking,
            recommended_action: raw.recommended_action,
            reasoning: raw.reasoning,
            agent_id: raw.agent_id,
            domain: raw.domain,
        }
    }
}

impl BottleneckReport {
    /// Create a report, clamping confidence and impact.
    pub fn new(description: impl Into<String>, confidence: f64, impact_score: f64) -> Self {
        Self {
            description: description.into(),
            confidence: clamp_confidence(confidence),
            impact_score: clamp_impact(impact_score),
            blocking: Vec::new(),
            recommended_action: String::new(),
            reasoning: String::new(),
            agent_id: String::new(),
            domain: String::new(),
        }
    }

    /// Stand-in report for a payload that could not be parsed.
    pub fn parse_failure() -> Self {
        Self::new(PARSE_FAILURE_DESCRIPTION, 0.0, 0.0)
            .with_recommended_action("Retry analysis")
            .with_reasoning("JSON parsing error")
    }

    /// Stand-in report for a diagnosis that failed outright.
    pub fn agent_error(message: impl std::fmt::Display) -> Self {
        Self::new(format!("Agent error: {}", message), 0.0, 0.0)
            .with_recommended_action("Check agent logs and retry")
            .with_reasoning("Exception during diagnosis")
    }

    pub fn with_blocking<I, S>(mut self, blocking: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocking = blocking.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recommended_action(mut self, action: impl Into<String>) -> Self {
        self.recommended_action = action.into();
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Attach the source agent identity.
    pub fn attributed(mut self, agent_id: impl Into<String>, domain: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self.domain = domain.into();
        self
    }

    /// Re-apply range clamping (for reports mutated after construction).
    pub fn clamped(mut self) -> Self {
        self.confidence = clamp_confidence(self.confidence);
        self.impact_score = clamp_impact(self.impact_score);
        self
    }

    /// Weighted impact used for ranking: `impact_score * confidence`.
    pub fn weighted_impact(&self) -> f64 {
        self.impact_score * self.confidence
    }

    /// Label for the source of this report: domain, then agent id.
    pub fn source_label(&self) -> &str {
        if !self.domain.is_empty() {
            &self.domain
        } else if !self.agent_id.is_empty() {
            &self.agent_id
        } else {
            "unknown"
        }
    }
}
