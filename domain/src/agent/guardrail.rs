//! Guardrail gate: confidence-threshold admission control.
//!
//! An agent may reason about anything, but it may only *act* when the
//! confidence asserted for an action clears its threshold. The threshold is
//! the single per-agent knob an operator turns to widen or narrow autonomy.

use super::action::Action;
use crate::core::score::clamp_confidence;

/// Default admission threshold.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Confidence threshold gate.
///
/// # Example
///
/// ```
/// use sentinel_domain::agent::{Action, Guardrail};
///
/// let gate = Guardrail::default();
/// assert!(!gate.can_execute(&Action::new("close_issue", 0.3)));
/// assert!(gate.can_execute(&Action::new("close_issue", 0.6)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guardrail {
    threshold: f64,
}

impl Guardrail {
    /// Create a gate; the threshold is clamped into `[0.0, 1.0]`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: clamp_confidence(threshold),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `action.confidence >= threshold`. Pure; no side effects.
    pub fn can_execute(&self, action: &Action) -> bool {
        action.confidence >= self.threshold
    }
}

impl Default for Guardrail {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}
