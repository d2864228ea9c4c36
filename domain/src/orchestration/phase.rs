//! Synthesis phases and their allowed transitions.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Phase of one synthesis cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisPhase {
    #[default]
    Idle,
    Collecting,
    Ranking,
    Enriching,
    Finalizing,
}

impl SynthesisPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisPhase::Idle => "idle",
            SynthesisPhase::Collecting => "collecting",
            SynthesisPhase::Ranking => "ranking",
            SynthesisPhase::Enriching => "enriching",
            SynthesisPhase::Finalizing => "finalizing",
        }
    }

    /// Whether `self -> next` is a legal edge.
    ///
    /// `Enriching -> Finalizing` doubles as the fallback edge and
    /// `Collecting -> Finalizing` as the empty-input shortcut.
    pub fn can_transition_to(&self, next: SynthesisPhase) -> bool {
        use SynthesisPhase::*;
        matches!(
            (self, next),
            (Idle, Collecting)
                | (Collecting, Ranking)
                | (Collecting, Finalizing)
                | (Ranking, Enriching)
                | (Enriching, Finalizing)
                | (Finalizing, Idle)
        )
    }
}

impl std::fmt::Display for SynthesisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the current phase and records whether the fallback edge was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisMachine {
    phase: SynthesisPhase,
    fell_back: bool,
}

impl SynthesisMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SynthesisPhase {
        self.phase
    }

    /// Whether the current cycle abandoned enrichment.
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }

    /// Move to `next`, rejecting illegal edges.
    pub fn advance(&mut self, next: SynthesisPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        if next == SynthesisPhase::Collecting {
            self.fell_back = false;
        }
        self.phase = next;
        Ok(())
    }

    /// Take the `Enriching -> Finalizing` edge as a fallback.
    pub fn fall_back(&mut self) -> Result<(), DomainError> {
        if self.phase != SynthesisPhase::Enriching {
            return Err(DomainError::InvalidTransition {
                from: self.phase.to_string(),
                to: SynthesisPhase::Finalizing.to_string(),
            });
        }
        self.fell_back = true;
        self.phase = SynthesisPhase::Finalizing;
        Ok(())
    }

    /// Abort the cycle (used when synthesis fails loudly).
    pub fn reset(&mut self) {
        self.phase = SynthesisPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SynthesisPhase::*;

    #[test]
    fn test_happy_path() {
        let mut machine = SynthesisMachine::new();
        for next in [Collecting, Ranking, Enriching, Finalizing, Idle] {
            machine.advance(next).unwrap();
        }
        assert_eq!(machine.phase(), Idle);
        assert!(!machine.fell_back());
    }

    #[test]
    fn test_fallback_edge() {
        let mut machine = SynthesisMachine::new();
        machine.advance(Collecting).unwrap();
        machine.advance(Ranking).unwrap();
        machine.advance(Enriching).unwrap();
        machine.fall_back().unwrap();
        assert_eq!(machine.phase(), Finalizing);
        assert!(machine.fell_back());

        // A new cycle clears the flag
        machine.advance(Idle).unwrap();
        machine.advance(Collecting).unwrap();
        assert!(!machine.fell_back());
    }

    #[test]
    fn test_empty_shortcut() {
        let mut machine = SynthesisMachine::new();
        machine.advance(Collecting).unwrap();
        machine.advance(Finalizing).unwrap();
        machine.advance(Idle).unwrap();
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mut machine = SynthesisMachine::new();
        assert!(machine.advance(Enriching).is_err());
        assert!(machine.fall_back().is_err());
        assert_eq!(machine.phase(), Idle);
    }

    #[test]
    fn test_reset() {
        let mut machine = SynthesisMachine::new();
        machine.advance(Collecting).unwrap();
        machine.advance(Ranking).unwrap();
        machine.reset();
        assert_eq!(machine.phase(), Idle);
        machine.advance(Collecting).unwrap();
    }
}
