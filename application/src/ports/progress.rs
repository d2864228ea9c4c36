//! Progress notification port
//!
//! Defines the interface for reporting progress during a run cycle.

use std::fmt;

/// Phases of a run cycle, as seen by a progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Diagnose,
    Synthesize,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Diagnose => "diagnose",
            CyclePhase::Synthesize => "synthesize",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CyclePhase::Diagnose => "Diagnosing",
            CyclePhase::Synthesize => "Synthesizing",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback for progress updates during a run cycle
///
/// Implementations live in the presentation layer.
pub trait CycleProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: CyclePhase, total_tasks: usize);

    /// Called when one agent finishes within a phase
    fn on_agent_complete(&self, phase: CyclePhase, agent_id: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: CyclePhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoCycleProgress;

impl CycleProgressNotifier for NoCycleProgress {
    fn on_phase_start(&self, _phase: CyclePhase, _total_tasks: usize) {}
    fn on_agent_complete(&self, _phase: CyclePhase, _agent_id: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: CyclePhase) {}
}
