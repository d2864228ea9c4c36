//! Orchestration domain
//!
//! The per-cycle state machine the orchestrator walks while synthesizing.
//!
//! ```text
//! Idle ─▶ Collecting ─▶ Ranking ─▶ Enriching ─▶ Finalizing ─▶ Idle
//!            │                        │  (fallback)  ▲
//!            │                        └──────────────┘
//!            └──(no reports)──▶ Finalizing
//! ```

pub mod phase;

pub use phase::{SynthesisMachine, SynthesisPhase};
