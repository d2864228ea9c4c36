//! Planning domain - ranking, conflict detection, and the weekly plan.
//!
//! # Flow
//!
//! ```text
//! reports ──rank_by_impact──▶ ranked ──find_conflicts──▶ conflicts
//!                               │
//!                               ├── enrichment response ──parse_synthesis_response──▶ WeeklyPlan
//!                               └── (unparseable) ──WeeklyPlan::local_fallback──▶ WeeklyPlan
//! ```
//!
//! Everything here is pure and deterministic.

pub mod conflict;
pub mod parsing;
pub mod plan;
pub mod ranking;

pub use conflict::{Conflict, find_conflicts};
pub use parsing::{SynthesisResponse, parse_synthesis_response};
pub use plan::{PlanItem, WeeklyPlan};
pub use ranking::rank_by_impact;
