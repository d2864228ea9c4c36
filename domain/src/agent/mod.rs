//! Agent domain
//!
//! Value types describing an agent's identity, configuration, mutable
//! lifecycle state, and the outcomes of its operations.
//!
//! The behaviour (diagnose / execute / run) lives in the application layer;
//! this module holds only the pieces that can be reasoned about without I/O:
//!
//! - [`Action`]: a side-effecting operation a caller asks an agent to perform
//! - [`Guardrail`]: the confidence threshold gate in front of every action
//! - [`AgentSettings`]: construction-time configuration
//! - [`AgentState`]: snapshot returned by `get_state()`
//! - [`ExecutionResult`] / [`CycleResult`]: operation outcomes

pub mod action;
pub mod entities;
pub mod guardrail;
pub mod outcome;

pub use action::Action;
pub use entities::{AgentMetrics, AgentSettings, AgentState, AgentType};
pub use guardrail::{DEFAULT_CONFIDENCE_THRESHOLD, Guardrail};
pub use outcome::{BLOCKED_REASON, CycleResult, CycleStatus, ExecutionResult};
