//! Logging infrastructure: the structured decision audit trail.
//!
//! Provides [`JsonlDecisionLogger`], a JSONL file writer that implements
//! the [`DecisionLogger`](sentinel_application::DecisionLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlDecisionLogger;
