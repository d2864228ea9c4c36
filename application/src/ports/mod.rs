//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod action_executor;
pub mod decision_logger;
pub mod enrichment;
pub mod finding_source;
pub mod progress;
pub mod state_store;
