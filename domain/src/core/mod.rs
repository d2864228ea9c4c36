//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`score`]: clamping helpers for confidence / impact values

pub mod error;
pub mod score;
