//! Prompt templates for enrichment calls.
//!
//! - [`DiagnosisProfile`]: which kind of diagnostician is asking
//! - [`PromptTemplate`]: role instructions and task payloads

pub mod template;

pub use template::{DiagnosisProfile, PromptTemplate, RESEARCH_SOURCES};
