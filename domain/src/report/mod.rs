//! Bottleneck report domain
//!
//! A [`BottleneckReport`] is the single value every agent produces per
//! diagnostic cycle. Reports are the only thing that crosses agent
//! boundaries: the orchestrator receives read-only copies and ranks them.
//!
//! Payload parsing lives in [`parsing`]: it turns the loosely structured
//! output of an enrichment collaborator into a report, recording which
//! fields had to be defaulted so the caller can log them.

pub mod bottleneck;
pub mod parsing;

pub use bottleneck::BottleneckReport;
pub use parsing::{ParsedDiagnosis, extract_json_block, parse_diagnosis_payload, report_from_value};
