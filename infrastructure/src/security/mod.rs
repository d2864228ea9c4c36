//! Security scanner ingestion.

mod sarif;

pub use sarif::{SarifFindingSource, parse_sarif};
