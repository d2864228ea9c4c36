//! Enrichment gateway adapters.

mod command;

pub use command::{CommandEnrichmentGateway, UnconfiguredEnrichment};
