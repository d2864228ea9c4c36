//! Infrastructure layer for sentinel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod actions;
pub mod config;
pub mod enrichment;
pub mod logging;
pub mod project;
pub mod security;
pub mod storage;

// Re-export commonly used types
pub use actions::{GitHubActionExecutor, ResearchActionExecutor};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileAgentEntry, FileConfig,
    FileEnrichmentConfig, FileGitHubConfig, FileLoggingConfig, FileOutputConfig,
    FileSecurityConfig, FileStorageConfig,
};
pub use enrichment::{CommandEnrichmentGateway, UnconfiguredEnrichment};
pub use logging::JsonlDecisionLogger;
pub use project::{ProjectLoadError, load_project};
pub use security::{SarifFindingSource, parse_sarif};
pub use storage::{InMemoryStateStore, JsonFileStateStore, StoreState};
