//! Configuration file loading for sentinel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SENTINEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./sentinel.toml` or `./.sentinel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/sentinel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_SARIF_PATH, FileAgentConfig, FileAgentEntry, FileConfig,
    FileEnrichmentConfig, FileGitHubConfig, FileLoggingConfig, FileOutputConfig,
    FileSecurityConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
