//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_FILES: [&str; 2] = ["sentinel.toml", ".sentinel.toml"];

/// Prefix of environment overrides (`SENTINEL_AGENT__CONFIDENCE_THRESHOLD=0.8`).
const ENV_PREFIX: &str = "SENTINEL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `SENTINEL_` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./sentinel.toml` or `./.sentinel.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/sentinel/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/sentinel/config.toml if set,
    /// otherwise falls back to ~/.config/sentinel/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sentinel").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./sentinel.toml or ./.sentinel.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.agents.is_empty());
        assert_eq!(config.agent.confidence_threshold, 0.5);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("sentinel"));
    }

    #[test]
    fn test_project_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "sentinel.toml",
                r#"
[agent]
confidence_threshold = 0.6
max_retries = 4

[[agents]]
agent_id = "gh-main"
domain = "github-triage"
"#,
            )?;
            jail.set_env("SENTINEL_AGENT__CONFIDENCE_THRESHOLD", "0.8");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.agent.confidence_threshold, 0.8);
            assert_eq!(config.agent.max_retries, 4);
            assert_eq!(config.agents.len(), 1);
            assert_eq!(config.agents[0].domain, "github-triage");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_beats_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".sentinel.toml", "[agent]\nmax_retries = 2")?;
            jail.create_file("custom.toml", "[agent]\nmax_retries = 9")?;

            let explicit = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&explicit)).map_err(|e| *e)?;
            assert_eq!(config.agent.max_retries, 9);
            Ok(())
        });
    }
}
