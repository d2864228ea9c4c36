//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Run mode accepted by `run-cycle`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CycleMode {
    /// Diagnose only
    Diagnostic,
    /// Diagnose, then synthesize a weekly plan
    #[default]
    Full,
}

/// CLI arguments for sentinel
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(author, version, about = "Sentinel - domain agents diagnose, an orchestrator plans")]
#[command(long_about = r#"
Sentinel runs a set of domain sub-agents, each of which diagnoses the top
bottleneck in its domain, and an orchestrator that ranks those reports,
flags cross-domain conflicts, and synthesizes a weekly plan.

Configuration files are loaded from (in priority order):
1. SENTINEL_* environment variables (nested keys separated by "__")
2. --config <path>     Explicit config file
3. ./sentinel.toml     Project-level config
4. ~/.config/sentinel/config.toml   Global config

Example:
  sentinel run-cycle
  sentinel run-cycle --mode diagnostic
  sentinel execute gh-main --action '{"type": "close_issue", "parameters": {"issue_id": 42}, "confidence": 0.9}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Diagnose every registered agent, then (in full mode) synthesize a plan
    RunCycle {
        #[arg(long, value_enum, default_value = "full")]
        mode: CycleMode,
    },

    /// Run one agent's diagnosis
    Diagnose {
        /// Registered agent id
        agent_id: String,
    },

    /// Ask an agent to perform an action (subject to its guardrail)
    Execute {
        /// Registered agent id
        agent_id: String,

        /// Action as JSON: {"type": ..., "parameters": {...}, "confidence": ...}
        #[arg(long, value_name = "JSON")]
        action: String,
    },

    /// Synthesize a plan from the latest stored reports
    Orchestrate,

    /// Show an agent's state
    State {
        /// Registered agent id
        agent_id: String,
    },

    /// List registered agents
    Agents,

    /// Show the latest report of every agent
    Reports,

    /// Validate a project definition (JSON or TOML) and register its sub-agents
    InitProject {
        /// Path to the project file
        file: PathBuf,
    },
}
