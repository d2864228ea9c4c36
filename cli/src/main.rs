//! CLI entrypoint for sentinel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sentinel_application::config::ORCHESTRATOR_ID;
use sentinel_application::{
    ActionExecutor, AgentFactory, AgentRegistry, CycleProgressNotifier, DomainComponents,
    EnrichedDiagnostician, EnrichmentGateway, NoCycleProgress, ObservabilityContext,
    Orchestrator, RunCycleUseCase, RunMode, SecurityDiagnostician, StateStore,
};
use sentinel_domain::{Action, DiagnosisProfile};
use sentinel_infrastructure::{
    CommandEnrichmentGateway, ConfigLoader, FileConfig, GitHubActionExecutor, InMemoryStateStore,
    JsonFileStateStore, JsonlDecisionLogger, ResearchActionExecutor, SarifFindingSource,
    UnconfiguredEnrichment, load_project,
};
use sentinel_presentation::{
    Cli, Command, ConsoleFormatter, CycleMode, OutputFormat, ProgressReporter,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Domains served by the research analyst
const RESEARCH_DOMAINS: &[&str] = &["ai-systems-research", "research"];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_tracing(cli.verbose, config.logging.log_file.as_deref())?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.clone() else {
        println!("No command given. Run `sentinel --help` for usage.");
        return Ok(());
    };

    info!("Starting sentinel");

    // === Dependency Injection ===
    let cancellation = CancellationToken::new();
    watch_interrupt(cancellation.clone());

    let mut ctx = ObservabilityContext::for_run().with_cancellation(cancellation);
    if let Some(path) = &config.logging.decision_log {
        match JsonlDecisionLogger::new(path) {
            Some(logger) => ctx = ctx.with_decision_logger(Arc::new(logger)),
            None => warn!("Decision log disabled"),
        }
    }
    info!("Run id {}", ctx.run_id());

    let store: Arc<dyn StateStore> = match &config.storage.path {
        Some(path) => Arc::new(
            JsonFileStateStore::open(path)
                .await
                .with_context(|| format!("Failed to open state at {}", path.display()))?,
        ),
        None => Arc::new(InMemoryStateStore::new()),
    };

    let gateway: Arc<dyn EnrichmentGateway> = match &config.enrichment.command {
        Some(program) => Arc::new(CommandEnrichmentGateway::new(
            program.clone(),
            config.enrichment.args.clone(),
        )),
        None => {
            info!("No enrichment command configured");
            Arc::new(UnconfiguredEnrichment)
        }
    };

    let mut registry = build_registry(&config, Arc::clone(&gateway))
        .with_context(ctx.clone())
        .with_store(Arc::clone(&store));

    for entry in &config.agents {
        registry
            .register(&entry.agent_id, &entry.domain, entry.confidence_threshold)
            .await?;
    }
    for record in store.get_all_agents().await? {
        registry
            .register(&record.agent_id, &record.domain, record.confidence_threshold)
            .await?;
    }

    if let Command::InitProject { file } = &command {
        return init_project(&mut registry, file, cli.output).await;
    }

    let orchestrator = Orchestrator::new(gateway)
        .with_params(config.orchestration_params())
        .with_context(ctx);
    let use_case = RunCycleUseCase::new(Arc::new(registry), orchestrator, store.clone());

    let progress: Box<dyn CycleProgressNotifier> = if cli.quiet {
        Box::new(NoCycleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    match command {
        Command::RunCycle { mode } => {
            let mode = match mode {
                CycleMode::Diagnostic => RunMode::Diagnostic,
                CycleMode::Full => RunMode::Full,
            };
            let summary = use_case
                .execute_with_progress(mode, progress.as_ref())
                .await?;
            emit(cli.output, &summary, ConsoleFormatter::format_summary);
        }
        Command::Diagnose { agent_id } => {
            let result = use_case.run_agent(&agent_id).await?;
            emit(cli.output, &result, ConsoleFormatter::format_cycle_result);
        }
        Command::Execute { agent_id, action } => {
            let action: Action =
                serde_json::from_str(&action).context("--action must be an action object")?;
            let result = use_case.execute_action(&agent_id, action).await?;
            emit(cli.output, &result, |result| {
                ConsoleFormatter::format_execution(&agent_id, result)
            });
        }
        Command::Orchestrate => {
            let plan = use_case.synthesize_stored(progress.as_ref()).await?;
            emit(cli.output, &plan, ConsoleFormatter::format_plan);
        }
        Command::State { agent_id } => {
            let state = if agent_id == ORCHESTRATOR_ID {
                use_case.orchestrator_state().await
            } else {
                use_case.agent_state(&agent_id).await?
            };
            emit(cli.output, &state, ConsoleFormatter::format_state);
        }
        Command::Agents => {
            let agents = store.get_all_agents().await?;
            emit(cli.output, &agents, |agents| {
                ConsoleFormatter::format_agents(agents)
            });
        }
        Command::Reports => {
            let reports = store.get_all_reports().await?;
            emit(cli.output, &reports, |reports| {
                ConsoleFormatter::format_reports(reports)
            });
        }
        Command::InitProject { .. } => {}
    }

    Ok(())
}

/// Domain factories. Each factory builds fresh components per agent.
fn build_registry(config: &FileConfig, gateway: Arc<dyn EnrichmentGateway>) -> AgentRegistry {
    let github_executor: Arc<dyn ActionExecutor> = if config.github.use_gh_cli {
        Arc::new(GitHubActionExecutor::with_gh_cli(config.github.repo.clone()))
    } else {
        Arc::new(GitHubActionExecutor::new())
    };
    let github_gateway = Arc::clone(&gateway);
    let github: Arc<dyn AgentFactory> = Arc::new(move |_domain: &str| {
        DomainComponents::new(Arc::new(EnrichedDiagnostician::new(
            Arc::clone(&github_gateway),
            DiagnosisProfile::GitHubTriage,
        )))
        .with_executor(Arc::clone(&github_executor))
    });

    let research_gateway = Arc::clone(&gateway);
    let research: Arc<dyn AgentFactory> = Arc::new(move |_domain: &str| {
        DomainComponents::new(Arc::new(EnrichedDiagnostician::new(
            Arc::clone(&research_gateway),
            DiagnosisProfile::ResearchAnalyst,
        )))
        .with_executor(Arc::new(ResearchActionExecutor::new()))
    });

    let sarif_paths = config.security.sarif_paths.clone();
    let security: Arc<dyn AgentFactory> = Arc::new(move |_domain: &str| {
        DomainComponents::new(Arc::new(SecurityDiagnostician::new(Arc::new(
            SarifFindingSource::new(sarif_paths.clone()),
        ))))
    });

    let generic: Arc<dyn AgentFactory> = Arc::new(move |_domain: &str| {
        DomainComponents::new(Arc::new(EnrichedDiagnostician::new(
            Arc::clone(&gateway),
            DiagnosisProfile::Generic,
        )))
    });

    let mut registry = AgentRegistry::new(generic)
        .with_defaults(config.agent.to_defaults())
        .with_factory("github-triage", github)
        .with_factory("security", security);
    for domain in RESEARCH_DOMAINS {
        registry = registry.with_factory(*domain, Arc::clone(&research));
    }
    registry
}

async fn init_project(registry: &mut AgentRegistry, file: &Path, output: OutputFormat) -> Result<()> {
    let project = load_project(file).await?;

    let mut registered = Vec::new();
    for agent in &project.sub_agents {
        registry
            .register(&agent.agent_id, &agent.domain, agent.confidence_threshold)
            .await?;
        registered.push(agent.agent_id.clone());
    }
    info!(
        "Project {} accepted with {} sub-agents",
        project.project,
        registered.len()
    );

    match output {
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&project)),
        OutputFormat::Text => print!("{}", ConsoleFormatter::format_project(&project, &registered)),
    }
    Ok(())
}

fn emit<T: Serialize>(output: OutputFormat, value: &T, text: impl Fn(&T) -> String) {
    match output {
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(value)),
        OutputFormat::Text => println!("{}", text(value)),
    }
}

/// Cancel in-flight external calls on Ctrl-C.
fn watch_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight calls");
            token.cancel();
        }
    });
}

/// Initialize logging based on verbosity level. `RUST_LOG` applies when no
/// `-v` flag is given.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("logging.log_file has no file name: {}", path.display()))?;
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&directory, file_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}
