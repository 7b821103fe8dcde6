// conscious-observer-cli/src/main.rs
// ============================================================================
// Module: Conscious Observer CLI Entry Point
// Description: Wires config, the reference collaborator bundle, the
//              in-memory stores, and a log lifecycle sink into one
//              `Observer::process` call per invocation.
// Purpose: Let an operator exercise Gate-In -> Monitored Execution Loop ->
//          Gate-Out end to end without writing Rust.
// Dependencies: clap, conscious-observer-core, tokio
// ============================================================================

//! ## Overview
//! This binary has one subcommand, `run`, that reads an objective (plus
//! optional constraints and evidence), loads `conscious-observer.toml` (or
//! the engine defaults if absent), and prints the resulting
//! [`conscious_observer_core::ConsciousObserverResult`] as JSON. It has no
//! server mode and no MCP surface: the teacher's `serve`/`runpack` commands
//! assume a network-facing protocol this specification does not define.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use conscious_observer_broker::LogLifecycleSink;
use conscious_observer_collaborators::DefaultCollaboratorBundle;
use conscious_observer_config::ObserverConfig;
use conscious_observer_core::CancellationToken;
use conscious_observer_core::EvidenceRef;
use conscious_observer_core::MonotonicMillis;
use conscious_observer_core::Observer;
use conscious_observer_core::RawInput;
use conscious_observer_core::SpawnRequest;
use conscious_observer_store::InMemoryCalibrationHistoryStore;
use conscious_observer_store::InMemoryRetryBudgetStore;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "conscious-observer", arg_required_else_help = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run one Conscious Observer invocation end to end.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
struct RunArgs {
    /// The objective text to process.
    objective: String,
    /// A constraint narrowing the objective; may be repeated.
    #[arg(long = "constraint", value_name = "TEXT")]
    constraints: Vec<String>,
    /// A piece of supporting evidence as `source=content`; may be repeated.
    #[arg(long = "evidence", value_name = "SOURCE=CONTENT")]
    evidence: Vec<String>,
    /// Fixed host-pressure reading in `[0, 1]`; defaults to 0.0.
    #[arg(long, default_value_t = 0.0)]
    pressure: f64,
    /// Optional path to `conscious-observer.toml`.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Errors this binary can report on stderr before exiting non-zero.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] conscious_observer_config::ConfigError),
    /// Evidence argument was not in `source=content` form.
    #[error("invalid --evidence argument '{0}': expected 'source=content'")]
    InvalidEvidence(String),
    /// The orchestrator reported a construction-time failure.
    #[error("observer error: {0}")]
    Observer(#[from] conscious_observer_core::ObserverError),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let Command::Run(args) = cli.command;

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => return report_error(&format!("failed to start async runtime: {err}")),
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err.to_string()),
    }
}

fn report_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "error: {message}");
    ExitCode::FAILURE
}

fn parse_evidence(raw: &[String]) -> Result<Vec<EvidenceRef>, CliError> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(source, content)| EvidenceRef { source: source.to_owned(), content: content.to_owned() })
                .ok_or_else(|| CliError::InvalidEvidence(entry.clone()))
        })
        .collect()
}

async fn run(args: RunArgs) -> Result<(), CliError> {
    let config = ObserverConfig::load(args.config.as_deref())?;
    let engine_config = config.to_engine_config();

    let bundle = DefaultCollaboratorBundle::default();
    bundle.pressure.set(args.pressure);

    let lifecycle = LogLifecycleSink::new(std::io::stderr());
    let retry_budget = InMemoryRetryBudgetStore::default();
    let calibration_history = InMemoryCalibrationHistoryStore::default();
    let collaborators = bundle.observer_collaborators(&lifecycle, &retry_budget, &calibration_history);

    let observer = Observer { collaborators, config: engine_config };
    let evidence = parse_evidence(&args.evidence)?;
    let spawn_request = SpawnRequest { objective: args.objective.clone(), constraints: args.constraints, trace_id: None };
    let raw_input = RawInput::text(args.objective);
    let cancellation = CancellationToken::new();
    let start = Instant::now();
    let now = move || {
        let millis = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        MonotonicMillis::new(millis)
    };

    let result = observer.process(&raw_input, &spawn_request, &evidence, &cancellation, &now).await?;

    let json = serde_json::to_string_pretty(&result).unwrap_or_else(|_| "{}".to_owned());
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{json}").map_err(|err| CliError::InvalidEvidence(err.to_string()))?;
    Ok(())
}
