//! CLI for the issue migrator.
//!
//! Copies issues, pull request records and comments from one GitHub
//! repository to another. Safe to rerun.

use clap::Parser;
use issue_migrator::{load_settings, RunSummary, Runner, RunnerConfig, RunnerError, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Settings file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "issue-migrator.toml";

/// Issue Migrator - Copy issues and their comments between GitHub repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file [default: issue-migrator.toml, if present].
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository to migrate from (`owner/name` or URL).
    #[arg(long)]
    source_repo: Option<String>,

    /// Repository to migrate into (`owner/name` or URL).
    #[arg(long)]
    target_repo: Option<String>,

    /// Milliseconds to pause after every successful API call.
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Prefix replayed comments with their original author and date.
    #[arg(long)]
    attribution: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::from(2);
        }
    };

    match run(config).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_startup() => {
            error!(error = %e, "Failed to start");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "Migration failed; rerun to resume");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Layers the settings file, its local overlay and the command line.
fn resolve_config(args: Args) -> Result<RunnerConfig, RunnerError> {
    let mut overrides = Settings {
        source_repo: args.source_repo,
        target_repo: args.target_repo,
        token: args.token,
        ..Default::default()
    };
    overrides.rate_limit.pacing_ms = args.pacing_ms;
    if args.attribution {
        overrides.comments.attribution = Some(true);
    }

    let settings = match args.config {
        Some(path) => load_settings(&path, overrides)?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG);
            if path.exists() {
                load_settings(&path, overrides)?
            } else {
                info!("No {DEFAULT_CONFIG} found, using command line settings only");
                overrides
            }
        }
    };

    Ok(RunnerConfig::from_settings(settings)?)
}

/// Main execution logic.
async fn run(config: RunnerConfig) -> Result<RunSummary, RunnerError> {
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Items processed: {}", summary.items_seen);
    println!("  Created: {}", summary.created);
    println!("  Comments copied: {}", summary.comments_copied);
    println!("  Closed after creation: {}", summary.closed);
    println!("  State updated: {}", summary.resynced);
    println!("  Already migrated: {}", summary.skipped);

    if summary.is_noop() {
        println!("  Nothing to do, target is up to date.");
    }
}
