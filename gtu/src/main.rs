//! gtu - update Go-installed tools
//!
//! CLI entry point: resolves the tools directory, then checks and updates.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use gotoolup::cli::Cli;
use gotoolup::config::Config;
use gotoolup::orchestrator::{Orchestrator, RunOutcome};
use gotoolup::prompt::{AssumeYes, Confirm, Prompt};
use gotoolup::toolchain::GoToolchain;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) {
    // Note: Can't log params here since logging isn't initialized yet
    // Determine log level with priority: CLI --log-level > config file > default (WARN)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref());

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(?config, "main: loaded config");

    let toolchain = Arc::new(GoToolchain::new(config.go_binary.clone()));

    let dir = config.resolve_tools_dir(cli.dir.as_deref(), toolchain.as_ref()).await?;
    debug!(dir = %dir.display(), "main: resolved tools directory");

    let mut orch_config = config.orchestrator(cli.check);
    if let Some(max) = cli.max_concurrent {
        debug!(max, "main: max-concurrent overridden on command line");
        orch_config.max_concurrent = max;
    }

    let orchestrator = Orchestrator::new(orch_config, toolchain);
    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(Prompt::stdio())
    };

    let outcome = orchestrator.run(&dir, confirm.as_mut()).await?;
    debug!(?outcome, "main: run finished");

    if let RunOutcome::Completed(report) = &outcome {
        info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "main: updates completed"
        );
    }

    Ok(())
}
