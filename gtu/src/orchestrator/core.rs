//! Main Orchestrator implementation

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::*;
use eyre::{Context, Result};
use futures::future::join_all;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};

use super::config::OrchestratorConfig;
use crate::extractor::extract_tool;
use crate::prompt::Confirm;
use crate::resolver::check_for_update;
use crate::scanner::scan_directory;
use crate::tool::ToolDescriptor;
use crate::toolchain::Toolchain;
use crate::updater::update_tool;

/// Result of checking a single executable
#[derive(Debug)]
pub enum CheckOutcome {
    /// A newer version is available
    Updatable(ToolDescriptor),
    /// Already at the latest version
    UpToDate(ToolDescriptor),
    /// Not a Go binary, or no module information
    NotApplicable(PathBuf),
    /// The latest-version query failed
    Failed { name: String, reason: String },
}

/// Aggregated results of the check phase
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Tools with a newer version, in no particular order
    pub updatable: Vec<ToolDescriptor>,
    pub up_to_date: usize,
    pub not_applicable: usize,
    /// Tools whose check failed, as (name, reason)
    pub failed: Vec<(String, String)>,
}

impl CheckReport {
    /// Number of Go tools that were checked, whether or not the check succeeded
    pub fn checked(&self) -> usize {
        self.updatable.len() + self.up_to_date + self.failed.len()
    }

    fn record(&mut self, outcome: CheckOutcome) {
        match outcome {
            CheckOutcome::Updatable(tool) => self.updatable.push(tool),
            CheckOutcome::UpToDate(_) => self.up_to_date += 1,
            CheckOutcome::NotApplicable(path) => {
                debug!(?path, "CheckReport::record: not a Go tool");
                self.not_applicable += 1;
            }
            CheckOutcome::Failed { name, reason } => self.failed.push((name, reason)),
        }
    }
}

/// Aggregated results of the update phase
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

/// How a run ended
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The directory had no executables
    NoExecutables,
    /// Nothing to update; no prompt was shown
    NothingToUpdate { checked: usize },
    /// Updates were found but only reported
    CheckOnly { updatable: usize },
    /// The user declined the update
    Cancelled { updatable: usize },
    /// Updates were applied
    Completed(UpdateReport),
}

/// Drives the scan, check and update phases
pub struct Orchestrator {
    config: OrchestratorConfig,
    toolchain: Arc<dyn Toolchain>,
    /// Concurrency limiter, absent when unbounded
    limiter: Option<Arc<Semaphore>>,
}

impl Orchestrator {
    /// Create a new Orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig, toolchain: Arc<dyn Toolchain>) -> Self {
        debug!(?config, "Orchestrator::new: called");
        let limiter = config.limit().map(|n| Arc::new(Semaphore::new(n)));
        Self {
            config,
            toolchain,
            limiter,
        }
    }

    /// Spawn one worker per item and collect every worker's result
    ///
    /// The orchestrator holds the only sender clone outside the workers and
    /// drops it before draining, so the receiver sees the channel close
    /// exactly when the last worker finishes.
    async fn fan_out<I, R, F, Fut>(&self, items: Vec<I>, work: F) -> Vec<R>
    where
        I: Send + 'static,
        R: Send + 'static,
        F: Fn(Arc<dyn Toolchain>, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        debug!(count = items.len(), limited = self.limiter.is_some(), "Orchestrator::fan_out: called");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let work = Arc::new(work);

        let mut handles = Vec::with_capacity(items.len());
        for item in items {
            let tx = tx.clone();
            let work = work.clone();
            let toolchain = self.toolchain.clone();
            let limiter = self.limiter.clone();

            handles.push(tokio::spawn(async move {
                // Held until the worker finishes
                let _permit = match limiter {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            error!(%e, "Concurrency limiter closed");
                            return;
                        }
                    },
                    None => None,
                };

                let result = (*work)(toolchain, item).await;
                if tx.send(result).is_err() {
                    debug!("Orchestrator::fan_out: receiver dropped");
                }
            }));
        }
        drop(tx);

        let mut results = Vec::with_capacity(handles.len());
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!(%e, "Worker task failed");
            }
        }

        debug!(count = results.len(), "Orchestrator::fan_out: collected results");
        results
    }

    /// Extract and check every path concurrently
    pub async fn check_all(&self, paths: Vec<PathBuf>) -> CheckReport {
        info!(count = paths.len(), "Checking executables for updates");
        let outcomes = self.fan_out(paths, check_one).await;

        let mut report = CheckReport::default();
        for outcome in outcomes {
            report.record(outcome);
        }
        report.failed.sort();
        debug!(
            updatable = report.updatable.len(),
            up_to_date = report.up_to_date,
            not_applicable = report.not_applicable,
            failed = report.failed.len(),
            "Orchestrator::check_all: done"
        );
        report
    }

    /// Update every tool concurrently, waiting for all of them
    pub async fn update_all(&self, tools: Vec<ToolDescriptor>) -> UpdateReport {
        info!(count = tools.len(), "Updating tools");
        let results = self.fan_out(tools, update_one).await;

        let mut report = UpdateReport::default();
        for result in results {
            match result {
                Ok(name) => report.updated.push(name),
                Err(name) => report.failed.push(name),
            }
        }
        report.updated.sort();
        report.failed.sort();
        report
    }

    /// Full pipeline: scan `dir`, check everything, confirm, update
    pub async fn run(&self, dir: &Path, confirm: &mut dyn Confirm) -> Result<RunOutcome> {
        debug!(?dir, "Orchestrator::run: called");
        println!("Scanning for executables in: {}", dir.display().to_string().cyan());

        let executables = scan_directory(dir)?;
        if executables.is_empty() {
            println!("No executables found.");
            return Ok(RunOutcome::NoExecutables);
        }

        println!("Checking for updates...");
        let report = self.check_all(executables).await;
        let updatable = report.updatable.len();

        println!("\nFound {} tools that can be updated.", updatable);
        if !report.failed.is_empty() {
            println!("{} {} tools could not be checked:", "!".yellow(), report.failed.len());
            for (name, reason) in &report.failed {
                println!("  {}: {}", name, reason);
            }
        }

        if updatable == 0 {
            return Ok(RunOutcome::NothingToUpdate {
                checked: report.checked(),
            });
        }

        if self.config.check_only {
            debug!("Orchestrator::run: check only, not updating");
            return Ok(RunOutcome::CheckOnly { updatable });
        }

        let accepted = confirm
            .confirm("Do you want to update them all?")
            .context("Failed to read confirmation")?;
        if !accepted {
            println!("Update cancelled.");
            return Ok(RunOutcome::Cancelled { updatable });
        }

        let update_report = self.update_all(report.updatable).await;
        if update_report.failed.is_empty() {
            println!("\nAll updates completed.");
        } else {
            println!(
                "\nAll updates completed. {} of {} failed: {}",
                update_report.failed.len(),
                updatable,
                update_report.failed.join(", ").red()
            );
        }

        Ok(RunOutcome::Completed(update_report))
    }
}

/// Worker for the check phase
async fn check_one(toolchain: Arc<dyn Toolchain>, path: PathBuf) -> CheckOutcome {
    let Some(mut tool) = extract_tool(toolchain.as_ref(), &path).await else {
        return CheckOutcome::NotApplicable(path);
    };

    if let Err(e) = check_for_update(toolchain.as_ref(), &mut tool).await {
        warn!("Could not check for update for {}: {}", tool.name, e);
        return CheckOutcome::Failed {
            name: tool.name,
            reason: e.to_string(),
        };
    }

    if tool.updatable {
        println!(
            "{} {}: {} -> {}",
            "[UPDATE AVAILABLE]".yellow(),
            tool.name,
            tool.current_version,
            tool.latest_version.green()
        );
        CheckOutcome::Updatable(tool)
    } else {
        println!("{} {}: {} (latest)", "[OK]".green(), tool.name, tool.current_version);
        CheckOutcome::UpToDate(tool)
    }
}

/// Worker for the update phase; `Ok` and `Err` both carry the tool name
async fn update_one(toolchain: Arc<dyn Toolchain>, mut tool: ToolDescriptor) -> Result<String, String> {
    match update_tool(toolchain.as_ref(), &mut tool).await {
        Ok(()) => Ok(tool.name),
        Err(e) => {
            error!("Error updating {}: {}", tool.name, e);
            Err(tool.name)
        }
    }
}
