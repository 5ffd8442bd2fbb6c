//! Orchestrator - scans, checks and updates tools concurrently
//!
//! Each phase spawns one tokio task per item. Workers send their results
//! down a single channel owned by the orchestrator; once every worker has
//! finished the channel closes and the collected results are returned.

mod config;
mod core;

pub use config::OrchestratorConfig;
pub use core::{CheckOutcome, CheckReport, Orchestrator, RunOutcome, UpdateReport};
