//! gotoolup - keep Go-installed tools up to date
//!
//! gotoolup scans the directory where `go install` places binaries, reads the
//! module metadata embedded in each one, asks the Go toolchain for the latest
//! published version (probing the next `/vN` major path first) and reinstalls
//! whatever is out of date.
//!
//! # Modules
//!
//! - [`scanner`] - Executable discovery in the tools directory
//! - [`buildinfo`] - Parser for `go version -m` output
//! - [`extractor`] - Build info to [`ToolDescriptor`]
//! - [`resolver`] - Latest version lookup and major version probing
//! - [`updater`] - Reinstalls a tool and cleans up stale binaries
//! - [`orchestrator`] - Concurrent check and update phases
//! - [`toolchain`] - Trait over the `go` command and its implementation
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod buildinfo;
pub mod cli;
pub mod config;
pub mod extractor;
pub mod orchestrator;
pub mod prompt;
pub mod resolver;
pub mod scanner;
pub mod tool;
pub mod toolchain;
pub mod updater;

// Re-export commonly used types
pub use buildinfo::{BuildInfo, BuildInfoError};
pub use config::Config;
pub use extractor::extract_tool;
pub use orchestrator::{CheckOutcome, CheckReport, Orchestrator, OrchestratorConfig, RunOutcome, UpdateReport};
pub use prompt::{AssumeYes, Confirm, Prompt};
pub use resolver::{CheckError, check_for_update, major_suffix, next_major_module, rewrite_package};
pub use scanner::{ScanError, scan_directory};
pub use tool::ToolDescriptor;
pub use toolchain::{GoToolchain, ModuleInfo, Toolchain, ToolchainError};
pub use updater::{UpdateError, command_name, update_tool};
