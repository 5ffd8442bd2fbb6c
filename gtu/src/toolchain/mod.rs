//! Go toolchain abstraction
//!
//! Every external `go` invocation goes through the [`Toolchain`] trait so the
//! resolver, extractor and updater can be exercised without a Go install.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod error;
mod go;
#[cfg(test)]
pub mod mock;

pub use error::ToolchainError;
pub use go::GoToolchain;

/// Module metadata returned by `go list -m -u -json <module>@latest`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModuleInfo {
    pub path: String,
    pub version: String,
    pub query: String,
    pub time: Option<DateTime<Utc>>,
    pub go_mod: String,
    pub go_version: String,
}

impl ModuleInfo {
    /// Convenience constructor for a resolved module version
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            query: "latest".to_string(),
            ..Default::default()
        }
    }
}

/// The external commands the updater depends on
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Directory `go install` writes binaries to
    async fn tools_dir(&self) -> Result<PathBuf, ToolchainError>;

    /// Raw `go version -m <path>` output
    async fn build_info(&self, path: &Path) -> Result<String, ToolchainError>;

    /// Whether `<module>@latest` resolves; output is discarded
    async fn module_exists(&self, module: &str) -> bool;

    /// Latest released version of `module`
    async fn latest_module(&self, module: &str) -> Result<ModuleInfo, ToolchainError>;

    /// Install `<package>@latest`, returning the combined output
    async fn install(&self, package: &str) -> Result<String, ToolchainError>;
}
