//! Tool descriptor - one discovered executable and its update state

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buildinfo::BuildInfo;

/// A Go-built executable found in the tools directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// File name of the executable (e.g. "dlv" or "dlv.exe")
    pub name: String,

    /// Full path to the executable
    pub path: PathBuf,

    /// Package the binary was built from (e.g. "github.com/go-delve/delve/cmd/dlv")
    pub package_path: String,

    /// Module containing the package (e.g. "github.com/go-delve/delve")
    pub module_path: String,

    /// Installed module version, possibly empty
    pub current_version: String,

    /// Latest known version, empty until resolved
    pub latest_version: String,

    /// Set once a differing, non-empty latest version is known
    pub updatable: bool,

    /// Toolchain that built the binary (e.g. "go1.22.1")
    pub go_version: String,
}

impl ToolDescriptor {
    /// Build a descriptor from parsed build info
    pub fn from_build_info(path: &Path, info: BuildInfo) -> Self {
        debug!(?path, package = %info.package_path, "ToolDescriptor::from_build_info: called");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            path: path.to_path_buf(),
            package_path: info.package_path,
            module_path: info.module_path,
            current_version: info.module_version,
            latest_version: String::new(),
            updatable: false,
            go_version: info.go_version,
        }
    }

    /// Both identifiers must be present before the descriptor can be resolved
    pub fn is_valid(&self) -> bool {
        !self.package_path.is_empty() && !self.module_path.is_empty()
    }

    /// Record a queried version, marking the tool updatable when it differs
    ///
    /// Versions are compared as opaque strings. Returns whether the tool is
    /// now updatable.
    pub fn record_latest(&mut self, version: &str) -> bool {
        debug!(tool = %self.name, current = %self.current_version, %version, "ToolDescriptor::record_latest: called");
        if !version.is_empty() && version != self.current_version {
            self.latest_version = version.to_string();
            self.updatable = true;
        }
        self.updatable
    }
}
