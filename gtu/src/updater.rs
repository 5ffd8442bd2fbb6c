//! Update applier - installs the latest version of an updatable tool

use std::path::{Path, PathBuf};

use colored::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::extractor::extract_tool;
use crate::resolver::major_suffix;
use crate::tool::ToolDescriptor;
use crate::toolchain::{Toolchain, ToolchainError};

/// Errors updating a single tool
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Failed to update {tool}: {source}")]
    Install {
        tool: String,
        #[source]
        source: ToolchainError,
    },

    #[error("Failed to remove old tool {tool} at {path}: {source}")]
    Remove {
        tool: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    /// Captured `go install` output, when the install itself failed
    pub fn output(&self) -> Option<&str> {
        match self {
            UpdateError::Install { source, .. } => source.output(),
            UpdateError::Remove { .. } => None,
        }
    }
}

/// Name `go install` gives the binary for `package`
///
/// The last path element, unless that is a `/vN` major version suffix, in
/// which case the element before it.
pub fn command_name(package: &str) -> &str {
    let package = match major_suffix(package) {
        Some((base, _)) => base,
        None => package,
    };
    package.rsplit('/').next().unwrap_or(package)
}

/// File name of an installed binary, without the `.exe` suffix on Windows
fn artifact_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if cfg!(windows) {
        name.strip_suffix(".exe").map(str::to_string).unwrap_or(name)
    } else {
        name
    }
}

/// Where `go install` put the new binary, assuming the same directory as the old one
fn installed_path(tool: &ToolDescriptor) -> PathBuf {
    let name = command_name(&tool.package_path);
    let file_name = if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };
    match tool.path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Install the latest version of `tool`
///
/// When the installed command name differs from the old artifact's name the
/// old artifact is removed. This is a best-effort cleanup, not a guarantee
/// that no stale binaries remain. The command name is [`command_name`], not
/// the plain last package element: `example.com/tool/v2` compares as `tool`.
pub async fn update_tool(toolchain: &dyn Toolchain, tool: &mut ToolDescriptor) -> Result<(), UpdateError> {
    debug!(tool = %tool.name, package = %tool.package_path, "update_tool: called");
    if !tool.updatable {
        debug!(tool = %tool.name, "update_tool: not updatable, nothing to do");
        return Ok(());
    }

    println!("Updating {}...", tool.name.cyan());

    let output = toolchain
        .install(&tool.package_path)
        .await
        .map_err(|source| UpdateError::Install {
            tool: tool.name.clone(),
            source,
        })?;
    debug!(tool = %tool.name, %output, "update_tool: install succeeded");

    let package_base = command_name(&tool.package_path);
    let tool_base = artifact_name(&tool.path);

    if package_base != tool_base {
        debug!(tool = %tool.name, %package_base, %tool_base, "update_tool: command name changed");
        println!("Removing old version of {} at {}", tool.name, tool.path.display());
        match tokio::fs::remove_file(&tool.path).await {
            Ok(()) => debug!(path = ?tool.path, "update_tool: removed old artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?tool.path, "update_tool: old artifact already gone");
            }
            Err(source) => {
                return Err(UpdateError::Remove {
                    tool: tool.name.clone(),
                    path: tool.path.clone(),
                    source,
                });
            }
        }
    }

    reconfirm_version(toolchain, tool).await;

    info!(tool = %tool.name, version = %tool.latest_version, "Updated tool");
    println!(
        "{} Successfully updated {} to the latest version: {}.",
        "✓".green(),
        tool.name,
        tool.latest_version.green()
    );
    Ok(())
}

/// Read the version back from the freshly installed binary
async fn reconfirm_version(toolchain: &dyn Toolchain, tool: &mut ToolDescriptor) {
    let path = installed_path(tool);
    debug!(tool = %tool.name, ?path, "reconfirm_version: called");

    match extract_tool(toolchain, &path).await {
        Some(installed) if !installed.current_version.is_empty() && installed.current_version != tool.current_version => {
            debug!(tool = %tool.name, version = %installed.current_version, "reconfirm_version: confirmed");
            tool.latest_version = installed.current_version;
        }
        Some(installed) => {
            debug!(tool = %tool.name, version = %installed.current_version, "reconfirm_version: installed binary reports no newer version");
        }
        None => {
            debug!(tool = %tool.name, "reconfirm_version: could not read installed binary");
        }
    }
}
