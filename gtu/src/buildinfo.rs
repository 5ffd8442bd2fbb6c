//! Parser for `go version -m` output
//!
//! The output looks like:
//!
//! ```text
//! /home/user/go/bin/dlv: go1.22.1
//!         path    github.com/go-delve/delve/cmd/dlv
//!         mod     github.com/go-delve/delve       v1.22.1 h1:...
//!         dep     github.com/cilium/ebpf  v0.11.0 h1:...
//!         build   -buildmode=exe
//! ```
//!
//! Only the header, the `path` record and the `mod` record are consumed.

use thiserror::Error;
use tracing::debug;

/// Ways `go version -m` output can deviate from the expected grammar
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildInfoError {
    #[error("Empty build info output")]
    Empty,

    #[error("Malformed header line: {0}")]
    MalformedHeader(String),

    #[error("Record '{tag}' is missing its value")]
    MissingField { tag: String },

    #[error("No '{0}' record in build info")]
    MissingRecord(&'static str),
}

/// Build provenance embedded in a Go binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Path echoed back in the header line
    pub path: String,

    /// Toolchain version from the header line
    pub go_version: String,

    /// Main package path
    pub package_path: String,

    /// Main module path
    pub module_path: String,

    /// Main module version (may be empty)
    pub module_version: String,
}

impl BuildInfo {
    /// Parse `go version -m` output
    pub fn parse(output: &str) -> Result<Self, BuildInfoError> {
        debug!(output_len = output.len(), "BuildInfo::parse: called");
        let mut lines = output.trim().lines();

        let header = lines.next().filter(|l| !l.trim().is_empty()).ok_or(BuildInfoError::Empty)?;
        let (path, go_version) = parse_header(header)?;

        let mut package_path = None;
        let mut module = None;

        for line in lines {
            let mut fields = line.split_whitespace();
            let Some(tag) = fields.next() else {
                continue;
            };

            match tag {
                "path" => {
                    let value = fields.next().ok_or_else(|| BuildInfoError::MissingField { tag: tag.to_string() })?;
                    debug!(%value, "BuildInfo::parse: found path record");
                    package_path = Some(value.to_string());
                }
                "mod" => {
                    let value = fields.next().ok_or_else(|| BuildInfoError::MissingField { tag: tag.to_string() })?;
                    let version = fields.next().unwrap_or_default();
                    debug!(%value, %version, "BuildInfo::parse: found mod record");
                    module = Some((value.to_string(), version.to_string()));
                }
                _ => {}
            }
        }

        let package_path = package_path.ok_or(BuildInfoError::MissingRecord("path"))?;
        let (module_path, module_version) = module.ok_or(BuildInfoError::MissingRecord("mod"))?;

        Ok(Self {
            path,
            go_version,
            package_path,
            module_path,
            module_version,
        })
    }
}

/// Split `<path>: <toolchain-version>` on the last ": ", the path may contain one
///
/// The version is `runtime.Version()` of the building toolchain and may hold
/// spaces (`go1.22.1 X:loopvar`, `devel go1.23-abc123 Tue Jan 2 ...`).
fn parse_header(line: &str) -> Result<(String, String), BuildInfoError> {
    let line = line.trim_end();
    let Some((path, version)) = line.rsplit_once(": ") else {
        return Err(BuildInfoError::MalformedHeader(line.to_string()));
    };

    let (path, version) = (path.trim(), version.trim());
    if path.is_empty() || version.is_empty() {
        return Err(BuildInfoError::MalformedHeader(line.to_string()));
    }

    Ok((path.to_string(), version.to_string()))
}
