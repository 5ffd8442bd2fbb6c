//! Version resolver - decides whether a newer release of a tool exists
//!
//! Go modules put major versions 2 and up under a `/vN` path suffix, so a
//! plain "latest" query never crosses a major version boundary. Before
//! querying, the resolver probes the next major version path (`/v2` for an
//! unsuffixed module, `/v(N+1)` for a `/vN` module). When it exists the tool
//! is moved onto that line and its package path rewritten to match.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::tool::ToolDescriptor;
use crate::toolchain::{Toolchain, ToolchainError};

static MAJOR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)/v([1-9][0-9]*)$").expect("major suffix pattern is valid"));

/// Errors checking a single tool for updates
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to check for update for {tool}: {source}")]
    Query {
        tool: String,
        #[source]
        source: ToolchainError,
    },
}

/// Split a module path into its base and major version, if it has a `/vN` suffix with N >= 2
pub fn major_suffix(module: &str) -> Option<(&str, u64)> {
    let caps = MAJOR_SUFFIX.captures(module)?;
    let base = caps.get(1)?.as_str();
    let major = caps.get(2)?.as_str().parse::<u64>().ok()?;
    (major >= 2).then_some((base, major))
}

/// The module path of the next major version
///
/// `example.com/tool` -> `example.com/tool/v2`, `example.com/tool/v3` -> `example.com/tool/v4`
pub fn next_major_module(module: &str) -> String {
    match major_suffix(module) {
        Some((base, major)) => format!("{}/v{}", base, major + 1),
        None => format!("{}/v2", module),
    }
}

/// Replace the module prefix of `package` with `new_module`
///
/// Returns `None` unless `old_module` is a whole-segment prefix of `package`.
pub fn rewrite_package(package: &str, old_module: &str, new_module: &str) -> Option<String> {
    let rest = package.strip_prefix(old_module)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(format!("{}{}", new_module, rest))
    } else {
        None
    }
}

/// Pick the module path to query, moving the tool to a newer major line when one exists
async fn resolve_query_path(toolchain: &dyn Toolchain, tool: &mut ToolDescriptor) -> String {
    let candidate = next_major_module(&tool.module_path);
    debug!(tool = %tool.name, %candidate, "resolve_query_path: probing next major version");

    if !toolchain.module_exists(&candidate).await {
        debug!(tool = %tool.name, "resolve_query_path: no newer major version");
        return tool.module_path.clone();
    }

    info!(tool = %tool.name, from = %tool.module_path, to = %candidate, "Found newer major version");
    match rewrite_package(&tool.package_path, &tool.module_path, &candidate) {
        Some(package) => {
            debug!(tool = %tool.name, %package, "resolve_query_path: rewrote package path");
            tool.package_path = package;
        }
        None => {
            debug!(tool = %tool.name, package = %tool.package_path, "resolve_query_path: package not under module, leaving as is");
        }
    }
    candidate
}

/// Check `tool` for a newer version, updating it in place
///
/// A failed existence probe just means there is no newer major version. A
/// failed or unparsable latest-version query is an error for this tool only.
pub async fn check_for_update(toolchain: &dyn Toolchain, tool: &mut ToolDescriptor) -> Result<(), CheckError> {
    debug!(tool = %tool.name, module = %tool.module_path, "check_for_update: called");
    if !tool.is_valid() {
        debug!(tool = %tool.name, "check_for_update: invalid descriptor, nothing to check");
        return Ok(());
    }

    let query_path = resolve_query_path(toolchain, tool).await;

    let info = toolchain
        .latest_module(&query_path)
        .await
        .map_err(|source| CheckError::Query {
            tool: tool.name.clone(),
            source,
        })?;
    debug!(tool = %tool.name, %query_path, version = %info.version, "check_for_update: latest version");

    tool.record_latest(&info.version);
    Ok(())
}
