//! `go` command implementation of the toolchain

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ModuleInfo, Toolchain, ToolchainError};

/// Runs the real `go` binary
#[derive(Debug, Clone)]
pub struct GoToolchain {
    go_binary: String,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl GoToolchain {
    /// Create a toolchain that invokes `go_binary`
    pub fn new(go_binary: impl Into<String>) -> Self {
        let go_binary = go_binary.into();
        debug!(%go_binary, "GoToolchain::new: called");
        Self { go_binary }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.go_binary, args.join(" "))
    }

    /// Run `go <args>` and capture its output, failing on non-zero exit
    async fn run(&self, args: &[&str]) -> Result<Output, ToolchainError> {
        let command = self.describe(args);
        debug!(%command, "GoToolchain::run: called");

        let output = Command::new(&self.go_binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ToolchainError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            debug!(status = ?output.status, "GoToolchain::run: command failed");
            return Err(ToolchainError::Failed {
                command,
                status: output.status.to_string(),
                output: combined_output(&output),
            });
        }

        debug!("GoToolchain::run: command succeeded");
        Ok(output)
    }

    async fn env(&self, key: &str) -> Result<String, ToolchainError> {
        let output = self.run(&["env", key]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// stdout followed by stderr, the way a terminal would mostly show it
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (true, _) => stderr.trim_end().to_string(),
        (false, true) => stdout.trim_end().to_string(),
        (false, false) => format!("{}\n{}", stdout.trim_end(), stderr.trim_end()),
    }
}

/// First entry of a GOPATH list joined with `bin`
fn gopath_bin(gopath: &str) -> Option<PathBuf> {
    std::env::split_paths(gopath)
        .find(|p| !p.as_os_str().is_empty())
        .map(|p| p.join("bin"))
}

#[async_trait]
impl Toolchain for GoToolchain {
    async fn tools_dir(&self) -> Result<PathBuf, ToolchainError> {
        debug!("GoToolchain::tools_dir: called");
        let gobin = self.env("GOBIN").await?;
        if !gobin.is_empty() {
            debug!(%gobin, "GoToolchain::tools_dir: using GOBIN");
            return Ok(PathBuf::from(gobin));
        }

        let gopath = self.env("GOPATH").await?;
        match gopath_bin(&gopath) {
            Some(dir) => {
                debug!(?dir, "GoToolchain::tools_dir: GOBIN empty, using GOPATH/bin");
                Ok(dir)
            }
            None => Err(ToolchainError::EmptyEnv(
                "GOBIN and GOPATH are both empty, check your Go environment".to_string(),
            )),
        }
    }

    async fn build_info(&self, path: &Path) -> Result<String, ToolchainError> {
        debug!(?path, "GoToolchain::build_info: called");
        let path = path.to_string_lossy();
        let output = self.run(&["version", "-m", path.as_ref()]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn module_exists(&self, module: &str) -> bool {
        debug!(%module, "GoToolchain::module_exists: called");
        let reference = format!("{}@latest", module);
        let status = Command::new(&self.go_binary)
            .args(["list", "-m", reference.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        let exists = matches!(status, Ok(s) if s.success());
        debug!(%module, exists, "GoToolchain::module_exists: probed");
        exists
    }

    async fn latest_module(&self, module: &str) -> Result<ModuleInfo, ToolchainError> {
        debug!(%module, "GoToolchain::latest_module: called");
        let reference = format!("{}@latest", module);
        let args = ["list", "-m", "-u", "-json", reference.as_str()];
        let output = self.run(&args).await?;

        serde_json::from_slice(&output.stdout).map_err(|source| ToolchainError::Parse {
            command: self.describe(&args),
            source,
        })
    }

    async fn install(&self, package: &str) -> Result<String, ToolchainError> {
        debug!(%package, "GoToolchain::install: called");
        let reference = format!("{}@latest", package);
        let output = self.run(&["install", reference.as_str()]).await?;
        Ok(combined_output(&output))
    }
}
