//! Scripted toolchain for unit tests

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::{ModuleInfo, Toolchain, ToolchainError};

/// Mock toolchain that answers from canned data and records every call
#[derive(Default)]
pub struct MockToolchain {
    tools_dir: Option<PathBuf>,
    build_infos: HashMap<PathBuf, String>,
    existing_modules: HashSet<String>,
    latest: HashMap<String, Result<String, String>>,
    install_failures: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tools_dir = Some(dir.into());
        self
    }

    /// Script `go version -m` output for a path
    pub fn with_build_info(mut self, path: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        self.build_infos.insert(path.into(), output.into());
        self
    }

    /// Script a Go binary built from `package` in `module` at `version`
    pub fn with_go_binary(self, path: impl Into<PathBuf>, package: &str, module: &str, version: &str) -> Self {
        let path = path.into();
        let output = format!(
            "{}: go1.22.1\n\tpath\t{}\n\tmod\t{}\t{}\th1:abc=\n",
            path.display(),
            package,
            module,
            version
        );
        self.with_build_info(path, output)
    }

    /// Make `<module>@latest` resolve for the existence probe
    pub fn with_existing_module(mut self, module: &str) -> Self {
        self.existing_modules.insert(module.to_string());
        self
    }

    /// Script the latest version query for a module
    pub fn with_latest(mut self, module: &str, version: &str) -> Self {
        self.latest.insert(module.to_string(), Ok(version.to_string()));
        self
    }

    /// Make the latest version query fail for a module
    pub fn with_latest_error(mut self, module: &str, message: &str) -> Self {
        self.latest.insert(module.to_string(), Err(message.to_string()));
        self
    }

    /// Make `go install <package>@latest` fail with the given output
    pub fn with_install_failure(mut self, package: &str, output: &str) -> Self {
        self.install_failures.insert(package.to_string(), output.to_string());
        self
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded calls starting with `prefix`
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }

    fn record(&self, call: String) {
        debug!(%call, "MockToolchain::record: called");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    async fn tools_dir(&self) -> Result<PathBuf, ToolchainError> {
        self.record("env".to_string());
        self.tools_dir
            .clone()
            .ok_or_else(|| ToolchainError::EmptyEnv("GOBIN and GOPATH are both empty".to_string()))
    }

    async fn build_info(&self, path: &Path) -> Result<String, ToolchainError> {
        self.record(format!("version {}", path.display()));
        self.build_infos
            .get(path)
            .cloned()
            .ok_or_else(|| ToolchainError::Failed {
                command: format!("go version -m {}", path.display()),
                status: "exit status: 1".to_string(),
                output: format!("{}: could not read Go build info", path.display()),
            })
    }

    async fn module_exists(&self, module: &str) -> bool {
        self.record(format!("probe {}", module));
        self.existing_modules.contains(module)
    }

    async fn latest_module(&self, module: &str) -> Result<ModuleInfo, ToolchainError> {
        self.record(format!("latest {}", module));
        match self.latest.get(module) {
            Some(Ok(version)) => Ok(ModuleInfo::new(module, version.as_str())),
            Some(Err(message)) => Err(ToolchainError::Failed {
                command: format!("go list -m -u -json {}@latest", module),
                status: "exit status: 1".to_string(),
                output: message.clone(),
            }),
            None => Err(ToolchainError::Failed {
                command: format!("go list -m -u -json {}@latest", module),
                status: "exit status: 1".to_string(),
                output: format!("go: module {}: no matching versions for query \"latest\"", module),
            }),
        }
    }

    async fn install(&self, package: &str) -> Result<String, ToolchainError> {
        self.record(format!("install {}", package));
        match self.install_failures.get(package) {
            Some(output) => Err(ToolchainError::Failed {
                command: format!("go install {}@latest", package),
                status: "exit status: 1".to_string(),
                output: output.clone(),
            }),
            None => Ok(format!("go: downloading {} latest", package)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockToolchain::new()
            .with_existing_module("example.com/tool/v2")
            .with_latest("example.com/tool/v2", "v2.1.0");

        assert!(mock.module_exists("example.com/tool/v2").await);
        assert!(!mock.module_exists("example.com/tool/v3").await);
        let info = mock.latest_module("example.com/tool/v2").await.unwrap();
        assert_eq!(info.version, "v2.1.0");

        assert_eq!(
            mock.calls(),
            vec![
                "probe example.com/tool/v2",
                "probe example.com/tool/v3",
                "latest example.com/tool/v2"
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_unknown_path_fails() {
        let mock = MockToolchain::new();
        assert!(mock.build_info(Path::new("/bin/ls")).await.is_err());
        assert!(mock.tools_dir().await.is_err());
    }
}
