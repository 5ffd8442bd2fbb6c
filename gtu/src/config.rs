//! gotoolup configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::orchestrator::OrchestratorConfig;
use crate::toolchain::Toolchain;

/// Main gotoolup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Go toolchain executable
    #[serde(rename = "go-binary")]
    pub go_binary: String,

    /// Directory to scan instead of asking the toolchain
    #[serde(rename = "tools-dir")]
    pub tools_dir: Option<PathBuf>,

    /// Max concurrent workers, 0 for unbounded
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            go_binary: "go".to_string(),
            tools_dir: None,
            max_concurrent: 0,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try user config: ~/.config/gotoolup/gotoolup.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = config_path.cloned().or_else(Self::user_config_path)?;
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gotoolup").join("gotoolup.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory to scan: `cli_dir`, then `tools-dir`, then the toolchain's install dir
    pub async fn resolve_tools_dir(&self, cli_dir: Option<&Path>, toolchain: &dyn Toolchain) -> Result<PathBuf> {
        if let Some(dir) = cli_dir {
            debug!(dir = %dir.display(), "Config::resolve_tools_dir: using --dir");
            return Ok(dir.to_path_buf());
        }

        if let Some(dir) = &self.tools_dir {
            debug!(dir = %dir.display(), "Config::resolve_tools_dir: using tools-dir");
            return Ok(dir.clone());
        }

        debug!("Config::resolve_tools_dir: asking toolchain");
        toolchain
            .tools_dir()
            .await
            .context("Failed to determine Go tools directory")
    }

    /// Orchestrator settings derived from this config
    pub fn orchestrator(&self, check_only: bool) -> OrchestratorConfig {
        debug!(max_concurrent = self.max_concurrent, check_only, "Config::orchestrator: called");
        OrchestratorConfig {
            max_concurrent: self.max_concurrent,
            check_only,
        }
    }
}
