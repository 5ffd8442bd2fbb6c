//! Orchestrator configuration

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Orchestrator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Max workers running at once, 0 for one worker per tool with no limit
    #[serde(default)]
    pub max_concurrent: usize,

    /// Report updatable tools without prompting or updating
    #[serde(default)]
    pub check_only: bool,
}

impl OrchestratorConfig {
    /// The concurrency cap, if any
    pub fn limit(&self) -> Option<usize> {
        debug!(max_concurrent = self.max_concurrent, "OrchestratorConfig::limit: called");
        (self.max_concurrent > 0).then_some(self.max_concurrent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.limit(), None);
        assert!(!config.check_only);
    }

    #[test]
    fn test_limit() {
        let config = OrchestratorConfig {
            max_concurrent: 8,
            ..Default::default()
        };
        assert_eq!(config.limit(), Some(8));
    }
}
