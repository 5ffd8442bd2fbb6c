//! Toolchain error types

use thiserror::Error;

/// Errors from invoking the Go toolchain
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}\nOutput: {output}")]
    Failed {
        command: String,
        status: String,
        output: String,
    },

    #[error("Failed to parse output of `{command}`: {source}")]
    Parse {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine the tools directory: {0}")]
    EmptyEnv(String),
}

impl ToolchainError {
    /// Captured command output, if the command ran and failed
    pub fn output(&self) -> Option<&str> {
        match self {
            ToolchainError::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message_includes_output() {
        let err = ToolchainError::Failed {
            command: "go install example.com/tool@latest".to_string(),
            status: "exit status: 1".to_string(),
            output: "go: module example.com/tool: not found".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("go install example.com/tool@latest"));
        assert!(msg.contains("not found"));
        assert_eq!(err.output(), Some("go: module example.com/tool: not found"));
    }

    #[test]
    fn test_empty_env_has_no_output() {
        let err = ToolchainError::EmptyEnv("GOBIN and GOPATH are empty".to_string());
        assert!(err.output().is_none());
        assert!(err.to_string().contains("GOBIN"));
    }
}
