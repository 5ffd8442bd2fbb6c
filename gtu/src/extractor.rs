//! Metadata extractor - turns an executable path into a tool descriptor

use std::path::Path;

use tracing::debug;

use crate::buildinfo::BuildInfo;
use crate::tool::ToolDescriptor;
use crate::toolchain::Toolchain;

/// Read build provenance from `path`
///
/// Returns `None` when the file isn't a Go binary, carries no module
/// information, or the toolchain can't read it. None of these are errors.
pub async fn extract_tool(toolchain: &dyn Toolchain, path: &Path) -> Option<ToolDescriptor> {
    debug!(?path, "extract_tool: called");
    let output = match toolchain.build_info(path).await {
        Ok(output) => output,
        Err(e) => {
            debug!(?path, %e, "extract_tool: no build info");
            return None;
        }
    };

    let info = match BuildInfo::parse(&output) {
        Ok(info) => info,
        Err(e) => {
            debug!(?path, %e, "extract_tool: build info not applicable");
            return None;
        }
    };

    debug!(?path, header_path = %info.path, go_version = %info.go_version, "extract_tool: parsed build info");
    let tool = ToolDescriptor::from_build_info(path, info);
    if !tool.is_valid() {
        debug!(?path, "extract_tool: descriptor missing package or module");
        return None;
    }

    debug!(tool = %tool.name, module = %tool.module_path, version = %tool.current_version, "extract_tool: extracted");
    Some(tool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::mock::MockToolchain;

    #[tokio::test]
    async fn test_extract_go_binary() {
        let mock = MockToolchain::new().with_go_binary(
            "/go/bin/dlv",
            "github.com/go-delve/delve/cmd/dlv",
            "github.com/go-delve/delve",
            "v1.22.1",
        );

        let tool = extract_tool(&mock, Path::new("/go/bin/dlv")).await.unwrap();
        assert_eq!(tool.name, "dlv");
        assert_eq!(tool.package_path, "github.com/go-delve/delve/cmd/dlv");
        assert_eq!(tool.module_path, "github.com/go-delve/delve");
        assert_eq!(tool.current_version, "v1.22.1");
        assert_eq!(tool.go_version, "go1.22.1");
        assert_eq!(mock.calls(), vec!["version /go/bin/dlv"]);
    }

    #[tokio::test]
    async fn test_non_go_binary_is_not_applicable() {
        let mock = MockToolchain::new();
        assert!(extract_tool(&mock, Path::new("/go/bin/script.sh")).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_mod_record_is_not_applicable() {
        let mock = MockToolchain::new().with_build_info("/go/bin/old", "/go/bin/old: go1.16\n\tpath\texample.com/old\n");
        assert!(extract_tool(&mock, Path::new("/go/bin/old")).await.is_none());
    }

    #[tokio::test]
    async fn test_garbage_output_is_not_applicable() {
        let mock = MockToolchain::new().with_build_info("/go/bin/odd", "something unexpected");
        assert!(extract_tool(&mock, Path::new("/go/bin/odd")).await.is_none());
    }
}
