//! CLI definition

use clap::Parser;
use std::path::PathBuf;

/// gotoolup - update Go-installed tools
#[derive(Debug, Parser)]
#[command(
    name = "gtu",
    about = "Check and update binaries installed with `go install`",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    /// Directory to scan (defaults to GOBIN, then GOPATH/bin)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Max concurrent checks and installs, 0 for unbounded
    #[arg(short = 'j', long = "max-concurrent", value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// Update without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Only report which tools can be updated
    #[arg(long, conflicts_with = "yes")]
    pub check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["gtu"]);
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(cli.dir.is_none());
        assert!(cli.max_concurrent.is_none());
        assert!(!cli.yes);
        assert!(!cli.check);
    }

    #[test]
    fn test_cli_parse_all() {
        let cli = Cli::parse_from([
            "gtu",
            "-c",
            "/tmp/gotoolup.yml",
            "-l",
            "debug",
            "--dir",
            "/home/user/go/bin",
            "-j",
            "4",
            "--yes",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/gotoolup.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.dir, Some(PathBuf::from("/home/user/go/bin")));
        assert_eq!(cli.max_concurrent, Some(4));
        assert!(cli.yes);
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["gtu", "--check"]);
        assert!(cli.check);
    }

    #[test]
    fn test_cli_check_conflicts_with_yes() {
        assert!(Cli::try_parse_from(["gtu", "--check", "--yes"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_max_concurrent() {
        assert!(Cli::try_parse_from(["gtu", "-j", "many"]).is_err());
    }
}
