//! CLI argument parsing module for tagbump

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Rule-driven container tag bumper for value files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tagbump",
    version,
    about = "Rule-driven container tag bumper for value files"
)]
pub struct CliArgs {
    /// Repository root to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Rule file (JSON or TOML); built-in rules are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    // Plan inputs
    /// Planned new value for an image, as name=value (can be specified
    /// multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME=VALUE")]
    pub bump: Vec<String>,

    /// JSON file mapping image names to planned new values
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    // General options
    /// Dry run mode - report decisions without executing task commands
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["tagbump"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.config.is_none());
        assert!(args.bump.is_empty());
        assert!(args.plan.is_none());
        assert!(!args.dry_run);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.json);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["tagbump", "/some/repo"]);
        assert_eq!(args.path, PathBuf::from("/some/repo"));
    }

    #[test]
    fn test_config_flag() {
        let args = CliArgs::parse_from(["tagbump", "--config", "rules.json"]);
        assert_eq!(args.config, Some(PathBuf::from("rules.json")));

        let args = CliArgs::parse_from(["tagbump", "-c", "rules.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("rules.toml")));
    }

    #[test]
    fn test_bump_multiple() {
        let args = CliArgs::parse_from([
            "tagbump",
            "--bump",
            "nginx=1.26.0",
            "--bump",
            "redis=7.2.4",
        ]);
        assert_eq!(args.bump, vec!["nginx=1.26.0", "redis=7.2.4"]);
    }

    #[test]
    fn test_plan_flag() {
        let args = CliArgs::parse_from(["tagbump", "--plan", "plan.json"]);
        assert_eq!(args.plan, Some(PathBuf::from("plan.json")));
    }

    #[test]
    fn test_dry_run_flags() {
        let args = CliArgs::parse_from(["tagbump", "-n"]);
        assert!(args.dry_run);

        let args = CliArgs::parse_from(["tagbump", "--dry-run"]);
        assert!(args.dry_run);
    }

    #[test]
    fn test_verbose_flag() {
        let args = CliArgs::parse_from(["tagbump", "--verbose"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["tagbump", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["tagbump", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_json_output() {
        let args = CliArgs::parse_from(["tagbump", "--json"]);
        assert!(args.json);
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "tagbump",
            "/path/to/repo",
            "-n",
            "--verbose",
            "--bump",
            "nginx=1.26.0",
            "--plan",
            "plan.json",
            "--json",
        ]);
        assert_eq!(args.path, PathBuf::from("/path/to/repo"));
        assert!(args.dry_run);
        assert!(args.verbose);
        assert_eq!(args.bump, vec!["nginx=1.26.0"]);
        assert_eq!(args.plan, Some(PathBuf::from("plan.json")));
        assert!(args.json);
    }
}
