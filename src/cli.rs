//! Command-line arguments.
use std::path::PathBuf;

use clap::Parser;

/// Version string: `PROVISION_VERSION` at build time, else the crate version.
pub const VERSION: &str = match option_env!("PROVISION_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Provision a fresh macOS workstation.
///
/// Running with no arguments executes every step in order.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "provision",
    about = "Provision a fresh macOS workstation",
    version = VERSION
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Override the provisioning root directory
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Skip specific steps (matched case-insensitively against step names)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific steps (matched case-insensitively against step names)
    #[arg(long, value_delimiter = ',', conflicts_with = "skip")]
    pub only: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_runs_everything() {
        let cli = Cli::parse_from(["provision"]);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert!(cli.root.is_none());
        assert!(cli.skip.is_empty());
        assert!(cli.only.is_empty());
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["provision", "-d"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["provision", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_root() {
        let cli = Cli::parse_from(["provision", "--root", "/src/mac"]);
        assert_eq!(cli.root, Some(PathBuf::from("/src/mac")));
    }

    #[test]
    fn parse_skip_list() {
        let cli = Cli::parse_from(["provision", "--skip", "homebrew,vs code"]);
        assert_eq!(cli.skip, vec!["homebrew", "vs code"]);
    }

    #[test]
    fn parse_only() {
        let cli = Cli::parse_from(["provision", "--only", "config"]);
        assert_eq!(cli.only, vec!["config"]);
    }

    #[test]
    fn skip_and_only_conflict() {
        assert!(Cli::try_parse_from(["provision", "--skip", "a", "--only", "b"]).is_err());
    }

    #[test]
    fn subcommands_are_rejected() {
        assert!(Cli::try_parse_from(["provision", "install"]).is_err());
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }
}
