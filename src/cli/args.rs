//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version` / `-V`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output; implies non-interactive
//!
//! # Action Token
//!
//! The single positional argument is the action, optionally fused with a
//! target site: `plan` or `plan-dr`. Action names contain no `-`, so the
//! first `-` separates action from site.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

/// TFBuild - resolve Terraform backend configuration and dispatch an action
#[derive(Parser, Debug)]
#[command(name = "tfbuild", bin_name = "tfb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if tfbuild was started in this directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Minimal output; implies non-interactive
    #[arg(short, long)]
    pub quiet: bool,

    /// Action to run: <action> or <action>-<site> (see 'tfb help')
    pub action: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Interactive unless `--quiet` was set or stdin is not a TTY.
    pub fn interactive(&self) -> bool {
        !self.quiet && std::io::stdin().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_and_flags() {
        let cli = Cli::try_parse_from(["tfb", "--debug", "plan-dr"]).unwrap();
        assert!(cli.debug);
        assert!(!cli.quiet);
        assert_eq!(cli.action, "plan-dr");
    }

    #[test]
    fn cwd_flag_takes_a_path() {
        let cli = Cli::try_parse_from(["tfb", "--cwd", "/tmp/repo/vpc", "test"]).unwrap();
        assert_eq!(cli.cwd.as_deref(), Some(std::path::Path::new("/tmp/repo/vpc")));
    }

    #[test]
    fn action_is_required() {
        assert!(Cli::try_parse_from(["tfb"]).is_err());
    }
}
