//! cli
//!
//! Command-line interface layer for TFBuild.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve the deployment context for actions that need one
//! - Delegate to the [`crate::terraform::Dispatcher`]
//!
//! # Architecture
//!
//! The CLI layer is thin. `help` and `version` resolve no context; every
//! other action runs the full resolution pipeline first, so no Terraform
//! process ever starts from an invalid layout.

pub mod args;

pub use args::Cli;

use anyhow::Result;

use crate::core::{DeploymentContext, EnvSnapshot, ResolveRequest};
use crate::terraform::{Action, Dispatcher};
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// Returns the process exit code. Errors are mapped to exit code 2 in
/// `main.rs`.
pub fn run() -> Result<i32> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let (action, site) = Action::parse_token(&cli.action)?;
    if !action.needs_context() {
        return dispatch_contextless(action);
    }

    let cwd = match cli.cwd.clone() {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let env = EnvSnapshot::from_process();

    let ctx = DeploymentContext::resolve(&ResolveRequest {
        cwd: &cwd,
        env: &env,
        site: site.as_deref(),
    })?;

    if let Some(path) = &ctx.missing_common_vars {
        output::notice(
            format!(
                "no common environment file available; create:\n  {}\nand add configuration content if necessary",
                path.display()
            ),
            verbosity,
        );
    }
    output::debug(format!("resolved context: {:#?}", ctx), verbosity);

    Dispatcher::new(&ctx, &env, verbosity, cli.interactive()).run(action)
}

/// Dispatch `help`/`version`, which need no resolved context.
fn dispatch_contextless(action: Action) -> Result<i32> {
    match action {
        Action::Help => {
            println!("{}", crate::terraform::dispatch::action_help());
            Ok(0)
        }
        Action::Version => {
            println!(
                "{} version: {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            );
            Ok(0)
        }
        _ => unreachable!("contextless dispatch only handles help/version"),
    }
}
