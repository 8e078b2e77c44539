//! terraform::dispatch
//!
//! The action table and per-cloud `terraform init`.
//!
//! # Actions
//!
//! Most actions are `init`/`reinit` followed by one Terraform command with
//! the resolved `-var-file` list. `init` deletes the local `.terraform`
//! cache first; `reinit` keeps it. The backend arguments for `init` come
//! straight from the decision table:
//!
//! - AWS: S3 bucket/key/region
//! - Azure: storage account, `<account>1` container, key, plus the secret
//!   backend file
//! - Terraform Cloud: ensure the remote workspace, then point Terraform at
//!   the generated `.terraform/backend-<environment>.hcl`
//! - anything else: local backend, bare `terraform init`
//!
//! # Exit Codes
//!
//! A failed Terraform subprocess propagates the child's exit status; the
//! dispatcher never continues a multi-step action past a failing step.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use anyhow::{bail, Context as _, Result};
use thiserror::Error;

use crate::core::environment;
use crate::core::{DeploymentContext, EnvSnapshot};
use crate::terraform::{probes, taint};
use crate::ui::output::{self, Verbosity};
use crate::workspace::{resolve_token, TerraformCloud, WorkspaceProvider};

/// Unknown action token.
#[derive(Debug, Error)]
#[error("unknown action '{token}'; run 'tfb help' for the list of actions")]
pub struct UnknownActionError {
    pub token: String,
}

/// The supported Terraform actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Apply,
    ApplyNoPrompt,
    Destroy,
    DestroyForce,
    Help,
    Init,
    Plan,
    PlanDestroy,
    Refresh,
    Reinit,
    Replan,
    Taint,
    Test,
    TfImport,
    Update,
    Version,
}

impl Action {
    /// Parse a CLI token of the form `<action>` or `<action>-<site>`.
    ///
    /// Action names contain no `-`, so the first `-` separates the action
    /// from the site. An empty site segment is treated as no site.
    pub fn parse_token(token: &str) -> Result<(Action, Option<String>), UnknownActionError> {
        if let Ok(action) = token.parse() {
            return Ok((action, None));
        }
        if let Some((action, site)) = token.split_once('-') {
            let action = action.parse()?;
            let site = if site.is_empty() {
                None
            } else {
                Some(site.to_string())
            };
            return Ok((action, site));
        }
        Err(UnknownActionError {
            token: token.to_string(),
        })
    }

    /// Whether this action requires a resolved deployment context.
    pub fn needs_context(&self) -> bool {
        !matches!(self, Action::Help | Action::Version)
    }
}

impl FromStr for Action {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply" => Ok(Action::Apply),
            "applynoprompt" => Ok(Action::ApplyNoPrompt),
            "destroy" => Ok(Action::Destroy),
            "destroyforce" => Ok(Action::DestroyForce),
            "help" => Ok(Action::Help),
            "init" => Ok(Action::Init),
            "plan" => Ok(Action::Plan),
            "plandestroy" => Ok(Action::PlanDestroy),
            "refresh" => Ok(Action::Refresh),
            "reinit" => Ok(Action::Reinit),
            "replan" => Ok(Action::Replan),
            "taint" => Ok(Action::Taint),
            "test" => Ok(Action::Test),
            "tfimport" => Ok(Action::TfImport),
            "update" => Ok(Action::Update),
            "version" => Ok(Action::Version),
            _ => Err(UnknownActionError {
                token: s.to_string(),
            }),
        }
    }
}

/// Runs Terraform actions against a resolved deployment context.
pub struct Dispatcher<'a> {
    ctx: &'a DeploymentContext,
    env: &'a EnvSnapshot,
    verbosity: Verbosity,
    interactive: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        ctx: &'a DeploymentContext,
        env: &'a EnvSnapshot,
        verbosity: Verbosity,
        interactive: bool,
    ) -> Self {
        Self {
            ctx,
            env,
            verbosity,
            interactive,
        }
    }

    /// Run `action`, returning the process exit code.
    pub fn run(&self, action: Action) -> Result<i32> {
        match action {
            Action::Apply => self.chain(Action::Init, || {
                output::success("Running Terraform Apply", self.verbosity);
                self.terraform_with_var_files(&["apply"])
            }),
            Action::ApplyNoPrompt => self.chain(Action::Reinit, || {
                output::success("Running Terraform Apply", self.verbosity);
                self.terraform_with_var_files(&["apply", "-input=false", "-auto-approve"])
            }),
            Action::Destroy => self.chain(Action::Init, || {
                output::success("Running Terraform Destroy", self.verbosity);
                self.terraform_with_var_files(&["destroy"])
            }),
            Action::DestroyForce => self.chain(Action::Reinit, || {
                output::success("Running Terraform Destroy Force", self.verbosity);
                self.terraform_with_var_files(&["destroy", "-force"])
            }),
            Action::Help => {
                println!("{}", action_help());
                Ok(0)
            }
            Action::Init => self.init(),
            Action::Plan => self.chain(Action::Init, || {
                output::success("Creating a Terraform Plan", self.verbosity);
                self.terraform_with_var_files(&["plan"])
            }),
            Action::PlanDestroy => self.chain(Action::Init, || {
                output::success("Creating a Destroy Plan", self.verbosity);
                self.terraform_with_var_files(&["plan", "-input=false", "-refresh=true", "-destroy"])
            }),
            Action::Refresh => self.terraform_with_var_files(&["refresh"]),
            Action::Reinit => self.reinit(),
            Action::Replan => self.chain(Action::Reinit, || {
                output::success("Running Terraform Plan", self.verbosity);
                self.terraform_with_var_files(&["plan"])
            }),
            Action::Taint => self.chain(Action::Init, || {
                taint::run(self.ctx, self.env, self.verbosity, self.interactive)
            }),
            Action::Test => {
                probes::print_report(self.ctx, "test", self.verbosity)?;
                Ok(0)
            }
            Action::TfImport => self.chain(Action::Init, || {
                output::success("Running Terraform Import", self.verbosity);
                self.terraform_with_var_files(&["import"])
            }),
            Action::Update => {
                output::success("Updating Modules", self.verbosity);
                self.terraform_with_var_files(&["get", "-update=true"])
            }
            Action::Version => {
                println!("{} version: {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(0)
            }
        }
    }

    /// Run a prerequisite action, then `next` if it succeeded.
    fn chain(&self, first: Action, next: impl FnOnce() -> Result<i32>) -> Result<i32> {
        let code = self.run(first)?;
        if code != 0 {
            return Ok(code);
        }
        next()
    }

    /// `init`: drop the local cache, then `reinit`.
    fn init(&self) -> Result<i32> {
        output::success("Initializing Terraform", self.verbosity);
        let cache = self.terraform_dir();
        if cache.exists() {
            output::success("Removing .terraform", self.verbosity);
            fs::remove_dir_all(&cache)
                .with_context(|| format!("failed to remove '{}'", cache.display()))?;
        }
        self.reinit()
    }

    /// Per-cloud `terraform init`, keeping the local cache.
    fn reinit(&self) -> Result<i32> {
        let ctx = self.ctx;
        match ctx.cloud {
            crate::core::Cloud::Aws => {
                output::success("Initializing AWS Backend", self.verbosity);
                self.terraform(&[
                    "init".to_string(),
                    "-backend-config".to_string(),
                    format!("region={}", ctx.backend_region),
                    "-backend-config".to_string(),
                    format!("bucket={}", ctx.bucket),
                    "-backend-config".to_string(),
                    format!("key={}", ctx.bucket_key),
                ])
            }
            crate::core::Cloud::Azr => {
                output::success("Initializing AZR Backend", self.verbosity);
                self.terraform(&[
                    "init".to_string(),
                    "-backend-config".to_string(),
                    format!("storage_account_name={}", ctx.bucket),
                    "-backend-config".to_string(),
                    format!("container_name={}1", ctx.account),
                    "-backend-config".to_string(),
                    format!("key={}", ctx.bucket_key),
                    "-backend-config".to_string(),
                    ctx.secret_path.to_string_lossy().into_owned(),
                ])
            }
            _ if ctx.uses_tf_cloud_workspace() => {
                output::success("Initializing Terraform Cloud Backend", self.verbosity);
                self.ensure_cloud_workspace()?;
                self.terraform(&[
                    "init".to_string(),
                    "-backend-config".to_string(),
                    format!("organization={}", ctx.account),
                    "-backend-config".to_string(),
                    self.backend_config_file().to_string_lossy().into_owned(),
                ])
            }
            _ => {
                output::success("Initializing Terraform Local Backend", self.verbosity);
                self.terraform(&["init".to_string()])
            }
        }
    }

    /// Ensure the remote workspace exists and the local backend-config file
    /// is in place.
    fn ensure_cloud_workspace(&self) -> Result<i32> {
        let organization = match self.ctx.tf_cloud_org.as_deref() {
            Some(org) if !org.is_empty() => org,
            _ => bail!(
                "no Terraform Cloud organization configured; set TF_CLOUD_ORG or add tf_cloud_org to {}",
                self.ctx.env_files.declaration.display()
            ),
        };
        let token = resolve_token(self.env)?;
        let terraform_version = probes::terraform_version()?;

        let provider = TerraformCloud::new(organization, token);
        let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
        runtime
            .block_on(provider.ensure_workspace(&self.ctx.bucket_key, &terraform_version))
            .with_context(|| format!("failed to ensure workspace '{}'", self.ctx.bucket_key))?;

        self.write_backend_config_file()?;
        Ok(0)
    }

    /// Write `.terraform/backend-<environment>.hcl`, only when no local
    /// `.terraform` directory exists yet.
    fn write_backend_config_file(&self) -> Result<()> {
        let cache = self.terraform_dir();
        if cache.exists() {
            return Ok(());
        }
        output::success(
            "Creating .terraform directory and backend configuration",
            self.verbosity,
        );
        fs::create_dir_all(&cache)
            .with_context(|| format!("failed to create '{}'", cache.display()))?;
        let path = self.backend_config_file();
        fs::write(
            &path,
            format!("workspaces {{ name = \"{}\" }}", self.ctx.bucket_key),
        )
        .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }

    fn terraform_dir(&self) -> PathBuf {
        self.ctx.location.join(".terraform")
    }

    fn backend_config_file(&self) -> PathBuf {
        self.terraform_dir()
            .join(format!("backend-{}.hcl", self.ctx.environment))
    }

    /// Run `terraform <args> <var-files>`.
    fn terraform_with_var_files(&self, args: &[&str]) -> Result<i32> {
        let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        full.extend(self.ctx.var_file_args());
        self.terraform(&full)
    }

    /// Spawn Terraform with the exported environment overrides and wait.
    fn terraform(&self, args: &[String]) -> Result<i32> {
        output::debug(format!("terraform {}", args.join(" ")), self.verbosity);
        let status = Command::new("terraform")
            .args(args)
            .current_dir(&self.ctx.location)
            .envs(environment::overrides(self.ctx))
            .status()
            .context("failed to run terraform; is it installed and on PATH?")?;
        Ok(status.code().unwrap_or(1))
    }
}

/// The `help` action output.
pub fn action_help() -> String {
    format!(
        "\
Usage:
   {name} <command>
   {name} <command>-<site>

Example:
   {name} plan
   {name} plan-dr

Commands:
   apply          Apply Terraform configuration
   applynoprompt  Apply Terraform configuration with no prompt
   destroy        Destroy Terraform configuration
   destroyforce   Destroy Terraform configuration with no prompt
   help           Display the help menu that shows available commands
   init           Initialize Terraform backend and clean local cache
   plan           Create Terraform plan with clean local cache
   plandestroy    Create a plan for a destroy scenario
   refresh        Refresh Terraform state
   reinit         Initialize Terraform backend and keep local cache
   replan         Create Terraform plan with existing local cache
   taint          Taint specific modules and resources
   test           Test run showing all project variables
   tfimport       Import states for existing resources
   update         Update Terraform modules
   version        App version",
        name = "tfb"
    )
}
