//! core::context
//!
//! The immutable [`DeploymentContext`] and the resolution pipeline.
//!
//! # Design
//!
//! `DeploymentContext::resolve` is the single construction pass: it reads
//! the VCS state and the environment file hierarchy, runs the naming parser,
//! the sanity validator and the backend decision table, and returns a fully
//! populated, immutable context. Nothing mutates the context afterwards;
//! the dispatcher and the exporter only read it.
//!
//! All ambient inputs are explicit: the working directory and the
//! environment-variable snapshot are arguments, so the whole pipeline is a
//! function `(cwd, env, site) -> DeploymentContext` that tests drive with
//! fixture repositories and synthetic snapshots.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::backend::{self, BackendInputs};
use crate::core::config::{ConfigError, UserConfig};
use crate::core::declaration::{Declaration, DeclarationError};
use crate::core::envfiles::{self, EnvFiles};
use crate::core::naming::{self, Cloud, NamingError};
use crate::core::sanity::{self, SanityError, SanityInputs};
use crate::git::{Git, GitError};

/// Errors from configuration resolution.
///
/// Every variant is fatal for the invocation; the CLI maps them to exit
/// code 2. The messages are user-facing diagnostics, not stack traces.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Repo(#[from] GitError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Sanity(#[from] SanityError),

    #[error("failed to resolve directory '{path}': {source}")]
    Workdir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Immutable snapshot of the process environment variables.
///
/// Taken once at startup and passed explicitly, so resolution never reads
/// `std::env` behind the caller's back.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs (used by tests).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: pairs.into_iter().collect(),
        }
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Inputs to one resolution pass.
#[derive(Debug)]
pub struct ResolveRequest<'a> {
    /// Working directory to resolve from.
    pub cwd: &'a Path,
    /// Environment snapshot for overrides (`BUCKET_PREFIX`, `TF_CLOUD_ORG`,
    /// `BUILD_ID`, config file locations).
    pub env: &'a EnvSnapshot,
    /// Optional target site selected via the fused `<action>-<site>` form.
    pub site: Option<&'a str>,
}

/// Fully resolved deployment context.
///
/// Built once per invocation; immutable after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentContext {
    /// Host platform (`linux`, `macos`, `windows`).
    pub platform: String,
    /// Canonicalized working directory.
    pub location: PathBuf,
    /// Canonicalized repository root.
    pub repo_root: PathBuf,
    /// First remote URL.
    pub repo_url: String,
    /// Repository name (basename of the remote URL, extension stripped).
    pub repo_name: String,
    /// Active branch name.
    pub branch_name: String,
    pub cloud: Cloud,
    pub project: String,
    pub account: String,
    pub environment: String,
    /// Target site; empty when none is selected.
    pub site: String,
    /// Working directory relative to the repo root, `/`-normalized.
    pub resource: String,
    /// `secret_<cloud>_backend.tfvars` at the repository root.
    pub secret_path: PathBuf,
    pub env_files: EnvFiles,
    pub declaration: Declaration,
    /// Deployment region from the declaration file (may be empty).
    pub region: String,
    /// `tf_cli_args` after `REPO_PATH` substitution.
    pub tf_cli_args: String,
    pub bucket_prefix: String,
    /// CI build identifier, informational only.
    pub build_id: Option<String>,
    pub prefix: String,
    pub module: String,
    pub bucket: String,
    pub bucket_key: String,
    pub backend_region: String,
    /// Terraform Cloud organization; set only on the workspace backend path.
    pub tf_cloud_org: Option<String>,
    /// Variable files in invocation order: secret, local, common.
    pub var_files: Vec<PathBuf>,
    /// Set when the common variable file is absent (soft condition).
    pub missing_common_vars: Option<PathBuf>,
}

impl DeploymentContext {
    /// Run the full resolution pipeline.
    pub fn resolve(req: &ResolveRequest<'_>) -> Result<Self, ResolveError> {
        let location = canonicalize(req.cwd)?;

        let git = Git::open(&location)?;
        let repo_root = canonicalize(&git.work_dir()?)?;
        let repo_url = git.first_remote_url()?;
        let branch_name = git.current_branch()?;
        let repo_name = repo_name_from_url(&repo_url);

        let parts = naming::parse(&repo_name, &branch_name)?;
        let resource = relative_resource(&location, &repo_root);

        let config = UserConfig::load(req.env)?;
        let build_id = req.env.get("BUILD_ID").map(str::to_string);

        let secret_path = repo_root.join(format!("secret_{}_backend.tfvars", parts.cloud));
        let env_files = envfiles::locate(&repo_root, &location, &parts.environment, req.site);

        let declaration = Declaration::load(&env_files.declaration, &repo_root)?;
        let region = declaration.region.clone().unwrap_or_default();
        let tf_cli_args = declaration.tf_cli_args.clone().unwrap_or_default();

        let outcome = sanity::check(&SanityInputs {
            repo_root: &repo_root,
            location: &location,
            cloud: &parts.cloud,
            region: declaration.region.as_deref(),
            secret_path: &secret_path,
            files: &env_files,
        })?;

        let backend = backend::build(&BackendInputs {
            cloud: &parts.cloud,
            project: &parts.project,
            account: &parts.account,
            environment: &parts.environment,
            site: req.site,
            resource: &resource,
            region: &region,
            bucket_prefix: &config.bucket_prefix,
            declaration: &declaration,
            tf_cloud_org_override: config.tf_cloud_org.as_deref(),
        });

        Ok(Self {
            platform: std::env::consts::OS.to_string(),
            location,
            repo_root,
            repo_url,
            repo_name,
            branch_name,
            cloud: parts.cloud,
            project: parts.project,
            account: parts.account,
            environment: parts.environment,
            site: backend.site,
            resource,
            secret_path,
            env_files,
            declaration,
            region,
            tf_cli_args,
            bucket_prefix: config.bucket_prefix,
            build_id,
            prefix: backend.prefix,
            module: backend.module,
            bucket: backend.bucket,
            bucket_key: backend.bucket_key,
            backend_region: backend.backend_region,
            tf_cloud_org: backend.tf_cloud_org,
            var_files: outcome.var_files,
            missing_common_vars: outcome.missing_common_vars,
        })
    }

    /// The resolved variable files as `-var-file=<path>` tokens, in order.
    pub fn var_file_args(&self) -> Vec<String> {
        self.var_files
            .iter()
            .map(|path| format!("-var-file={}", path.display()))
            .collect()
    }

    /// Whether the decision table selected the Terraform Cloud workspace backend.
    pub fn uses_tf_cloud_workspace(&self) -> bool {
        self.tf_cloud_org.is_some()
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, ResolveError> {
    fs::canonicalize(path).map_err(|source| ResolveError::Workdir {
        path: path.to_path_buf(),
        source,
    })
}

/// Working directory relative to the repo root, `/`-normalized.
///
/// Yields an empty string at the repo root itself; the sanity validator
/// rejects that case before the value is used.
fn relative_resource(location: &Path, repo_root: &Path) -> String {
    let relative = location.strip_prefix(repo_root).unwrap_or(location);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Repository name: basename of the remote URL with the extension stripped.
fn repo_name_from_url(url: &str) -> String {
    let tail = url.rsplit('/').next().unwrap_or(url);
    let tail = tail.rsplit(':').next().unwrap_or(tail);
    Path::new(tail)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| tail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_name_from_https_url() {
        assert_eq!(
            repo_name_from_url("https://github.com/org/aws-billing.git"),
            "aws-billing"
        );
    }

    #[test]
    fn repo_name_from_scp_url() {
        assert_eq!(
            repo_name_from_url("git@github.com:org/azr-net.git"),
            "azr-net"
        );
        assert_eq!(repo_name_from_url("git@github.com:azr-net.git"), "azr-net");
    }

    #[test]
    fn repo_name_without_extension() {
        assert_eq!(
            repo_name_from_url("https://github.com/org/gcp-data"),
            "gcp-data"
        );
    }

    #[test]
    fn relative_resource_is_slash_normalized() {
        assert_eq!(
            relative_resource(Path::new("/repo/compute/cluster"), Path::new("/repo")),
            "compute/cluster"
        );
        assert_eq!(relative_resource(Path::new("/repo"), Path::new("/repo")), "");
    }

    #[test]
    fn env_snapshot_lookup() {
        let env = EnvSnapshot::from_pairs([("BUILD_ID".to_string(), "42".to_string())]);
        assert_eq!(env.get("BUILD_ID"), Some("42"));
        assert_eq!(env.get("MISSING"), None);
    }
}
