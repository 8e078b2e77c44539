//! terraform::probes
//!
//! Git/Terraform version probes and the `test` report.
//!
//! # Design
//!
//! The probes shell out to the installed binaries and parse their version
//! banners leniently. A missing binary is a fatal diagnostic: every real
//! action needs Terraform, and the repository layout itself needs Git.
//!
//! The `test` action performs the entire resolution (all sanity checks
//! included) and prints the full deployment detail table without invoking
//! any mutating Terraform command.

use std::process::Command;

use thiserror::Error;

use crate::core::environment;
use crate::core::DeploymentContext;
use crate::ui::output::{self, Verbosity};

/// Errors from version probes.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{name} is not installed")]
    MissingBinary { name: &'static str },

    #[error("could not parse {name} version output")]
    UnparsableVersion { name: &'static str },
}

/// Detected Git version (e.g. `2.39.2`).
pub fn git_version() -> Result<String, ProbeError> {
    let output = Command::new("git")
        .arg("--version")
        .output()
        .map_err(|_| ProbeError::MissingBinary { name: "git" })?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_git_version(&stdout).ok_or(ProbeError::UnparsableVersion { name: "git" })
}

/// Detected Terraform version (e.g. `1.5.7`).
pub fn terraform_version() -> Result<String, ProbeError> {
    let output = Command::new("terraform")
        .arg("version")
        .output()
        .map_err(|_| ProbeError::MissingBinary { name: "terraform" })?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_terraform_version(&stdout).ok_or(ProbeError::UnparsableVersion { name: "terraform" })
}

/// Parse `git --version` output (`git version 2.39.2`).
fn parse_git_version(stdout: &str) -> Option<String> {
    stdout
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
}

/// Parse `terraform version` output (`Terraform v1.5.7`).
fn parse_terraform_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find(|line| line.contains("Terraform"))
        .and_then(|line| line.split(" v").nth(1))
        .map(|version| version.trim().to_string())
}

/// The `test` action: prerequisite versions plus the full context dump.
pub fn print_report(
    ctx: &DeploymentContext,
    action: &str,
    verbosity: Verbosity,
) -> Result<(), ProbeError> {
    output::print("Terraform Prerequisites Check", verbosity);
    output::print("=============================", verbosity);
    output::success(format!("Git version: {}", git_version()?), verbosity);
    output::success(
        format!("Terraform version: {}", terraform_version()?),
        verbosity,
    );
    output::print("", verbosity);

    output::print("Current Deployment Details", verbosity);
    output::print("==========================", verbosity);
    let details: [(&str, String); 23] = [
        ("Platform", ctx.platform.clone()),
        ("AppDir", ctx.location.display().to_string()),
        ("Repo Name", ctx.repo_name.clone()),
        ("Repo Root", ctx.repo_root.display().to_string()),
        ("Repo URL", ctx.repo_url.clone()),
        ("Branch Name", ctx.branch_name.clone()),
        ("Resource Name", ctx.resource.clone()),
        ("Cloud", ctx.cloud.to_string()),
        ("Project", ctx.project.clone()),
        ("Account", ctx.account.clone()),
        ("Environment", ctx.environment.clone()),
        (
            "Common Shell File",
            ctx.env_files.declaration.display().to_string(),
        ),
        (
            "Common Env File",
            ctx.env_files.common_vars.display().to_string(),
        ),
        (
            "Local Env File",
            ctx.env_files.local_vars.display().to_string(),
        ),
        ("Site (Target Env.)", ctx.site.clone()),
        ("Action", action.to_string()),
        ("DR", ctx.declaration.dr.clone().unwrap_or_default()),
        ("Prefix", ctx.prefix.clone()),
        ("Module", ctx.module.clone()),
        ("Backend Secret", ctx.secret_path.display().to_string()),
        ("Deployment Region", ctx.region.clone()),
        ("Backend Region", ctx.backend_region.clone()),
        ("Bucket", ctx.bucket.clone()),
    ];
    for (label, value) in details {
        output::success(format!("{:<18} = {}", label, value), verbosity);
    }
    output::success(format!("{:<18} = {}", "Key", ctx.bucket_key), verbosity);
    output::success(
        format!(
            "{:<18} = {}",
            "China Deployment",
            ctx.declaration.china_deployment.clone().unwrap_or_default()
        ),
        verbosity,
    );
    output::print("", verbosity);

    output::print("Terraform Variables", verbosity);
    output::print("===================", verbosity);
    for (key, value) in environment::overrides(ctx) {
        output::success(format!("{:<24} = {}", key, value), verbosity);
    }
    Ok(())
}
