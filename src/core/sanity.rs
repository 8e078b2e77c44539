//! core::sanity
//!
//! Preflight layout checks.
//!
//! # Design
//!
//! Checks run in a fixed order and the first failure wins. There is no
//! partial recovery: every failure is fatal for the invocation. The one
//! soft condition, a missing common variable file, is reported through
//! [`SanityOutcome::missing_common_vars`] so the caller can print a notice
//! and continue.
//!
//! The check order also fixes the `-var-file` ordering consumed by every
//! Terraform action: secret backend file, then local variable file, then
//! common variable file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::envfiles::EnvFiles;
use crate::core::naming::Cloud;

/// Errors from the preflight checks.
#[derive(Debug, Error)]
pub enum SanityError {
    /// Invoked from the repository root instead of a resource directory.
    #[error(
        "executing from the repository root\nensure execution from a resource directory"
    )]
    RepoRoot { root: PathBuf },

    /// No local variable file and no Terraform files: wrong directory.
    #[error(
        "no Terraform files in {location}\nexecuting from an improper location; ensure execution from a resource directory"
    )]
    WrongLocation { location: PathBuf },

    /// Local variable file missing from an otherwise valid resource directory.
    #[error(
        "no local environment file at this location; create:\n  {path}\nand add configuration content if necessary"
    )]
    MissingLocalVarFile { path: PathBuf },

    /// Region is mandatory for AWS and Azure deployments.
    #[error("specify 'region' in the file:\n  {declaration}")]
    MissingRegion { declaration: PathBuf },

    /// Resource directory could not be listed.
    #[error("failed to read directory '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Inputs to the preflight checks.
#[derive(Debug)]
pub struct SanityInputs<'a> {
    pub repo_root: &'a Path,
    pub location: &'a Path,
    pub cloud: &'a Cloud,
    /// Deployment region from the declaration file, if any.
    pub region: Option<&'a str>,
    /// `secret_<cloud>_backend.tfvars` at the repository root.
    pub secret_path: &'a Path,
    pub files: &'a EnvFiles,
}

/// Result of a successful preflight pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityOutcome {
    /// Variable files in invocation order: secret, local, common.
    pub var_files: Vec<PathBuf>,
    /// Set when the common variable file is absent (soft condition).
    pub missing_common_vars: Option<PathBuf>,
}

/// Run the ordered preflight checks.
pub fn check(inputs: &SanityInputs<'_>) -> Result<SanityOutcome, SanityError> {
    let mut var_files = Vec::new();

    if inputs.secret_path.is_file() {
        var_files.push(inputs.secret_path.to_path_buf());
    }

    if inputs.location == inputs.repo_root {
        return Err(SanityError::RepoRoot {
            root: inputs.repo_root.to_path_buf(),
        });
    }

    if !inputs.files.local_vars.is_file() {
        if !has_terraform_files(inputs.location)? {
            return Err(SanityError::WrongLocation {
                location: inputs.location.to_path_buf(),
            });
        }
        return Err(SanityError::MissingLocalVarFile {
            path: inputs.files.local_vars.clone(),
        });
    }
    var_files.push(inputs.files.local_vars.clone());

    let missing_common_vars = if inputs.files.common_vars.is_file() {
        var_files.push(inputs.files.common_vars.clone());
        None
    } else {
        Some(inputs.files.common_vars.clone())
    };

    if inputs.region.unwrap_or("").is_empty()
        && matches!(inputs.cloud, Cloud::Aws | Cloud::Azr)
    {
        return Err(SanityError::MissingRegion {
            declaration: inputs.files.declaration.clone(),
        });
    }

    Ok(SanityOutcome {
        var_files,
        missing_common_vars,
    })
}

/// Whether `location` holds any `.tf` files.
fn has_terraform_files(location: &Path) -> Result<bool, SanityError> {
    let entries = location.read_dir().map_err(|source| SanityError::Io {
        path: location.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| SanityError::Io {
            path: location.to_path_buf(),
            source,
        })?;
        if entry.path().extension().is_some_and(|ext| ext == "tf") {
            return Ok(true);
        }
    }
    Ok(false)
}
