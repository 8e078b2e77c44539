//! core::config
//!
//! User-scope configuration.
//!
//! # Overview
//!
//! Two values are needed before the repository is read: the state bucket
//! prefix and the Terraform Cloud organization override.
//!
//! # Precedence
//!
//! Per value (first hit wins):
//! 1. Environment variable (`BUCKET_PREFIX`, `TF_CLOUD_ORG`)
//! 2. User config file
//! 3. Default (`"inf.tfstate"`; no organization)
//!
//! # Config File Locations
//!
//! Searched in order:
//! 1. `$TFBUILD_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tfbuild/config.toml`
//! 3. `~/.tfbuild/config.toml`
//!
//! A missing file is not an error; a present-but-invalid file is fatal.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::core::context::EnvSnapshot;

/// Default state bucket prefix.
pub const DEFAULT_BUCKET_PREFIX: &str = "inf.tfstate";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// On-disk config file schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    bucket_prefix: Option<String>,
    tf_cloud_org: Option<String>,
}

/// Resolved user configuration with precedence applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    /// State bucket prefix for AWS/Azure backend naming.
    pub bucket_prefix: String,
    /// Terraform Cloud organization override.
    pub tf_cloud_org: Option<String>,
    /// The config file that was read, if any.
    pub path: Option<PathBuf>,
}

impl UserConfig {
    /// Load configuration using `env` for variable overrides and locations.
    pub fn load(env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let path = config_path(env);
        let file = match &path {
            Some(path) if path.is_file() => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                toml::from_str::<ConfigFile>(&contents).map_err(|e| ConfigError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            _ => ConfigFile::default(),
        };

        let bucket_prefix = env
            .get("BUCKET_PREFIX")
            .map(str::to_string)
            .or(file.bucket_prefix)
            .unwrap_or_else(|| DEFAULT_BUCKET_PREFIX.to_string());
        let tf_cloud_org = env
            .get("TF_CLOUD_ORG")
            .map(str::to_string)
            .or(file.tf_cloud_org);

        Ok(Self {
            bucket_prefix,
            tf_cloud_org,
            path,
        })
    }
}

/// First existing (or first candidate) config file path.
///
/// `$TFBUILD_CONFIG` always wins when set. Otherwise the XDG location is
/// preferred, falling back to `~/.tfbuild/config.toml`; the first candidate
/// that exists is chosen, defaulting to the home location when none does.
fn config_path(env: &EnvSnapshot) -> Option<PathBuf> {
    if let Some(explicit) = env.get("TFBUILD_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    let mut candidates = Vec::new();
    if let Some(xdg) = env.get("XDG_CONFIG_HOME") {
        candidates.push(PathBuf::from(xdg).join("tfbuild").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".tfbuild").join("config.toml"));
    }

    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .or_else(|| candidates.into_iter().next())
}
