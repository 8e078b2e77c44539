//! core::declaration
//!
//! Declaration file reader.
//!
//! # Format
//!
//! The common declaration file (`env_<suffix>.hcl`) is a flat HCL key/value
//! document, e.g.:
//!
//! ```hcl
//! region = "us-east-1"
//! dr     = "true"
//! ```
//!
//! Recognized keys: `china_deployment`, `dr`, `global_resource`, `mode`,
//! `region`, `tf_cloud_backend`, `tf_cloud_org`, `tf_cli_args`. Unknown keys
//! are ignored.
//!
//! # Flag Semantics
//!
//! Flags are tri-state: absent (`None`) is distinguishable from any present
//! value. Boolean-like flags are enabled only by the literal string
//! `"true"`, except `global_resource` which compares against `"True"`
//! (observed legacy behavior, preserved).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from declaration file loading.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// The declaration file does not exist.
    #[error(
        "missing common declaration file:\n  {path}\ncreate it and add configuration content if necessary"
    )]
    Missing { path: PathBuf },

    /// The declaration file could not be read.
    #[error("failed to read declaration file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The declaration file is not valid HCL.
    #[error("failed to parse declaration file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Typed flags read from the common declaration file.
///
/// Every field defaults to absent; a missing key never fails the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Declaration {
    pub china_deployment: Option<String>,
    pub dr: Option<String>,
    pub global_resource: Option<String>,
    pub mode: Option<String>,
    pub region: Option<String>,
    pub tf_cloud_backend: Option<String>,
    pub tf_cloud_org: Option<String>,
    pub tf_cli_args: Option<String>,
}

impl Declaration {
    /// Load the declaration file at `path`.
    ///
    /// The `${REPO_PATH}`/`$REPO_PATH` tokens inside `tf_cli_args` are
    /// substituted with `repo_root` during the load, so consumers only ever
    /// see the resolved value.
    pub fn load(path: &Path, repo_root: &Path) -> Result<Self, DeclarationError> {
        if !path.is_file() {
            return Err(DeclarationError::Missing {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|source| DeclarationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut declaration: Declaration =
            hcl::from_str(&contents).map_err(|e| DeclarationError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Some(args) = declaration.tf_cli_args.take() {
            declaration.tf_cli_args = Some(substitute_repo_path(&args, repo_root));
        }
        Ok(declaration)
    }

    /// Whether DR deployment is enabled (`dr = "true"`).
    pub fn dr_enabled(&self) -> bool {
        self.dr.as_deref() == Some("true")
    }

    /// Whether the mode suffix is enabled (`mode = "true"`).
    pub fn mode_enabled(&self) -> bool {
        self.mode.as_deref() == Some("true")
    }

    /// Whether this is a China-region deployment (`china_deployment = "true"`).
    pub fn china_enabled(&self) -> bool {
        self.china_deployment.as_deref() == Some("true")
    }

    /// Whether the resource is account-global (`global_resource = "True"`).
    pub fn global_resource_enabled(&self) -> bool {
        self.global_resource.as_deref() == Some("True")
    }

    /// Whether the Terraform Cloud workspace backend is requested.
    pub fn tf_cloud_enabled(&self) -> bool {
        self.tf_cloud_backend.as_deref() == Some("true")
    }
}

/// Replace `${REPO_PATH}`/`$REPO_PATH` with the repository root.
///
/// On Windows every path separator is doubled afterwards so the value
/// survives Terraform's argument parsing.
fn substitute_repo_path(args: &str, repo_root: &Path) -> String {
    let root = repo_root.to_string_lossy();
    let substituted = args
        .replace("${REPO_PATH}", &root)
        .replace("$REPO_PATH", &root);
    if cfg!(windows) {
        substituted.replace('\\', "\\\\").replace('/', "\\\\")
    } else {
        substituted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_declaration(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("env_dev.hcl");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_recognized_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_declaration(
            &dir,
            r#"
            region           = "us-east-1"
            dr               = "true"
            china_deployment = "false"
            "#,
        );
        let declaration = Declaration::load(&path, Path::new("/repo")).unwrap();
        assert_eq!(declaration.region.as_deref(), Some("us-east-1"));
        assert!(declaration.dr_enabled());
        assert!(!declaration.china_enabled());
        assert_eq!(declaration.mode, None);
    }

    #[test]
    fn missing_key_is_absent_not_false() {
        let dir = TempDir::new().unwrap();
        let path = write_declaration(&dir, "region = \"eu-west-1\"\n");
        let declaration = Declaration::load(&path, Path::new("/repo")).unwrap();
        assert_eq!(declaration.dr, None);
        assert_ne!(declaration.dr, Some(String::new()));
    }

    #[test]
    fn global_resource_is_capitalized_true() {
        let dir = TempDir::new().unwrap();
        let path = write_declaration(&dir, "global_resource = \"True\"\n");
        let declaration = Declaration::load(&path, Path::new("/repo")).unwrap();
        assert!(declaration.global_resource_enabled());

        let path = write_declaration(&dir, "global_resource = \"true\"\n");
        let declaration = Declaration::load(&path, Path::new("/repo")).unwrap();
        assert!(!declaration.global_resource_enabled());
    }

    #[test]
    fn tf_cli_args_substitutes_repo_path() {
        let dir = TempDir::new().unwrap();
        let path = write_declaration(
            &dir,
            "tf_cli_args = \"-plugin-dir=${REPO_PATH}/plugins -var-file=$REPO_PATH/globals.tfvars\"\n",
        );
        let declaration = Declaration::load(&path, Path::new("/repo")).unwrap();
        assert_eq!(
            declaration.tf_cli_args.as_deref(),
            Some("-plugin-dir=/repo/plugins -var-file=/repo/globals.tfvars")
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err =
            Declaration::load(&dir.path().join("env_missing.hcl"), Path::new("/repo")).unwrap_err();
        assert!(matches!(err, DeclarationError::Missing { .. }));
    }

    #[test]
    fn invalid_hcl_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_declaration(&dir, "region = = \"us-east-1\"\n");
        let err = Declaration::load(&path, Path::new("/repo")).unwrap_err();
        assert!(matches!(err, DeclarationError::Parse { .. }));
    }
}
