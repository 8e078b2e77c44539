//! core::envfiles
//!
//! Three-tier environment file path computation.
//!
//! # Layout
//!
//! - common declaration file: `<repo>/common/environments/env_<suffix>.hcl`
//! - common variable file: `<repo>/common/environments/env_<suffix>_common.tfvars`
//! - local variable file: `<cwd>/environments/env_<suffix>.tfvars`
//!
//! where `<suffix>` is the environment alone, or `<environment>_<site>` when
//! a target site is selected. Existence is not checked here; that is the
//! sanity validator's job.

use std::path::{Path, PathBuf};

/// The three configuration file paths for one deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFiles {
    /// Common declaration file (`env_<suffix>.hcl`), read for typed flags.
    pub declaration: PathBuf,
    /// Common variable file (`env_<suffix>_common.tfvars`), optional.
    pub common_vars: PathBuf,
    /// Local variable file (`env_<suffix>.tfvars`), required.
    pub local_vars: PathBuf,
}

/// Compute the environment file paths for `environment` and optional `site`.
pub fn locate(
    repo_root: &Path,
    location: &Path,
    environment: &str,
    site: Option<&str>,
) -> EnvFiles {
    let suffix = match site {
        Some(site) => format!("{}_{}", environment, site),
        None => environment.to_string(),
    };

    let common_dir = repo_root.join("common").join("environments");
    EnvFiles {
        declaration: common_dir.join(format!("env_{}.hcl", suffix)),
        common_vars: common_dir.join(format!("env_{}_common.tfvars", suffix)),
        local_vars: location
            .join("environments")
            .join(format!("env_{}.tfvars", suffix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_without_site() {
        let files = locate(Path::new("/repo"), Path::new("/repo/vpc"), "dev", None);
        assert_eq!(
            files.declaration,
            Path::new("/repo/common/environments/env_dev.hcl")
        );
        assert_eq!(
            files.common_vars,
            Path::new("/repo/common/environments/env_dev_common.tfvars")
        );
        assert_eq!(
            files.local_vars,
            Path::new("/repo/vpc/environments/env_dev.tfvars")
        );
    }

    #[test]
    fn site_appends_to_suffix() {
        let files = locate(Path::new("/repo"), Path::new("/repo/vpc"), "dev", Some("dr"));
        assert_eq!(
            files.declaration,
            Path::new("/repo/common/environments/env_dev_dr.hcl")
        );
        assert_eq!(
            files.common_vars,
            Path::new("/repo/common/environments/env_dev_dr_common.tfvars")
        );
        assert_eq!(
            files.local_vars,
            Path::new("/repo/vpc/environments/env_dev_dr.tfvars")
        );
    }
}
