//! core::naming
//!
//! Repository and branch naming convention parser.
//!
//! # Convention
//!
//! Repository names are `<cloud>-<project>[-...]` and branch names are
//! `<account>-<environment>[-...]` for the known clouds. A repository whose
//! first segment is not a known cloud is treated as cloud-agnostic: the
//! first segment becomes the project, the account is fixed to `"none"`, and
//! the whole branch name is the environment.
//!
//! # Errors
//!
//! For known clouds a missing second segment (in either name) violates the
//! convention and is a clean fatal [`NamingError`] rather than a panic.

use std::fmt;

use thiserror::Error;

/// Clouds with a dedicated naming rule.
pub const KNOWN_CLOUDS: [&str; 4] = ["aws", "azr", "vmw", "gcp"];

/// Errors from naming convention parsing.
#[derive(Debug, Error)]
pub enum NamingError {
    /// Repository name lacks the `<cloud>-<project>` shape.
    #[error(
        "repository name '{name}' does not follow the <cloud>-<project> naming convention"
    )]
    RepoName { name: String },

    /// Branch name lacks the `<account>-<environment>` shape.
    #[error(
        "branch name '{name}' does not follow the <account>-<environment> naming convention"
    )]
    BranchName { name: String },
}

/// Target cloud, derived from the first repository name segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cloud {
    Aws,
    Azr,
    Vmw,
    Gcp,
    /// Any other first segment; cloud-agnostic naming rules apply.
    Other(String),
}

impl Cloud {
    /// Parse a repository name segment into a cloud.
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "aws" => Cloud::Aws,
            "azr" => Cloud::Azr,
            "vmw" => Cloud::Vmw,
            "gcp" => Cloud::Gcp,
            other => Cloud::Other(other.to_string()),
        }
    }

    /// Whether this cloud has a dedicated naming rule.
    pub fn is_known(&self) -> bool {
        !matches!(self, Cloud::Other(_))
    }

    /// The cloud token as it appears in the repository name.
    pub fn as_str(&self) -> &str {
        match self {
            Cloud::Aws => "aws",
            Cloud::Azr => "azr",
            Cloud::Vmw => "vmw",
            Cloud::Gcp => "gcp",
            Cloud::Other(s) => s,
        }
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of naming convention parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingParts {
    pub cloud: Cloud,
    pub project: String,
    pub account: String,
    pub environment: String,
}

/// Decompose repository and branch names into deployment coordinates.
///
/// For known clouds the second `-`-delimited segment of each name is taken
/// verbatim; trailing segments are ignored (`acct-dev-wip` yields
/// environment `dev`).
pub fn parse(repo_name: &str, branch_name: &str) -> Result<NamingParts, NamingError> {
    let mut repo_segments = repo_name.split('-');
    let cloud = Cloud::from_segment(repo_segments.next().unwrap_or(repo_name));

    if cloud.is_known() {
        let project = repo_segments.next().ok_or_else(|| NamingError::RepoName {
            name: repo_name.to_string(),
        })?;
        let mut branch_segments = branch_name.split('-');
        let account = branch_segments.next().unwrap_or(branch_name);
        let environment = branch_segments
            .next()
            .ok_or_else(|| NamingError::BranchName {
                name: branch_name.to_string(),
            })?;
        Ok(NamingParts {
            cloud,
            project: project.to_string(),
            account: account.to_string(),
            environment: environment.to_string(),
        })
    } else {
        let project = cloud.as_str().to_string();
        Ok(NamingParts {
            cloud,
            project,
            account: "none".to_string(),
            environment: branch_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cloud_splits_both_names() {
        let parts = parse("aws-billing", "acct-dev").unwrap();
        assert_eq!(parts.cloud, Cloud::Aws);
        assert_eq!(parts.project, "billing");
        assert_eq!(parts.account, "acct");
        assert_eq!(parts.environment, "dev");
    }

    #[test]
    fn trailing_segments_are_ignored() {
        let parts = parse("azr-net-core", "acct-prod-wip").unwrap();
        assert_eq!(parts.project, "net");
        assert_eq!(parts.environment, "prod");
    }

    #[test]
    fn unknown_cloud_keeps_branch_verbatim() {
        let parts = parse("tools-scripts", "feature-x").unwrap();
        assert_eq!(parts.cloud, Cloud::Other("tools".to_string()));
        assert_eq!(parts.project, "tools");
        assert_eq!(parts.account, "none");
        assert_eq!(parts.environment, "feature-x");
    }

    #[test]
    fn unknown_cloud_without_dash() {
        let parts = parse("sandbox", "main").unwrap();
        assert_eq!(parts.project, "sandbox");
        assert_eq!(parts.account, "none");
        assert_eq!(parts.environment, "main");
    }

    #[test]
    fn known_cloud_repo_without_project_fails() {
        let err = parse("aws", "acct-dev").unwrap_err();
        assert!(matches!(err, NamingError::RepoName { .. }));
    }

    #[test]
    fn known_cloud_branch_without_environment_fails() {
        let err = parse("gcp-data", "main").unwrap_err();
        assert!(matches!(err, NamingError::BranchName { .. }));
    }
}
