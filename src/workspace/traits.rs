//! workspace::traits
//!
//! Workspace provider trait definition.
//!
//! # Design
//!
//! The trait is async because the production provider performs network I/O.
//! The dispatcher runs it to completion on a local runtime before
//! `terraform init` starts, so no async surface leaks past this module.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from workspace operations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceError {
    /// No API token could be resolved.
    #[error(
        "no Terraform Cloud token found; set TFC_TOKEN, TF_TOKEN_app_terraform_io, or run 'terraform login'"
    )]
    AuthRequired,

    /// Authentication failed (invalid or expired token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// API returned an error.
    #[error("workspace API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response body did not match the expected shape.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

/// Workspace record returned from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Provider-assigned workspace ID.
    pub id: String,
    /// Workspace name.
    pub name: String,
}

/// Remote workspace service.
#[async_trait]
pub trait WorkspaceProvider {
    /// Look up a workspace by name; `Ok(None)` when it does not exist.
    async fn get_workspace(&self, name: &str) -> Result<Option<Workspace>, WorkspaceError>;

    /// Create a workspace pinned to the given Terraform version.
    async fn create_workspace(
        &self,
        name: &str,
        terraform_version: &str,
    ) -> Result<Workspace, WorkspaceError>;

    /// Ensure a workspace exists, creating it if absent.
    async fn ensure_workspace(
        &self,
        name: &str,
        terraform_version: &str,
    ) -> Result<Workspace, WorkspaceError> {
        match self.get_workspace(name).await? {
            Some(workspace) => Ok(workspace),
            None => self.create_workspace(name, terraform_version).await,
        }
    }
}
