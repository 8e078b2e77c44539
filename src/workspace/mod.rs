//! workspace
//!
//! Abstraction for the Terraform Cloud workspace API.
//!
//! # Architecture
//!
//! The dispatcher talks to the remote workspace service only through the
//! [`WorkspaceProvider`] trait. The production implementation
//! ([`TerraformCloud`]) drives the Terraform Cloud API v2 over HTTPS; tests
//! use the in-memory [`mock::MockWorkspaceProvider`].
//!
//! The only operation the dispatcher needs is idempotent: ensure a
//! workspace with a given name exists, creating it if absent.

pub mod cloud;
pub mod mock;
mod traits;

pub use cloud::{resolve_token, TerraformCloud};
pub use traits::{Workspace, WorkspaceError, WorkspaceProvider};
