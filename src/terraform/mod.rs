//! terraform
//!
//! Action dispatch: the Terraform CLI invocations driven by a resolved
//! [`crate::core::DeploymentContext`].
//!
//! # Modules
//!
//! - [`dispatch`] - The action table and per-cloud `terraform init`
//! - [`probes`] - Git/Terraform version probes and the `test` report
//! - [`taint`] - The interactive resource-tainting flow
//!
//! # Design
//!
//! The dispatcher is a thin consumer: every value it passes to Terraform
//! was computed during resolution. The one remote side effect (ensuring a
//! Terraform Cloud workspace) is idempotent and guarded by existence
//! checks, performed before `terraform init` on the workspace backend path.

pub mod dispatch;
pub mod probes;
pub mod taint;

pub use dispatch::{Action, Dispatcher, UnknownActionError};
