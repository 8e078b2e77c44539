//! TFBuild - a command line wrapper for Terraform
//!
//! TFBuild resolves the Terraform backend configuration (state bucket or
//! container, state key, backend region) and invocation variables
//! (`-var-file` list, `TF_VAR_*` environment) from repository and branch
//! naming conventions, then dispatches the requested Terraform action as a
//! subprocess.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the dispatcher)
//! - [`core`] - The configuration resolution engine that builds a [`core::DeploymentContext`]
//! - [`git`] - Single interface for all Git operations
//! - [`terraform`] - Action dispatch: per-cloud `terraform init` and the action table
//! - [`workspace`] - Abstraction for the Terraform Cloud workspace API
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! 1. The deployment context is resolved fully, in one pass, before any
//!    Terraform process is spawned
//! 2. Resolution is a function of explicit inputs (working directory,
//!    environment snapshot, repository state); nothing mutates the context
//!    after construction
//! 3. Every layout violation aborts with a diagnostic before Terraform runs

pub mod cli;
pub mod core;
pub mod git;
pub mod terraform;
pub mod ui;
pub mod workspace;
