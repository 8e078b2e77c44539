//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. Repository discovery and
//! reads flow through this interface; no other module imports `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery from a working directory
//! - Repository root resolution
//! - First remote URL and active branch lookup
//!
//! # Invariants
//!
//! - All operations are read-only; TFBuild never mutates the repository
//! - Errors are normalized into typed [`GitError`] variants so the CLI can
//!   turn them into user-facing diagnostics

mod interface;

pub use interface::{Git, GitError};
