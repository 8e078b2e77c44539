//! core
//!
//! The configuration resolution engine.
//!
//! # Modules
//!
//! - [`naming`] - Repository/branch naming convention parser
//! - [`envfiles`] - Three-tier environment file path computation
//! - [`declaration`] - Declaration file (HCL) reader and typed flags
//! - [`sanity`] - Preflight layout checks and `-var-file` list assembly
//! - [`backend`] - The per-cloud backend decision table
//! - [`environment`] - Exported process-environment overrides
//! - [`config`] - User-scope configuration (bucket prefix, TFC organization)
//! - [`context`] - The immutable [`DeploymentContext`] and the resolution pipeline
//!
//! # Design
//!
//! Resolution is a pipeline of small steps, each a function of explicit
//! inputs. Filesystem and VCS reads happen in `context::resolve`; everything
//! downstream of those reads is pure string construction, which is what
//! makes the decision table unit-testable without a repository.

pub mod backend;
pub mod config;
pub mod context;
pub mod declaration;
pub mod environment;
pub mod envfiles;
pub mod naming;
pub mod sanity;

pub use context::{DeploymentContext, EnvSnapshot, ResolveError, ResolveRequest};
pub use naming::Cloud;
