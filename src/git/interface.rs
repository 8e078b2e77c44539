//! git::interface
//!
//! Git interface implementation using git2.
//!
//! # Design
//!
//! The `Git` struct is the only way to interact with a Git repository.
//! It is read-only: TFBuild needs the repository root, the first remote
//! URL, and the active branch name, nothing else. All three feed the
//! naming-convention parser, so the errors here are phrased as layout
//! diagnostics rather than raw libgit2 failures.
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: the working directory is not inside a repository
//! - [`GitError::BareRepo`]: bare repositories have no working directory to
//!   resolve a resource path against
//! - [`GitError::NoRemote`]: the repository name is derived from the first
//!   remote URL, which must exist
//! - [`GitError::UnbornHead`]: no active branch to derive account/environment

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error(
        "not a git repository: {path}\nensure execution from a resource directory inside a git repository"
    )]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Repository has no configured remote.
    #[error("repository has no remote; the repository name is derived from the first remote URL")]
    NoRemote,

    /// HEAD is unborn or detached; no active branch name.
    #[error("no active branch; the account and environment are derived from the branch name")]
    UnbornHead,

    /// Any other libgit2 failure.
    #[error("git error: {0}")]
    Internal(String),
}

/// Read-only Git repository handle.
pub struct Git {
    repo: git2::Repository,
}

impl Git {
    /// Open the repository enclosing `path`.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Absolute path of the repository working directory (the repo root).
    pub fn work_dir(&self) -> Result<PathBuf, GitError> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or(GitError::BareRepo)
    }

    /// URL of the first configured remote.
    ///
    /// Remotes are taken in the order libgit2 lists them; by convention the
    /// first (usually only) remote names the repository.
    pub fn first_remote_url(&self) -> Result<String, GitError> {
        let remotes = self
            .repo
            .remotes()
            .map_err(|e| GitError::Internal(e.to_string()))?;
        let name = remotes.get(0).ok_or(GitError::NoRemote)?;
        let remote = self
            .repo
            .find_remote(name)
            .map_err(|e| GitError::Internal(e.to_string()))?;
        remote
            .url()
            .map(str::to_string)
            .ok_or(GitError::NoRemote)
    }

    /// Name of the active branch (shorthand, e.g. `acct-dev`).
    pub fn current_branch(&self) -> Result<String, GitError> {
        let head = self.repo.head().map_err(|_| GitError::UnbornHead)?;
        if !head.is_branch() {
            return Err(GitError::UnbornHead);
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or(GitError::UnbornHead)
    }
}
