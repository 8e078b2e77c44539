//! workspace::mock
//!
//! Mock workspace provider for deterministic testing.
//!
//! # Design
//!
//! Stores workspaces in memory and records every operation, so tests can
//! assert both the outcome and the call sequence. Failure scenarios are
//! configured per method.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{Workspace, WorkspaceError, WorkspaceProvider};

/// Mock workspace provider.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockWorkspaceProvider {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    workspaces: HashMap<String, Workspace>,
    next_id: u64,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get_workspace with the given error.
    Get(WorkspaceError),
    /// Fail create_workspace with the given error.
    Create(WorkspaceError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Get { name: String },
    Create { name: String, terraform_version: String },
}

impl MockWorkspaceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a workspace.
    pub fn add_workspace(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let workspace = Workspace {
            id: format!("ws-{}", inner.next_id),
            name: name.to_string(),
        };
        inner.workspaces.insert(name.to_string(), workspace);
    }

    /// Configure a failure scenario.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Whether a workspace with `name` exists.
    pub fn has_workspace(&self, name: &str) -> bool {
        self.inner.lock().unwrap().workspaces.contains_key(name)
    }
}

#[async_trait]
impl WorkspaceProvider for MockWorkspaceProvider {
    async fn get_workspace(&self, name: &str) -> Result<Option<Workspace>, WorkspaceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Get {
            name: name.to_string(),
        });
        if let Some(FailOn::Get(error)) = &inner.fail_on {
            return Err(error.clone());
        }
        Ok(inner.workspaces.get(name).cloned())
    }

    async fn create_workspace(
        &self,
        name: &str,
        terraform_version: &str,
    ) -> Result<Workspace, WorkspaceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Create {
            name: name.to_string(),
            terraform_version: terraform_version.to_string(),
        });
        if let Some(FailOn::Create(error)) = &inner.fail_on {
            return Err(error.clone());
        }
        inner.next_id += 1;
        let workspace = Workspace {
            id: format!("ws-{}", inner.next_id),
            name: name.to_string(),
        };
        inner
            .workspaces
            .insert(name.to_string(), workspace.clone());
        Ok(workspace)
    }
}
