//! workspace::cloud
//!
//! Terraform Cloud workspace provider (API v2).
//!
//! # Authentication
//!
//! Bearer token resolution order:
//! 1. `TFC_TOKEN`
//! 2. `TF_TOKEN_app_terraform_io` (Terraform's own convention)
//! 3. `~/.terraform.d/credentials.tfrc.json` (written by `terraform login`)
//!
//! # Endpoints
//!
//! - `GET /api/v2/organizations/<org>/workspaces/<name>` - lookup (404 = absent)
//! - `POST /api/v2/organizations/<org>/workspaces` - create

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::traits::{Workspace, WorkspaceError, WorkspaceProvider};
use crate::core::EnvSnapshot;

/// Default Terraform Cloud API base URL.
const DEFAULT_API_BASE: &str = "https://app.terraform.io";

/// JSON:API content type required by the workspace endpoints.
const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Terraform Cloud workspace provider.
pub struct TerraformCloud {
    client: Client,
    api_base: String,
    organization: String,
    token: String,
}

impl TerraformCloud {
    /// Create a provider for `organization` authenticated by `token`.
    pub fn new(organization: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            organization: organization.into(),
            token: token.into(),
        }
    }

    /// Create a provider against a custom API base URL (used by tests).
    pub fn with_api_base(
        api_base: impl Into<String>,
        organization: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            organization: organization.into(),
            token: token.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, WorkspaceError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| WorkspaceError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(JSON_API_CONTENT_TYPE),
        );
        Ok(headers)
    }

    fn workspaces_url(&self) -> String {
        format!(
            "{}/api/v2/organizations/{}/workspaces",
            self.api_base, self.organization
        )
    }

    async fn parse_workspace(&self, response: Response) -> Result<Workspace, WorkspaceError> {
        let document: WorkspaceDocument = response
            .json()
            .await
            .map_err(|e| WorkspaceError::InvalidResponse(e.to_string()))?;
        Ok(Workspace {
            id: document.data.id,
            name: document.data.attributes.name,
        })
    }

    async fn error_for(&self, response: Response) -> WorkspaceError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WorkspaceError::AuthFailed(format!(
                "Terraform Cloud rejected the token ({})",
                status
            )),
            _ => WorkspaceError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl WorkspaceProvider for TerraformCloud {
    async fn get_workspace(&self, name: &str) -> Result<Option<Workspace>, WorkspaceError> {
        let url = format!("{}/{}", self.workspaces_url(), name);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| WorkspaceError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(self.parse_workspace(response).await?)),
            _ => Err(self.error_for(response).await),
        }
    }

    async fn create_workspace(
        &self,
        name: &str,
        terraform_version: &str,
    ) -> Result<Workspace, WorkspaceError> {
        let payload = json!({
            "data": {
                "type": "workspaces",
                "attributes": {
                    "name": name,
                    "terraform-version": terraform_version,
                }
            }
        });

        let response = self
            .client
            .post(self.workspaces_url())
            .headers(self.headers()?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WorkspaceError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            self.parse_workspace(response).await
        } else {
            Err(self.error_for(response).await)
        }
    }
}

/// JSON:API response document for a single workspace.
#[derive(Debug, Deserialize)]
struct WorkspaceDocument {
    data: WorkspaceData,
}

#[derive(Debug, Deserialize)]
struct WorkspaceData {
    id: String,
    attributes: WorkspaceAttributes,
}

#[derive(Debug, Deserialize)]
struct WorkspaceAttributes {
    name: String,
}

/// Resolve the Terraform Cloud API token.
pub fn resolve_token(env: &EnvSnapshot) -> Result<String, WorkspaceError> {
    if let Some(token) = env.get("TFC_TOKEN") {
        return Ok(token.to_string());
    }
    if let Some(token) = env.get("TF_TOKEN_app_terraform_io") {
        return Ok(token.to_string());
    }
    if let Some(token) = credentials_file_token() {
        return Ok(token);
    }
    Err(WorkspaceError::AuthRequired)
}

/// Token from the Terraform CLI credentials file, if readable.
fn credentials_file_token() -> Option<String> {
    let path = credentials_file_path()?;
    let contents = fs::read_to_string(path).ok()?;
    let document: serde_json::Value = serde_json::from_str(&contents).ok()?;
    document
        .get("credentials")?
        .get("app.terraform.io")?
        .get("token")?
        .as_str()
        .map(str::to_string)
}

fn credentials_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".terraform.d").join("credentials.tfrc.json"))
}
