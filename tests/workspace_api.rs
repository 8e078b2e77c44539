//! Workspace provider tests against a mock Terraform Cloud API.
//!
//! These exercise the real HTTP client with wiremock standing in for
//! app.terraform.io, asserting the JSON:API request shapes and the
//! status-code handling.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tfbuild::workspace::{TerraformCloud, WorkspaceError, WorkspaceProvider};

fn workspace_body(id: &str, name: &str) -> serde_json::Value {
    json!({
        "data": {
            "id": id,
            "type": "workspaces",
            "attributes": { "name": name }
        }
    })
}

#[tokio::test]
async fn get_returns_existing_workspace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acct/workspaces/dev-proj-vpc"))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/vnd.api+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workspace_body(
            "ws-123",
            "dev-proj-vpc",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "secret");
    let workspace = provider.get_workspace("dev-proj-vpc").await.unwrap();

    let workspace = workspace.expect("workspace should exist");
    assert_eq!(workspace.id, "ws-123");
    assert_eq!(workspace.name, "dev-proj-vpc");
}

#[tokio::test]
async fn get_maps_404_to_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acct/workspaces/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "secret");
    assert!(provider.get_workspace("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn create_posts_the_json_api_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/acct/workspaces"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "data": {
                "type": "workspaces",
                "attributes": {
                    "name": "dev-proj-vpc",
                    "terraform-version": "1.5.7"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(workspace_body(
            "ws-456",
            "dev-proj-vpc",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "secret");
    let workspace = provider
        .create_workspace("dev-proj-vpc", "1.5.7")
        .await
        .unwrap();
    assert_eq!(workspace.id, "ws-456");
}

#[tokio::test]
async fn ensure_workspace_creates_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acct/workspaces/dev-proj-vpc"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/acct/workspaces"))
        .respond_with(ResponseTemplate::new(201).set_body_json(workspace_body(
            "ws-789",
            "dev-proj-vpc",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "secret");
    let workspace = provider
        .ensure_workspace("dev-proj-vpc", "1.5.7")
        .await
        .unwrap();
    assert_eq!(workspace.id, "ws-789");
}

#[tokio::test]
async fn ensure_workspace_skips_create_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acct/workspaces/dev-proj-vpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workspace_body(
            "ws-123",
            "dev-proj-vpc",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/acct/workspaces"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "secret");
    let workspace = provider
        .ensure_workspace("dev-proj-vpc", "1.5.7")
        .await
        .unwrap();
    assert_eq!(workspace.id, "ws-123");
}

#[tokio::test]
async fn unauthorized_is_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/acct/workspaces/dev-proj-vpc"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "bad-token");
    let err = provider.get_workspace("dev-proj-vpc").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::AuthFailed(_)));
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/acct/workspaces"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let provider = TerraformCloud::with_api_base(server.uri(), "acct", "secret");
    let err = provider
        .create_workspace("dev-proj-vpc", "1.5.7")
        .await
        .unwrap_err();
    match err {
        WorkspaceError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
