//! `HttpVaultApi` against a mock server
//!
//! Verifies headers, envelope decoding, status mapping and the request
//! bodies the server receives.

use closet_core::api::{HttpVaultApi, VaultApi};
use closet_core::config::ClientSettings;
use closet_core::error::ApiError;
use closet_core::models::{
    CreateGroupRequest, CreateWorkspaceRequest, CredentialOrderEntry, UpdateCredentialRequest,
    UpdateOrderRequest, UpdateWorkspaceRequest,
};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP_ID: &str = "6a1c1c9e-0d4e-4a55-9a43-4a3f0c1e2b10";
const CHILD_ID: &str = "0c7f2f54-5b1d-4e1a-9d6e-7b2a7c9f4e21";
const TYPE_ID: &str = "0b9b5f6e-4d2a-4f0a-8d37-3a5c2b1e9f00";

fn envelope(payload: serde_json::Value) -> serde_json::Value {
    json!({
        "responseType": "SUCCESS",
        "path": "/test",
        "timestamp": "2025-01-10T12:00:00Z",
        "payload": payload,
    })
}

fn client(server: &MockServer, workspace: Option<Uuid>) -> HttpVaultApi {
    let mut settings = ClientSettings::default()
        .with_api_url(server.uri())
        .with_token("t0ken");
    settings.workspace_id = workspace;
    HttpVaultApi::new(&settings).unwrap()
}

#[tokio::test]
async fn test_list_groups_sends_auth_and_workspace() {
    let server = MockServer::start().await;
    let workspace = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/credential-group"))
        .and(bearer_token("t0ken"))
        .and(header("workspace-id", workspace.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {
                "id": GROUP_ID,
                "name": "Email",
                "credentialGroupTypeId": TYPE_ID,
                "credentialGroupId": null,
                "credentialCount": 0,
                "totalCredentialCount": 2,
                "children": [
                    { "id": CHILD_ID, "name": "Personal", "credentialGroupId": GROUP_ID,
                      "credentialCount": 2, "totalCredentialCount": 2, "children": null }
                ]
            }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client(&server, Some(workspace)).list_groups().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Email");
    assert_eq!(groups[0].total_credential_count, 2);
    assert_eq!(groups[0].children[0].name, "Personal");
    assert!(groups[0].children[0].children.is_empty());
}

#[tokio::test]
async fn test_list_credentials_items_payload() {
    let server = MockServer::start().await;
    let group_id = Uuid::parse_str(CHILD_ID).unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/credential/group/{group_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "items": [
                { "id": Uuid::new_v4(), "name": "B", "credentialGroupId": group_id,
                  "parameters": { "index": 1, "username": "bob" } },
                { "id": Uuid::new_v4(), "name": "A", "credentialGroupId": group_id,
                  "parameters": { "index": "0" } }
            ]
        }))))
        .mount(&server)
        .await;

    let credentials = client(&server, None)
        .list_credentials(group_id)
        .await
        .unwrap();
    assert_eq!(credentials.len(), 2);
    assert_eq!(credentials[0].index(), Some(1));
    assert_eq!(credentials[1].index(), Some(0));
    assert_eq!(credentials[0].parameters["username"], "bob");
}

#[tokio::test]
async fn test_create_group_body() {
    let server = MockServer::start().await;
    let parent = Uuid::parse_str(GROUP_ID).unwrap();

    Mock::given(method("POST"))
        .and(path("/credential-group"))
        .and(body_json(json!({
            "name": "Work",
            "credentialGroupTypeName": "email",
            "credentialGroupId": GROUP_ID,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": CHILD_ID,
            "name": "Work",
            "credentialGroupId": GROUP_ID,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateGroupRequest {
        name: "Work".to_string(),
        credential_group_type_name: "email".to_string(),
        parent_id: Some(parent),
    };
    let created = client(&server, None).create_group(&request).await.unwrap();
    assert_eq!(created.parent_id, Some(parent));
}

#[tokio::test]
async fn test_update_order_body() {
    let server = MockServer::start().await;
    let group_id = Uuid::new_v4();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("PATCH"))
        .and(path(format!("/credential/group/{group_id}/order")))
        .and(body_json(json!({
            "credentials": [
                { "credentialId": b, "index": 0 },
                { "credentialId": a, "index": 1 },
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdateOrderRequest {
        credentials: vec![
            CredentialOrderEntry {
                credential_id: b,
                index: 0,
            },
            CredentialOrderEntry {
                credential_id: a,
                index: 1,
            },
        ],
    };
    client(&server, None)
        .update_order(group_id, &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_is_success() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/credential-group/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Group not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, None).delete_group(id).await.is_ok());
}

#[tokio::test]
async fn test_update_credential_body() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    let group_id = Uuid::parse_str(CHILD_ID).unwrap();

    Mock::given(method("PATCH"))
        .and(path(format!("/credential/{id}")))
        .and(body_json(json!({
            "name": "Gmail",
            "parameters": { "index": "1", "password": "n3w" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": id,
            "name": "Gmail",
            "credentialGroupId": group_id,
            "isActive": true,
            "parameters": { "index": 1, "password": "n3w" },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdateCredentialRequest {
        name: Some("Gmail".to_string()),
        is_active: None,
        parameters: Some(
            [("index", "1"), ("password", "n3w")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
    };
    let updated = client(&server, None)
        .update_credential(id, &request)
        .await
        .unwrap();
    assert_eq!(updated.index(), Some(1));
    assert_eq!(updated.group_id, Some(group_id));
}

#[tokio::test]
async fn test_workspace_create_and_rename_bodies() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/workspace"))
        .and(body_json(json!({ "name": "Team" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": id,
            "name": "Team",
            "isActive": true,
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/workspace/{id}")))
        .and(body_json(json!({ "name": "Ops" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": id,
            "name": "Ops",
            "isActive": true,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, None);
    let created = api
        .create_workspace(&CreateWorkspaceRequest {
            name: "Team".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, id);
    let renamed = api
        .update_workspace(id, &UpdateWorkspaceRequest::rename("Ops"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ops");
}

#[tokio::test]
async fn test_set_default_workspace_path() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path(format!("/workspace/{id}/set-default")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": id,
            "name": "Team",
            "isDefault": true,
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/workspace/{id}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, None);
    api.set_default_workspace(id).await.unwrap();
    assert!(api.delete_workspace(id).await.is_ok());
}

#[tokio::test]
async fn test_status_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workspace"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/credential-group-type"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": ["name must not be empty"]
        })))
        .mount(&server)
        .await;

    let api = client(&server, None);
    assert!(matches!(
        api.list_workspaces().await,
        Err(ApiError::Unauthorized(_))
    ));
    match api.list_group_types().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "name must not be empty");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workspace"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server, None).list_workspaces().await,
        Err(ApiError::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let settings = ClientSettings::default().with_api_url("http://127.0.0.1:9");
    let api = HttpVaultApi::new(&settings).unwrap();
    assert!(matches!(
        api.list_groups().await,
        Err(ApiError::Network(_) | ApiError::Timeout)
    ));
}
