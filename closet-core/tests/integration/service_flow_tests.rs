//! `CredentialService` driving the real HTTP client against a mock server

use closet_core::api::HttpVaultApi;
use closet_core::config::ClientSettings;
use closet_core::error::{ApiError, ClosetError};
use closet_core::inheritance::{NewCredential, NewGroup};
use closet_core::service::CredentialService;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Ids {
    workspace: Uuid,
    email_type: Uuid,
    root: Uuid,
    child: Uuid,
    a: Uuid,
    b: Uuid,
    c: Uuid,
}

fn envelope(payload: serde_json::Value) -> serde_json::Value {
    json!({ "responseType": "SUCCESS", "payload": payload })
}

/// Email (type email) > Personal holding A, B, C
async fn mount_workspace(server: &MockServer) -> Ids {
    let ids = Ids {
        workspace: Uuid::new_v4(),
        email_type: Uuid::new_v4(),
        root: Uuid::new_v4(),
        child: Uuid::new_v4(),
        a: Uuid::new_v4(),
        b: Uuid::new_v4(),
        c: Uuid::new_v4(),
    };

    Mock::given(method("GET"))
        .and(path("/credential-group"))
        .and(header("workspace-id", ids.workspace.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {
                "id": ids.root, "name": "Email", "credentialGroupTypeId": ids.email_type,
                "children": [
                    { "id": ids.child, "name": "Personal", "credentialGroupId": ids.root,
                      "credentialCount": 3, "totalCredentialCount": 3 }
                ]
            }
        ]))))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/credential-group-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "items": [
                { "id": ids.email_type, "name": "email", "isActive": true },
                { "id": Uuid::new_v4(), "name": "server", "isActive": false }
            ]
        }))))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/credential/parameter-list/{}", ids.email_type)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "items": [
                { "id": Uuid::new_v4(), "name": "username", "credentialGroupTypeId": ids.email_type },
                { "id": Uuid::new_v4(), "name": "password", "credentialGroupTypeId": ids.email_type },
                { "id": Uuid::new_v4(), "name": "index", "credentialGroupTypeId": ids.email_type }
            ]
        }))))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/credential/group/{}", ids.child)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "items": [
                { "id": ids.c, "name": "C", "parameters": { "index": "2" } },
                { "id": ids.a, "name": "A", "parameters": { "index": "0" } },
                { "id": ids.b, "name": "B", "parameters": { "index": "1" } }
            ]
        }))))
        .mount(server)
        .await;

    ids
}

fn service(server: &MockServer, workspace: Uuid) -> CredentialService<HttpVaultApi> {
    let settings = ClientSettings::default()
        .with_api_url(server.uri())
        .with_token("t0ken")
        .with_workspace(workspace);
    CredentialService::new(HttpVaultApi::new(&settings).unwrap(), Some(workspace))
}

#[tokio::test]
async fn test_subgroup_creation_sends_root_type() {
    let server = MockServer::start().await;
    let ids = mount_workspace(&server).await;

    Mock::given(method("POST"))
        .and(path("/credential-group"))
        .and(body_json(json!({
            "name": "Work",
            "credentialGroupTypeName": "email",
            "credentialGroupId": ids.child,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": Uuid::new_v4(), "name": "Work", "credentialGroupId": ids.child
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server, ids.workspace);
    let created = service
        .create_group(&NewGroup::child(" Work ", ids.child))
        .await
        .unwrap();
    assert_eq!(created.name, "Work");
}

#[tokio::test]
async fn test_reorder_round_trip() {
    let server = MockServer::start().await;
    let ids = mount_workspace(&server).await;

    Mock::given(method("PATCH"))
        .and(path(format!("/credential/group/{}/order", ids.child)))
        .and(body_json(json!({
            "credentials": [
                { "credentialId": ids.b, "index": 0 },
                { "credentialId": ids.c, "index": 1 },
                { "credentialId": ids.a, "index": 2 },
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server, ids.workspace);
    assert!(service.select_group(ids.child).await.unwrap());
    assert_eq!(service.session().selection().breadcrumb(), "Email / Personal");

    let loaded = service.load_credentials(ids.child).await.unwrap();
    let names: Vec<&str> = loaded.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);

    assert!(service.reorder_credentials(ids.child, 0, 2).await.unwrap());
    let displayed: Vec<&str> = service
        .displayed_credentials(ids.child)
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(displayed, ["B", "C", "A"]);
}

#[tokio::test]
async fn test_failed_reorder_restores_order() {
    let server = MockServer::start().await;
    let ids = mount_workspace(&server).await;

    Mock::given(method("PATCH"))
        .and(path(format!("/credential/group/{}/order", ids.child)))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let mut service = service(&server, ids.workspace);
    service.select_group(ids.child).await.unwrap();
    service.load_credentials(ids.child).await.unwrap();

    let err = service.reorder_credentials(ids.child, 2, 0).await.unwrap_err();
    assert!(matches!(
        err,
        ClosetError::Api(ApiError::Status { status: 500, .. })
    ));
    let displayed: Vec<Uuid> = service
        .displayed_credentials(ids.child)
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(displayed, [ids.a, ids.b, ids.c]);
}

#[tokio::test]
async fn test_create_credential_appends() {
    let server = MockServer::start().await;
    let ids = mount_workspace(&server).await;

    Mock::given(method("POST"))
        .and(path("/credential"))
        .and(body_json(json!({
            "credentialGroupId": ids.child,
            "name": "D",
            "parameters": { "index": "3", "password": "pw", "username": "me" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": Uuid::new_v4(), "name": "D", "credentialGroupId": ids.child,
            "parameters": { "index": 3, "username": "me", "password": "pw" }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server, ids.workspace);
    let input = NewCredential::new(ids.child, "D")
        .with_parameter("username", "me")
        .with_parameter("password", "pw");
    let created = service.create_credential(&input).await.unwrap();
    assert_eq!(created.index(), Some(3));
}

#[tokio::test]
async fn test_delete_group_clears_selection() {
    let server = MockServer::start().await;
    let ids = mount_workspace(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/credential-group/{}", ids.root)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = service(&server, ids.workspace);
    service.select_group(ids.child).await.unwrap();

    let impact = service.delete_impact(ids.root).await.unwrap();
    assert_eq!(impact.sub_groups, 1);

    let removed = service.delete_group(ids.root).await.unwrap();
    assert_eq!(removed, vec![ids.root, ids.child]);
    assert!(service.session().selection().selected_id().is_none());
}
