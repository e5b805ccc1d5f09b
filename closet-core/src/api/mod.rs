//! REST API access
//!
//! [`VaultApi`] is the seam between the service and the network. The
//! production implementation is [`HttpVaultApi`]; tests substitute an
//! in-memory fake.

mod client;
pub mod envelope;

pub use client::HttpVaultApi;
pub use envelope::{ListPayload, ResponseEnvelope};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{
    CreateCredentialRequest, CreateGroupRequest, CreateWorkspaceRequest, Credential,
    CredentialGroup, GroupType, ParameterDefinition, UpdateCredentialRequest, UpdateGroupRequest,
    UpdateOrderRequest, UpdateWorkspaceRequest, Workspace,
};

/// Typed calls against the credential REST API
///
/// Deletes are idempotent: deleting something that is already gone
/// succeeds.
#[async_trait]
pub trait VaultApi: Send + Sync {
    /// `GET /credential-group`: the workspace's group forest
    async fn list_groups(&self) -> ApiResult<Vec<CredentialGroup>>;

    /// `POST /credential-group`
    async fn create_group(&self, request: &CreateGroupRequest) -> ApiResult<CredentialGroup>;

    /// `PATCH /credential-group/{id}`
    async fn update_group(
        &self,
        id: Uuid,
        request: &UpdateGroupRequest,
    ) -> ApiResult<CredentialGroup>;

    /// `DELETE /credential-group/{id}`, cascading to sub-groups and
    /// credentials
    async fn delete_group(&self, id: Uuid) -> ApiResult<()>;

    /// `GET /credential/group/{groupId}`
    async fn list_credentials(&self, group_id: Uuid) -> ApiResult<Vec<Credential>>;

    /// `POST /credential`
    async fn create_credential(&self, request: &CreateCredentialRequest)
    -> ApiResult<Credential>;

    /// `PATCH /credential/{id}`
    async fn update_credential(
        &self,
        id: Uuid,
        request: &UpdateCredentialRequest,
    ) -> ApiResult<Credential>;

    /// `DELETE /credential/{id}`
    async fn delete_credential(&self, id: Uuid) -> ApiResult<()>;

    /// `PATCH /credential/group/{groupId}/order` with the full order
    async fn update_order(&self, group_id: Uuid, request: &UpdateOrderRequest) -> ApiResult<()>;

    /// `GET /credential-group-type`
    async fn list_group_types(&self) -> ApiResult<Vec<GroupType>>;

    /// `GET /credential/parameter-list/{typeId}`
    async fn list_parameters(&self, type_id: Uuid) -> ApiResult<Vec<ParameterDefinition>>;

    /// `GET /workspace`
    async fn list_workspaces(&self) -> ApiResult<Vec<Workspace>>;

    /// `POST /workspace`
    async fn create_workspace(&self, request: &CreateWorkspaceRequest) -> ApiResult<Workspace>;

    /// `PATCH /workspace/{id}`
    async fn update_workspace(
        &self,
        id: Uuid,
        request: &UpdateWorkspaceRequest,
    ) -> ApiResult<Workspace>;

    /// `DELETE /workspace/{id}`
    async fn delete_workspace(&self, id: Uuid) -> ApiResult<()>;

    /// `PATCH /workspace/{id}/set-default` (no body)
    async fn set_default_workspace(&self, id: Uuid) -> ApiResult<()>;

    /// Scopes subsequent requests to another workspace
    fn set_workspace(&mut self, workspace_id: Option<Uuid>);
}
