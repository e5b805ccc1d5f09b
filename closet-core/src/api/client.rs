//! `reqwest` implementation of [`VaultApi`]

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::VaultApi;
use super::envelope::{decode_list, decode_payload, status_error};
use crate::config::ClientSettings;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateCredentialRequest, CreateGroupRequest, CreateWorkspaceRequest, Credential,
    CredentialGroup, GroupType, ParameterDefinition, UpdateCredentialRequest, UpdateGroupRequest,
    UpdateOrderRequest, UpdateWorkspaceRequest, Workspace,
};

/// Header scoping a request to one workspace
pub const WORKSPACE_HEADER: &str = "workspace-id";

const USER_AGENT: &str = concat!("closet/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the credential REST API
///
/// Every request carries the bearer token and the `workspace-id` header
/// when they are configured. There are no automatic retries.
#[derive(Debug, Clone)]
pub struct HttpVaultApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
    workspace_id: Option<Uuid>,
}

impl HttpVaultApi {
    /// Builds a client from settings
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for a malformed API URL, or
    /// [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> ApiResult<Self> {
        settings
            .validate()
            .map_err(|_| ApiError::InvalidUrl(settings.api_url.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            workspace_id: settings.workspace_id,
        })
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Workspace sent with each request
    #[must_use]
    pub const fn workspace_id(&self) -> Option<Uuid> {
        self.workspace_id
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(workspace_id) = self.workspace_id {
            builder = builder.header(WORKSPACE_HEADER, workspace_id.to_string());
        }
        builder
    }

    /// Sends a request and returns the body of a successful response
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            tracing::debug!(status = status.as_u16(), "API returned an error status");
            Err(status_error(status.as_u16(), &body))
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let body = self.execute(self.request(Method::GET, path)).await?;
        decode_list(&body)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.request(method, path).json(payload))
            .await?;
        decode_payload(&body)
    }

    /// DELETE that treats "already gone" as success
    async fn delete_idempotent(&self, path: &str) -> ApiResult<()> {
        match self.execute(self.request(Method::DELETE, path)).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(path, "Delete target already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl VaultApi for HttpVaultApi {
    async fn list_groups(&self) -> ApiResult<Vec<CredentialGroup>> {
        self.get_list("/credential-group").await
    }

    async fn create_group(&self, request: &CreateGroupRequest) -> ApiResult<CredentialGroup> {
        self.send_json(Method::POST, "/credential-group", request)
            .await
    }

    async fn update_group(
        &self,
        id: Uuid,
        request: &UpdateGroupRequest,
    ) -> ApiResult<CredentialGroup> {
        self.send_json(Method::PATCH, &format!("/credential-group/{id}"), request)
            .await
    }

    async fn delete_group(&self, id: Uuid) -> ApiResult<()> {
        self.delete_idempotent(&format!("/credential-group/{id}"))
            .await
    }

    async fn list_credentials(&self, group_id: Uuid) -> ApiResult<Vec<Credential>> {
        self.get_list(&format!("/credential/group/{group_id}")).await
    }

    async fn create_credential(
        &self,
        request: &CreateCredentialRequest,
    ) -> ApiResult<Credential> {
        self.send_json(Method::POST, "/credential", request).await
    }

    async fn update_credential(
        &self,
        id: Uuid,
        request: &UpdateCredentialRequest,
    ) -> ApiResult<Credential> {
        self.send_json(Method::PATCH, &format!("/credential/{id}"), request)
            .await
    }

    async fn delete_credential(&self, id: Uuid) -> ApiResult<()> {
        self.delete_idempotent(&format!("/credential/{id}")).await
    }

    async fn update_order(&self, group_id: Uuid, request: &UpdateOrderRequest) -> ApiResult<()> {
        let builder = self
            .request(Method::PATCH, &format!("/credential/group/{group_id}/order"))
            .json(request);
        self.execute(builder).await.map(|_| ())
    }

    async fn list_group_types(&self) -> ApiResult<Vec<GroupType>> {
        self.get_list("/credential-group-type").await
    }

    async fn list_parameters(&self, type_id: Uuid) -> ApiResult<Vec<ParameterDefinition>> {
        self.get_list(&format!("/credential/parameter-list/{type_id}"))
            .await
    }

    async fn list_workspaces(&self) -> ApiResult<Vec<Workspace>> {
        self.get_list("/workspace").await
    }

    async fn create_workspace(&self, request: &CreateWorkspaceRequest) -> ApiResult<Workspace> {
        self.send_json(Method::POST, "/workspace", request).await
    }

    async fn update_workspace(
        &self,
        id: Uuid,
        request: &UpdateWorkspaceRequest,
    ) -> ApiResult<Workspace> {
        self.send_json(Method::PATCH, &format!("/workspace/{id}"), request)
            .await
    }

    async fn delete_workspace(&self, id: Uuid) -> ApiResult<()> {
        self.delete_idempotent(&format!("/workspace/{id}")).await
    }

    async fn set_default_workspace(&self, id: Uuid) -> ApiResult<()> {
        let builder = self.request(Method::PATCH, &format!("/workspace/{id}/set-default"));
        self.execute(builder).await.map(|_| ())
    }

    fn set_workspace(&mut self, workspace_id: Option<Uuid>) {
        self.workspace_id = workspace_id;
    }
}
