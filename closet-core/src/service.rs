//! Orchestration of validation, REST calls and client state
//!
//! [`CredentialService`] is the single owner of the [`Session`] and of the
//! optimistic ordering state. Every mutation validates locally first, then
//! calls the API, then invalidates the cache entries it touched so the next
//! read refetches. A failed reorder rolls the displayed order back to the
//! last order the server accepted.

use std::collections::HashMap;

use tracing::Instrument;
use uuid::Uuid;

use crate::api::VaultApi;
use crate::error::{ClosetError, ClosetResult, OrderError, ValidationError};
use crate::inheritance::{
    CredentialUpdate, GroupTypeCatalog, NewCredential, NewGroup, form_fields, validate_name,
};
use crate::models::{
    CreateWorkspaceRequest, Credential, CredentialGroup, INDEX_PARAMETER, ParameterDefinition,
    UpdateGroupRequest, UpdateOrderRequest, UpdateWorkspaceRequest, Workspace,
};
use crate::ordering::{
    OrderedGroup, PushQueue, is_dense, next_index, order_payload, reindex, sort_by_index,
};
use crate::state::Session;
use crate::tracing::span_names;
use crate::tree::{DeleteImpact, GroupForest, delete_impact, filter_groups, find_group_by_id};

/// Credential workflows for one signed-in user
///
/// Methods take `&mut self` and are meant to be driven from a single task.
pub struct CredentialService<A: VaultApi> {
    api: A,
    session: Session,
    catalog: GroupTypeCatalog,
    catalog_loaded: bool,
    parameters: HashMap<Uuid, Vec<ParameterDefinition>>,
    orders: HashMap<Uuid, OrderedGroup>,
    pushes: PushQueue,
}

impl<A: VaultApi> CredentialService<A> {
    /// Creates a service scoped to `workspace_id`
    pub fn new(mut api: A, workspace_id: Option<Uuid>) -> Self {
        api.set_workspace(workspace_id);
        Self {
            api,
            session: Session::new(workspace_id),
            catalog: GroupTypeCatalog::default(),
            catalog_loaded: false,
            parameters: HashMap::new(),
            orders: HashMap::new(),
            pushes: PushQueue::new(),
        }
    }

    /// The underlying API client
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Current session state
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Last fetched group forest, empty before the first fetch
    pub fn forest(&self) -> &[CredentialGroup] {
        self.session.cache().last_groups().unwrap_or_default()
    }

    /// Refetches the group forest
    ///
    /// The response is checked for duplicate ids and parent cycles before it
    /// replaces the cached forest. The selection path is rebuilt and cleared
    /// if the selected group disappeared.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the hierarchy is malformed.
    pub async fn refresh_groups(&mut self) -> ClosetResult<&[CredentialGroup]> {
        let span = tracing::info_span!(span_names::GROUPS_REFRESH);
        async {
            let groups = self
                .api
                .list_groups()
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "Failed to fetch groups"))?;
            let forest = GroupForest::from_nested(&groups)?;
            tracing::debug!(item_count = forest.len(), "Fetched group forest");

            let had_selection = self.session.selection().selected_id().is_some();
            self.session.cache_mut().store_groups(groups);
            if had_selection && !self.session.refresh_selection() {
                tracing::info!("Selected group no longer exists");
            }
            Ok::<_, ClosetError>(())
        }
        .instrument(span)
        .await?;
        Ok(self.forest())
    }

    /// Returns the cached forest, fetching it if stale or missing
    ///
    /// # Errors
    ///
    /// Returns an error if a refetch was needed and failed.
    pub async fn ensure_groups(&mut self) -> ClosetResult<&[CredentialGroup]> {
        if self.session.cache().groups().is_none() {
            self.refresh_groups().await?;
        }
        Ok(self.forest())
    }

    /// Filters the forest by name
    ///
    /// # Errors
    ///
    /// Returns an error if the forest had to be fetched and the fetch failed.
    pub async fn search_groups(&mut self, query: &str) -> ClosetResult<Vec<CredentialGroup>> {
        let forest = self.ensure_groups().await?;
        Ok(filter_groups(forest, query))
    }

    /// Selects a group for display
    ///
    /// Returns false if the group is not in the forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest had to be fetched and the fetch failed.
    pub async fn select_group(&mut self, group_id: Uuid) -> ClosetResult<bool> {
        self.ensure_groups().await?;
        Ok(self.session.select(group_id))
    }

    /// Deselects the current group
    pub fn clear_selection(&mut self) {
        self.session.selection_mut().clear();
    }

    /// Refetches the type catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn load_catalog(&mut self) -> ClosetResult<&GroupTypeCatalog> {
        let types = self
            .api
            .list_group_types()
            .instrument(tracing::info_span!(span_names::TYPES_LOAD))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to fetch group types"))?;
        tracing::debug!(item_count = types.len(), "Fetched group types");
        self.catalog = GroupTypeCatalog::new(types);
        self.catalog_loaded = true;
        Ok(&self.catalog)
    }

    /// Returns the type catalog, fetching it once
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog was not loaded yet and the fetch failed.
    pub async fn ensure_catalog(&mut self) -> ClosetResult<&GroupTypeCatalog> {
        if !self.catalog_loaded {
            self.load_catalog().await?;
        }
        Ok(&self.catalog)
    }

    /// Parameter schema of a type, fetched once per type
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn parameters_for_type(
        &mut self,
        type_id: Uuid,
    ) -> ClosetResult<&[ParameterDefinition]> {
        if !self.parameters.contains_key(&type_id) {
            let parameters = self
                .api
                .list_parameters(type_id)
                .instrument(tracing::info_span!(span_names::TYPES_LOAD, type_id = %type_id))
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "Failed to fetch parameters"))?;
            self.parameters.insert(type_id, parameters);
        }
        Ok(self.parameters.get(&type_id).map_or(&[][..], Vec::as_slice))
    }

    /// Credential form fields for a group, resolved through its root's type
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::GroupNotFound`] or
    /// [`ValidationError::UnresolvedType`] if the schema cannot be resolved,
    /// or an API error.
    pub async fn parameters_for_group(
        &mut self,
        group_id: Uuid,
    ) -> ClosetResult<Vec<ParameterDefinition>> {
        let type_id = self.effective_type_id(group_id).await?;
        let schema = self.parameters_for_type(type_id).await?;
        Ok(form_fields(schema).into_iter().cloned().collect())
    }

    async fn effective_type_id(&mut self, group_id: Uuid) -> ClosetResult<Uuid> {
        self.ensure_groups().await?;
        self.ensure_catalog().await?;
        let forest = self.session.cache().last_groups().unwrap_or_default();
        let group = find_group_by_id(forest, group_id)
            .ok_or(ValidationError::GroupNotFound(group_id))?;
        let type_id = self
            .catalog
            .effective_type(group, forest)
            .map(|t| t.id)
            .ok_or(ValidationError::UnresolvedType(group_id))?;
        Ok(type_id)
    }

    /// Creates a root group or a sub-group
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] before any request is sent if the input
    /// is invalid, or an API error.
    pub async fn create_group(&mut self, input: &NewGroup) -> ClosetResult<CredentialGroup> {
        self.ensure_groups().await?;
        self.ensure_catalog().await?;
        let forest = self.session.cache().last_groups().unwrap_or_default();
        let request = input.validate(forest, &self.catalog)?;

        let span = tracing::info_span!(
            span_names::GROUP_CREATE,
            parent_id = ?request.parent_id,
            type_name = %request.credential_group_type_name
        );
        let created = self
            .api
            .create_group(&request)
            .instrument(span)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to create group"))?;

        tracing::info!(group_id = %created.id, name = %created.name, "Created group");
        self.session.cache_mut().invalidate_groups();
        Ok(created)
    }

    /// Renames a group
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank or overlong name, or an API
    /// error.
    pub async fn rename_group(
        &mut self,
        group_id: Uuid,
        name: &str,
    ) -> ClosetResult<CredentialGroup> {
        let name = validate_name("name", name)?;
        self.update_group(group_id, UpdateGroupRequest::rename(name))
            .await
    }

    /// Enables or disables a group
    ///
    /// # Errors
    ///
    /// Returns an API error.
    pub async fn set_group_active(
        &mut self,
        group_id: Uuid,
        is_active: bool,
    ) -> ClosetResult<CredentialGroup> {
        self.update_group(group_id, UpdateGroupRequest::set_active(is_active))
            .await
    }

    async fn update_group(
        &mut self,
        group_id: Uuid,
        request: UpdateGroupRequest,
    ) -> ClosetResult<CredentialGroup> {
        let updated = self
            .api
            .update_group(group_id, &request)
            .instrument(tracing::info_span!(span_names::GROUP_UPDATE, group_id = %group_id))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to update group"))?;
        self.session.cache_mut().invalidate_groups();
        Ok(updated)
    }

    /// What deleting a group would remove, for confirmation prompts
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::GroupNotFound`] for an unknown group, or an
    /// API error if the forest had to be fetched.
    pub async fn delete_impact(&mut self, group_id: Uuid) -> ClosetResult<DeleteImpact> {
        let forest = self.ensure_groups().await?;
        delete_impact(forest, group_id)
            .ok_or_else(|| ValidationError::GroupNotFound(group_id).into())
    }

    /// Deletes a group with all sub-groups and credentials
    ///
    /// Returns the ids of the removed groups as known before the delete.
    ///
    /// # Errors
    ///
    /// Returns an API error; a group that is already gone counts as deleted.
    pub async fn delete_group(&mut self, group_id: Uuid) -> ClosetResult<Vec<Uuid>> {
        self.ensure_groups().await?;
        self.api
            .delete_group(group_id)
            .instrument(tracing::info_span!(span_names::GROUP_DELETE, group_id = %group_id))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to delete group"))?;

        let removed = self.session.record_group_deleted(group_id);
        for id in &removed {
            self.orders.remove(id);
        }
        tracing::info!(%group_id, item_count = removed.len(), "Deleted group");
        Ok(removed)
    }

    /// Fetches a group's credentials, sorted by index
    ///
    /// The result always refreshes the cache. It replaces the displayed
    /// order only while the group is selected and no push is in flight.
    ///
    /// # Errors
    ///
    /// Returns an API error.
    pub async fn load_credentials(&mut self, group_id: Uuid) -> ClosetResult<Vec<Credential>> {
        let mut credentials = self
            .api
            .list_credentials(group_id)
            .instrument(tracing::info_span!(span_names::CREDENTIALS_LOAD, group_id = %group_id))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to fetch credentials"))?;
        sort_by_index(&mut credentials);
        self.session
            .cache_mut()
            .store_credentials(group_id, credentials.clone());

        if !self.session.selection().accepts(group_id) {
            tracing::debug!(%group_id, "Group not selected, cached only");
        } else if self.pushes.is_in_flight(group_id) {
            tracing::debug!(%group_id, "Order push in flight, keeping displayed order");
        } else {
            match self.orders.get_mut(&group_id) {
                Some(order) => order.replace(credentials.clone()),
                None => {
                    self.orders
                        .insert(group_id, OrderedGroup::new(group_id, credentials.clone()));
                }
            }
        }
        Ok(credentials)
    }

    /// Order currently displayed for a group
    pub fn displayed_credentials(&self, group_id: Uuid) -> Option<&[Credential]> {
        self.orders.get(&group_id).map(OrderedGroup::displayed)
    }

    /// Moves the credential at `from` to `to` and pushes the new order
    ///
    /// The group must have been loaded while selected. Returns false for a
    /// move onto itself, which sends nothing.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] for an unloaded group or out-of-range
    /// positions, or the API error of a failed push after rolling back.
    pub async fn reorder_credentials(
        &mut self,
        group_id: Uuid,
        from: usize,
        to: usize,
    ) -> ClosetResult<bool> {
        let order = self
            .orders
            .get_mut(&group_id)
            .ok_or(OrderError::UnknownGroup(group_id))?;
        match order.apply_move(from, to)? {
            Some(payload) => {
                self.push_order(group_id, payload).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Applies a move to the displayed order without waiting for the server
    ///
    /// Returns the payload to hand to [`Self::send_order`]. Returns `None`
    /// for a move onto itself, or when a push for the group is already in
    /// flight; the new order is then parked and sent as soon as that push
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] for an unloaded group or out-of-range
    /// positions.
    pub fn stage_reorder(
        &mut self,
        group_id: Uuid,
        from: usize,
        to: usize,
    ) -> ClosetResult<Option<UpdateOrderRequest>> {
        let order = self
            .orders
            .get_mut(&group_id)
            .ok_or(OrderError::UnknownGroup(group_id))?;
        let Some(payload) = order.apply_move(from, to)? else {
            return Ok(None);
        };
        let sendable = self.pushes.request(group_id, payload);
        if sendable.is_none() {
            tracing::debug!(%group_id, "Order push in flight, parked new order");
        }
        Ok(sendable)
    }

    /// Moves credential `active` onto the position of `over`
    ///
    /// Returns false if either credential is unknown or they are the same.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::UnknownGroup`] for an unloaded group, or the API
    /// error of a failed push after rolling back.
    pub async fn move_credential(
        &mut self,
        group_id: Uuid,
        active: Uuid,
        over: Uuid,
    ) -> ClosetResult<bool> {
        let order = self
            .orders
            .get_mut(&group_id)
            .ok_or(OrderError::UnknownGroup(group_id))?;
        match order.apply_drop(active, over) {
            Some(payload) => {
                self.push_order(group_id, payload).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Queues `payload` and sends it unless a push is already in flight
    async fn push_order(
        &mut self,
        group_id: Uuid,
        payload: UpdateOrderRequest,
    ) -> ClosetResult<()> {
        match self.pushes.request(group_id, payload) {
            Some(next) => self.send_order(group_id, next).await,
            None => Ok(()),
        }
    }

    /// Sends a staged order, then every order parked behind it
    ///
    /// # Errors
    ///
    /// Returns the API error of the first failed push. The displayed order
    /// is rolled back and parked orders are dropped.
    pub async fn send_order(
        &mut self,
        group_id: Uuid,
        payload: UpdateOrderRequest,
    ) -> ClosetResult<()> {
        let mut next = payload;
        loop {
            let span = tracing::info_span!(
                span_names::CREDENTIALS_REORDER,
                group_id = %group_id,
                item_count = next.credentials.len()
            );
            match self.api.update_order(group_id, &next).instrument(span).await {
                Ok(()) => {
                    if let Some(order) = self.orders.get_mut(&group_id) {
                        order.confirm(&next);
                    }
                    match self.pushes.complete(group_id) {
                        Some(pending) => next = pending,
                        None => break,
                    }
                }
                Err(e) => {
                    if self.pushes.fail(group_id).is_some() {
                        tracing::debug!(%group_id, "Dropped pending order after failure");
                    }
                    if let Some(order) = self.orders.get_mut(&group_id) {
                        order.rollback();
                    }
                    self.session.cache_mut().invalidate_credentials(group_id);
                    tracing::warn!(%group_id, error = %e, "Failed to save credential order");
                    return Err(e.into());
                }
            }
        }

        self.session.cache_mut().invalidate_credentials(group_id);
        Ok(())
    }

    /// Creates a credential at the end of its group
    ///
    /// The parameters are checked against the schema of the group's
    /// effective type; the reserved `index` is assigned here.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] before any write is sent if the input is
    /// invalid, or an API error.
    pub async fn create_credential(&mut self, input: &NewCredential) -> ClosetResult<Credential> {
        let group_id = input.group_id;
        let type_id = self.effective_type_id(group_id).await?;
        let schema = self.parameters_for_type(type_id).await?;
        let mut request = input.validate(schema)?;

        let mut existing = self.group_credentials(group_id).await?;
        sort_by_index(&mut existing);
        if !is_dense(&existing) && !self.pushes.is_in_flight(group_id) {
            tracing::info!(
                %group_id,
                item_count = existing.len(),
                "Compacting credential indices"
            );
            match self.push_order(group_id, order_payload(&existing)).await {
                Ok(()) => reindex(&mut existing),
                Err(_) => tracing::debug!(%group_id, "Appending after the highest index"),
            }
        }
        request.parameters.insert(
            INDEX_PARAMETER.to_string(),
            next_index(&existing).to_string(),
        );

        let created = self
            .api
            .create_credential(&request)
            .instrument(tracing::info_span!(span_names::CREDENTIAL_CREATE, group_id = %group_id))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to create credential"))?;

        tracing::info!(credential_id = %created.id, "Created credential");
        self.session.cache_mut().invalidate_credentials(group_id);
        self.session.cache_mut().invalidate_groups();
        Ok(created)
    }

    /// Deletes a credential
    ///
    /// With `group_id` only that group's list is invalidated; without it
    /// every cached list is.
    ///
    /// # Errors
    ///
    /// Returns an API error; a credential that is already gone counts as
    /// deleted.
    pub async fn delete_credential(
        &mut self,
        credential_id: Uuid,
        group_id: Option<Uuid>,
    ) -> ClosetResult<()> {
        self.api
            .delete_credential(credential_id)
            .instrument(tracing::info_span!(
                span_names::CREDENTIAL_DELETE,
                credential_id = %credential_id
            ))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to delete credential"))?;

        let Some(group_id) = group_id else {
            self.session.cache_mut().invalidate_all();
            return Ok(());
        };
        self.session.cache_mut().invalidate_credentials(group_id);
        self.session.cache_mut().invalidate_groups();

        let compacted = self.orders.get_mut(&group_id).and_then(|order| {
            let remaining: Vec<Credential> = order
                .confirmed()
                .iter()
                .filter(|c| c.id != credential_id)
                .cloned()
                .collect();
            order.replace(remaining);
            order.compact()
        });
        if let Some(payload) = compacted {
            // the delete itself went through; a sparse order is repaired on the next create
            if self.push_order(group_id, payload).await.is_err() {
                tracing::debug!(%group_id, "Left credential indices sparse");
            }
        }
        Ok(())
    }

    /// Renames, enables, disables or edits the parameters of a credential
    ///
    /// Edited parameters are validated against the group's schema and merged
    /// over the stored ones; the credential keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CredentialNotFound`] if the credential is
    /// not in the group, another [`ValidationError`] before any write is sent
    /// if the edit is invalid, or an API error.
    pub async fn update_credential(
        &mut self,
        group_id: Uuid,
        credential_id: Uuid,
        update: &CredentialUpdate,
    ) -> ClosetResult<Credential> {
        let current = self
            .group_credentials(group_id)
            .await?
            .into_iter()
            .find(|c| c.id == credential_id)
            .ok_or(ValidationError::CredentialNotFound(credential_id))?;
        let type_id = self.effective_type_id(group_id).await?;
        let schema = self.parameters_for_type(type_id).await?;
        let request = update.validate(schema, &current)?;

        let updated = self
            .api
            .update_credential(credential_id, &request)
            .instrument(tracing::info_span!(
                span_names::CREDENTIAL_UPDATE,
                credential_id = %credential_id
            ))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to update credential"))?;

        tracing::info!(%credential_id, "Updated credential");
        self.session.cache_mut().invalidate_credentials(group_id);
        self.session.cache_mut().invalidate_groups();
        if let Some(order) = self.orders.get_mut(&group_id) {
            order.update(&updated);
        }
        Ok(updated)
    }

    /// Cached credentials of a group, fetched if missing
    async fn group_credentials(&mut self, group_id: Uuid) -> ClosetResult<Vec<Credential>> {
        match self.session.cache().credentials(group_id) {
            Some(credentials) => Ok(credentials.to_vec()),
            None => self.load_credentials(group_id).await,
        }
    }

    /// Workspaces available to the signed-in user
    ///
    /// # Errors
    ///
    /// Returns an API error.
    pub async fn workspaces(&self) -> ClosetResult<Vec<Workspace>> {
        Ok(self.api.list_workspaces().await?)
    }

    /// Creates a workspace
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] or [`ValidationError::TooLong`]
    /// for a bad name, or an API error.
    pub async fn create_workspace(&self, name: &str) -> ClosetResult<Workspace> {
        let request = CreateWorkspaceRequest {
            name: validate_name("name", name)?,
        };
        let created = self
            .api
            .create_workspace(&request)
            .instrument(tracing::info_span!(span_names::WORKSPACE_UPDATE))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to create workspace"))?;
        tracing::info!(workspace_id = %created.id, "Created workspace");
        Ok(created)
    }

    /// Renames a workspace
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a bad name, or an API error.
    pub async fn rename_workspace(
        &self,
        workspace_id: Uuid,
        name: &str,
    ) -> ClosetResult<Workspace> {
        let request = UpdateWorkspaceRequest::rename(validate_name("name", name)?);
        Ok(self
            .api
            .update_workspace(workspace_id, &request)
            .instrument(tracing::info_span!(
                span_names::WORKSPACE_UPDATE,
                workspace_id = %workspace_id
            ))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to rename workspace"))?)
    }

    /// Makes a workspace the account default
    ///
    /// # Errors
    ///
    /// Returns an API error.
    pub async fn set_default_workspace(&self, workspace_id: Uuid) -> ClosetResult<()> {
        self.api
            .set_default_workspace(workspace_id)
            .instrument(tracing::info_span!(
                span_names::WORKSPACE_UPDATE,
                workspace_id = %workspace_id
            ))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to set default workspace"))?;
        tracing::info!(%workspace_id, "Set default workspace");
        Ok(())
    }

    /// Deletes a workspace
    ///
    /// Deleting the current workspace leaves the service unscoped with an
    /// empty session. Returns true in that case.
    ///
    /// # Errors
    ///
    /// Returns an API error; a workspace that is already gone counts as
    /// deleted.
    pub async fn delete_workspace(&mut self, workspace_id: Uuid) -> ClosetResult<bool> {
        self.api
            .delete_workspace(workspace_id)
            .instrument(tracing::info_span!(
                span_names::WORKSPACE_UPDATE,
                workspace_id = %workspace_id
            ))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to delete workspace"))?;
        tracing::info!(%workspace_id, "Deleted workspace");

        if self.session.workspace_id() != Some(workspace_id) {
            return Ok(false);
        }
        self.leave_workspace();
        Ok(true)
    }

    /// Scopes the service to another workspace
    ///
    /// Returns false if `workspace_id` is already current.
    pub fn switch_workspace(&mut self, workspace_id: Uuid) -> bool {
        if !self.session.switch_workspace(workspace_id) {
            return false;
        }
        self.api.set_workspace(Some(workspace_id));
        self.orders.clear();
        self.pushes.clear();
        true
    }

    /// Forgets all user state
    pub fn logout(&mut self) {
        self.leave_workspace();
        self.catalog = GroupTypeCatalog::default();
        self.catalog_loaded = false;
        self.parameters.clear();
    }

    fn leave_workspace(&mut self) {
        self.session.logout();
        self.api.set_workspace(None);
        self.orders.clear();
        self.pushes.clear();
    }
}
