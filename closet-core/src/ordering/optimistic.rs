//! Optimistic ordering state for one group

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::OrderError;
use crate::models::{Credential, UpdateOrderRequest};

use super::list::{is_dense, order_payload, reindex, reorder, reorder_by_id, sort_by_index};

/// Confirmed and displayed credential order for a group
///
/// Moves update `displayed` immediately and return the payload to push.
/// When the server accepts a payload it becomes the new `confirmed` order;
/// when a push fails, [`OrderedGroup::rollback`] restores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedGroup {
    group_id: Uuid,
    confirmed: Vec<Credential>,
    displayed: Vec<Credential>,
}

impl OrderedGroup {
    /// Starts from a server response, sorted by index
    #[must_use]
    pub fn new(group_id: Uuid, mut credentials: Vec<Credential>) -> Self {
        sort_by_index(&mut credentials);
        Self {
            group_id,
            confirmed: credentials.clone(),
            displayed: credentials,
        }
    }

    /// Group this state belongs to
    #[must_use]
    pub const fn group_id(&self) -> Uuid {
        self.group_id
    }

    /// Order currently shown
    #[must_use]
    pub fn displayed(&self) -> &[Credential] {
        &self.displayed
    }

    /// Last order the server accepted
    #[must_use]
    pub fn confirmed(&self) -> &[Credential] {
        &self.confirmed
    }

    /// Returns true if the displayed order has not been confirmed yet
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.displayed != self.confirmed
    }

    /// Moves a credential by position
    ///
    /// Returns the payload to push, or `None` for a move onto itself.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OutOfRange`] and leaves the state untouched if
    /// a position is past the end.
    pub fn apply_move(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<Option<UpdateOrderRequest>, OrderError> {
        let reordered = reorder(&self.displayed, from, to)?;
        if from == to {
            return Ok(None);
        }
        self.displayed = reordered;
        Ok(Some(order_payload(&self.displayed)))
    }

    /// Moves `active` onto the position of `over`
    ///
    /// Returns `None` when either id is unknown.
    pub fn apply_drop(&mut self, active: Uuid, over: Uuid) -> Option<UpdateOrderRequest> {
        self.displayed = reorder_by_id(&self.displayed, active, over)?;
        Some(order_payload(&self.displayed))
    }

    /// Records that the server accepted `pushed`
    ///
    /// Credentials missing from the payload keep their confirmed position
    /// after the pushed ones.
    pub fn confirm(&mut self, pushed: &UpdateOrderRequest) {
        let mut by_id: HashMap<Uuid, Credential> = self
            .confirmed
            .drain(..)
            .map(|c| (c.id, c))
            .collect();

        let mut confirmed = Vec::with_capacity(by_id.len());
        for entry in &pushed.credentials {
            if let Some(mut credential) = by_id.remove(&entry.credential_id) {
                credential.set_index(entry.index);
                confirmed.push(credential);
            }
        }

        let mut rest: Vec<Credential> = by_id.into_values().collect();
        sort_by_index(&mut rest);
        confirmed.extend(rest);
        self.confirmed = confirmed;
    }

    /// Re-packs the displayed indices to `0..len`
    ///
    /// Returns the payload to push, or `None` if they were already dense.
    pub fn compact(&mut self) -> Option<UpdateOrderRequest> {
        if is_dense(&self.displayed) {
            return None;
        }
        reindex(&mut self.displayed);
        Some(order_payload(&self.displayed))
    }

    /// Swaps in an edited credential without moving it
    pub fn update(&mut self, credential: &Credential) {
        for list in [&mut self.confirmed, &mut self.displayed] {
            if let Some(slot) = list.iter_mut().find(|c| c.id == credential.id) {
                let index = slot.index();
                *slot = credential.clone();
                if let Some(index) = index {
                    slot.set_index(index);
                }
            }
        }
    }

    /// Restores the last confirmed order
    pub fn rollback(&mut self) {
        if self.is_dirty() {
            tracing::warn!(group_id = %self.group_id, "Rolling back credential order");
        }
        self.displayed = self.confirmed.clone();
    }

    /// Replaces both orders with fresh server data
    pub fn replace(&mut self, credentials: Vec<Credential>) {
        *self = Self::new(self.group_id, credentials);
    }
}
