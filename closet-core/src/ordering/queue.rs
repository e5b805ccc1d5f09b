//! Serializes order pushes per group

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::UpdateOrderRequest;

/// Tracks in-flight order pushes, at most one per group
///
/// A push requested while another is in flight for the same group is parked.
/// Only the newest parked payload survives: every payload is the full list,
/// so a later one supersedes anything queued before it.
#[derive(Debug, Default)]
pub struct PushQueue {
    in_flight: HashSet<Uuid>,
    pending: HashMap<Uuid, UpdateOrderRequest>,
}

impl PushQueue {
    /// Creates an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks to push `payload` for `group_id`
    ///
    /// Returns the payload if it may be sent now, or `None` if it was parked
    /// behind an in-flight push.
    pub fn request(
        &mut self,
        group_id: Uuid,
        payload: UpdateOrderRequest,
    ) -> Option<UpdateOrderRequest> {
        if self.in_flight.insert(group_id) {
            return Some(payload);
        }
        if self.pending.insert(group_id, payload).is_some() {
            tracing::debug!(%group_id, "Superseded pending credential order");
        }
        None
    }

    /// Marks the in-flight push for `group_id` as succeeded
    ///
    /// Returns the parked payload to send next, which stays in flight.
    pub fn complete(&mut self, group_id: Uuid) -> Option<UpdateOrderRequest> {
        let next = self.pending.remove(&group_id);
        if next.is_none() {
            self.in_flight.remove(&group_id);
        }
        next
    }

    /// Marks the in-flight push for `group_id` as failed
    ///
    /// Any parked payload is dropped and returned; the caller rolls back to
    /// the last confirmed order instead of sending it.
    pub fn fail(&mut self, group_id: Uuid) -> Option<UpdateOrderRequest> {
        self.in_flight.remove(&group_id);
        self.pending.remove(&group_id)
    }

    /// Returns true if a push for `group_id` is in flight
    #[must_use]
    pub fn is_in_flight(&self, group_id: Uuid) -> bool {
        self.in_flight.contains(&group_id)
    }

    /// Parked payload for `group_id`, if any
    #[must_use]
    pub fn pending(&self, group_id: Uuid) -> Option<&UpdateOrderRequest> {
        self.pending.get(&group_id)
    }

    /// Forgets all state, e.g. after switching workspace
    pub fn clear(&mut self) {
        self.in_flight.clear();
        self.pending.clear();
    }
}
