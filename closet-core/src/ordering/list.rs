//! Pure operations on a group's credential list

use std::cmp::Ordering;

use uuid::Uuid;

use crate::error::OrderError;
use crate::models::{Credential, CredentialOrderEntry, UpdateOrderRequest};

/// Sorts credentials by their `index` parameter
///
/// Credentials without a usable index sort after all indexed ones. Ties are
/// broken by creation time, then by id, so the result is deterministic.
pub fn sort_by_index(credentials: &mut [Credential]) {
    credentials.sort_by(compare_by_index);
}

fn compare_by_index(a: &Credential, b: &Credential) -> Ordering {
    match (a.index(), b.index()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.created_at.cmp(&b.created_at))
    .then_with(|| a.id.cmp(&b.id))
}

/// Rewrites every `index` to match list position
pub fn reindex(credentials: &mut [Credential]) {
    for (idx, credential) in credentials.iter_mut().enumerate() {
        credential.set_index(idx);
    }
}

/// Returns true if the indices are exactly `0..len` in list order
#[must_use]
pub fn is_dense(credentials: &[Credential]) -> bool {
    credentials
        .iter()
        .enumerate()
        .all(|(idx, c)| c.index() == Some(idx))
}

/// Moves the credential at `from` to position `to` and re-indexes
///
/// Moving an item onto itself returns the list unchanged.
///
/// # Errors
///
/// Returns [`OrderError::OutOfRange`] if either position is past the end.
pub fn reorder(
    credentials: &[Credential],
    from: usize,
    to: usize,
) -> Result<Vec<Credential>, OrderError> {
    let len = credentials.len();
    for position in [from, to] {
        if position >= len {
            return Err(OrderError::OutOfRange { position, len });
        }
    }

    let mut reordered = credentials.to_vec();
    if from == to {
        return Ok(reordered);
    }

    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    reindex(&mut reordered);
    Ok(reordered)
}

/// Drag-end variant of [`reorder`]: `active` was dropped over `over`
///
/// Returns `None` if either id is unknown or both are the same.
#[must_use]
pub fn reorder_by_id(
    credentials: &[Credential],
    active: Uuid,
    over: Uuid,
) -> Option<Vec<Credential>> {
    if active == over {
        return None;
    }
    let from = credentials.iter().position(|c| c.id == active)?;
    let to = credentials.iter().position(|c| c.id == over)?;
    reorder(credentials, from, to).ok()
}

/// Index for a credential appended to the group
///
/// One past the highest stored index, and never below the list length, so
/// the new index cannot collide with an existing one even when the list
/// has gaps.
#[must_use]
pub fn next_index(credentials: &[Credential]) -> usize {
    credentials
        .iter()
        .filter_map(Credential::index)
        .max()
        .map_or(0, |max| max + 1)
        .max(credentials.len())
}

/// Full-list order payload, positions taken from list order
#[must_use]
pub fn order_payload(credentials: &[Credential]) -> UpdateOrderRequest {
    UpdateOrderRequest {
        credentials: credentials
            .iter()
            .enumerate()
            .map(|(index, c)| CredentialOrderEntry {
                credential_id: c.id,
                index,
            })
            .collect(),
    }
}
