//! Property-based tests for credential ordering
//!
//! After any reorder the indexes of a group are exactly `0..N`; moving an
//! item onto itself changes nothing.

use std::collections::HashSet;

use closet_core::error::OrderError;
use closet_core::models::Credential;
use closet_core::ordering::{OrderedGroup, is_dense, order_payload, reorder, sort_by_index};
use proptest::prelude::*;
use uuid::Uuid;

use super::credentials_strategy;

fn ids(credentials: &[Credential]) -> Vec<Uuid> {
    credentials.iter().map(|c| c.id).collect()
}

/// Sorted credentials plus two valid positions
fn moves_strategy() -> impl Strategy<Value = (Vec<Credential>, usize, usize)> {
    credentials_strategy(12)
        .prop_filter("need at least one credential", |c| !c.is_empty())
        .prop_flat_map(|mut credentials| {
            sort_by_index(&mut credentials);
            let len = credentials.len();
            (Just(credentials), 0..len, 0..len)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sorting a shuffled group restores index order.
    #[test]
    fn prop_sort_restores_index_order(mut credentials in credentials_strategy(12)) {
        sort_by_index(&mut credentials);
        let indexes: Vec<Option<usize>> = credentials.iter().map(Credential::index).collect();
        let expected: Vec<Option<usize>> = (0..credentials.len()).map(Some).collect();
        prop_assert_eq!(indexes, expected);
    }

    /// Reordering keeps the same credentials, moves the right one and leaves
    /// indexes dense.
    #[test]
    fn prop_reorder_keeps_dense_indexes((credentials, from, to) in moves_strategy()) {
        let reordered = reorder(&credentials, from, to);
        prop_assert!(reordered.is_ok());
        let reordered = reordered.unwrap_or_default();

        prop_assert!(is_dense(&reordered));
        prop_assert_eq!(reordered.len(), credentials.len());
        prop_assert_eq!(reordered[to].id, credentials[from].id);

        let before: HashSet<Uuid> = credentials.iter().map(|c| c.id).collect();
        let after: HashSet<Uuid> = reordered.iter().map(|c| c.id).collect();
        prop_assert_eq!(before, after);
    }

    /// Moving an item onto itself is a no-op.
    #[test]
    fn prop_reorder_same_position_is_noop((credentials, from, _to) in moves_strategy()) {
        prop_assert_eq!(reorder(&credentials, from, from), Ok(credentials));
    }

    /// Positions past the end are rejected.
    #[test]
    fn prop_reorder_out_of_range((credentials, from, _to) in moves_strategy(), extra in 0usize..5) {
        let len = credentials.len();
        prop_assert_eq!(
            reorder(&credentials, from, len + extra),
            Err(OrderError::OutOfRange { position: len + extra, len })
        );
    }

    /// The pushed payload lists every credential once with its new index.
    #[test]
    fn prop_payload_matches_display((credentials, from, to) in moves_strategy()) {
        let reordered = reorder(&credentials, from, to).unwrap_or_default();
        let payload = order_payload(&reordered);
        let entries: Vec<(Uuid, usize)> = payload
            .credentials
            .iter()
            .map(|e| (e.credential_id, e.index))
            .collect();
        let expected: Vec<(Uuid, usize)> = ids(&reordered).into_iter().zip(0..).collect();
        prop_assert_eq!(entries, expected);
    }

    /// A rolled back move shows the confirmed order again; a confirmed one
    /// becomes the new baseline.
    #[test]
    fn prop_optimistic_confirm_and_rollback((credentials, from, to) in moves_strategy()) {
        let group_id = Uuid::new_v4();

        let mut rolled_back = OrderedGroup::new(group_id, credentials.clone());
        let _ = rolled_back.apply_move(from, to);
        rolled_back.rollback();
        prop_assert_eq!(ids(rolled_back.displayed()), ids(&credentials));
        prop_assert!(!rolled_back.is_dirty());

        let mut confirmed = OrderedGroup::new(group_id, credentials.clone());
        if let Ok(Some(payload)) = confirmed.apply_move(from, to) {
            confirmed.confirm(&payload);
        }
        prop_assert!(!confirmed.is_dirty());
        prop_assert!(is_dense(confirmed.confirmed()));
    }
}
