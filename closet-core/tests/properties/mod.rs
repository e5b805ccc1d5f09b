//! Property test modules and shared strategies

mod inheritance_tests;
mod ordering_tests;
mod selection_tests;
mod tree_tests;

use closet_core::models::{Credential, CredentialGroup};
use proptest::prelude::*;
use proptest::sample::Index;
use uuid::Uuid;

/// Strategy for short lowercase names, so searches hit often
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,4}"
}

/// Strategy for a nested forest of up to 24 groups
///
/// Node `i` either starts a new root or hangs below one of the nodes before
/// it, so every generated hierarchy is acyclic.
pub fn forest_strategy() -> impl Strategy<Value = Vec<CredentialGroup>> {
    prop::collection::vec(
        (proptest::option::weighted(0.8, any::<Index>()), name_strategy()),
        1..24,
    )
    .prop_map(|nodes| {
        let parents: Vec<Option<usize>> = nodes
            .iter()
            .enumerate()
            .map(|(i, (parent, _))| if i == 0 { None } else { parent.map(|p| p.index(i)) })
            .collect();
        let groups: Vec<CredentialGroup> = nodes
            .into_iter()
            .zip(&parents)
            .map(|((_, name), parent)| match parent {
                Some(_) => CredentialGroup::with_parent(name, Uuid::nil()),
                None => CredentialGroup::new_root(name, Uuid::new_v4()),
            })
            .collect();

        (0..groups.len())
            .filter(|i| parents[*i].is_none())
            .map(|root| nest(root, &groups, &parents))
            .collect()
    })
}

fn nest(node: usize, groups: &[CredentialGroup], parents: &[Option<usize>]) -> CredentialGroup {
    let children = (0..groups.len())
        .filter(|i| parents[*i] == Some(node))
        .map(|child| nest(child, groups, parents))
        .collect();
    groups[node].clone().with_children(children)
}

/// Strategy for a group's credentials with dense indexes, in shuffled order
pub fn credentials_strategy(max: usize) -> impl Strategy<Value = Vec<Credential>> {
    (0..=max)
        .prop_map(|n| {
            let group_id = Uuid::new_v4();
            (0..n)
                .map(|i| Credential::new(format!("cred-{i}"), group_id).with_index(i))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}
