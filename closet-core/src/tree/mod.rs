//! Group tree model
//!
//! Pure functions over the nested group forest returned by the API, plus
//! [`GroupForest`], an arena built from parent pointers that refuses cyclic
//! hierarchies. Lookups never fail: a missing id is an ordinary outcome (the
//! group may have been deleted from another session) and yields `None`,
//! an empty collection or `false`.

mod filter;
mod forest;
mod query;

pub use filter::{filter_groups, name_matches};
pub use forest::GroupForest;
pub use query::{
    DeleteImpact, build_path, delete_impact, descendant_ids, expanded_ancestors,
    find_group_by_id, flatten, is_descendant_or_self, path_names, subtree_ids,
};
