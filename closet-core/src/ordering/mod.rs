//! Credential ordering within a group
//!
//! Each credential stores its position in the reserved `index` parameter.
//! After any reorder the indices of a group are exactly `0..N`, and the full
//! order is pushed to the server in one request.

mod list;
mod optimistic;
mod queue;

pub use list::{
    is_dense, next_index, order_payload, reindex, reorder, reorder_by_id, sort_by_index,
};
pub use optimistic::OrderedGroup;
pub use queue::PushQueue;
