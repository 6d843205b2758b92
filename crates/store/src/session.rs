use mechgraph_core::types::DbId;
use serde::{Deserialize, Serialize};

/// The caller's authenticated identity.
///
/// Resolved by the caller from a prior login step (the API derives it from a
/// bearer token). A [`StoreClient`](crate::StoreClient) without a session is
/// anonymous: it sees no projects and cannot create any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: DbId,
}

impl Session {
    pub fn new(user_id: DbId) -> Self {
        Self { user_id }
    }
}
