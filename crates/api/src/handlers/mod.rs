//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource. Handlers
//! build a [`StoreClient`](mechgraph_store::StoreClient) for the caller and
//! map failures via [`AppError`].

pub mod graph;
pub mod mechanic;
pub mod page;
pub mod project;
pub mod relationship;

use mechgraph_core::error::CoreError;
use mechgraph_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Parse a path id. A malformed id cannot name a visible row, so it is a
/// not-found rather than a bad request.
pub(crate) fn parse_id(entity: &'static str, raw: &str) -> AppResult<DbId> {
    raw.parse().map_err(|_| {
        AppError::Core(CoreError::NotFound {
            entity,
            id: raw.to_string(),
        })
    })
}
