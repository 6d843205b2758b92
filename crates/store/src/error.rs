use std::time::Duration;

use mechgraph_core::error::CoreError;
use mechgraph_core::types::DbId;

/// Rejection code: a position batch named a mechanic that is absent or not
/// visible to the caller.
pub const UNKNOWN_MECHANIC: &str = "unknown_mechanic";

/// Rejection code: a relationship endpoint is not a mechanic of the project.
pub const ENDPOINT_OUTSIDE_PROJECT: &str = "endpoint_outside_project";

pub type BackendResult<T> = Result<T, BackendError>;

pub type StoreResult<T> = Result<T, StoreError>;

/// A failure reported by a [`GraphStore`](crate::GraphStore) backend, or by
/// the client while waiting on one.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The store refused the write (constraint or visibility check).
    #[error("Rejected ({code}): {message}")]
    Rejected { code: &'static str, message: String },

    #[error("Store call timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Store call was cancelled")]
    Cancelled,
}

impl BackendError {
    pub fn rejected(code: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthenticationRequired,
    NotFound,
    StoreOperation,
}

/// Failure returned by every [`StoreClient`](crate::StoreClient) operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write that needs an owner was attempted without a session.
    #[error("Authentication required: no active session")]
    AuthenticationRequired,

    /// A single-row lookup matched nothing visible. Absent and forbidden rows
    /// are indistinguishable.
    #[error("Not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Any other failure, carrying the backend's detail.
    #[error("Store operation '{operation}' failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: BackendError,
    },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            StoreError::AuthenticationRequired => ErrorKind::AuthenticationRequired,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Operation { .. } => ErrorKind::StoreOperation,
        }
    }

    /// The backend detail for operation failures.
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            StoreError::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}
