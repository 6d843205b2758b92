use std::sync::Arc;

use mechgraph_store::{GraphStore, Session, StoreClient};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or a token handle.
#[derive(Clone)]
pub struct AppState {
    /// Store backend shared by every request.
    pub store: Arc<dyn GraphStore>,
    pub config: Arc<ServerConfig>,
    /// Cancelled when the server begins shutting down; aborts in-flight store calls.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// A store client for one request, bound to the caller's session.
    pub fn client(&self, session: Option<Session>) -> StoreClient {
        let client = StoreClient::new(Arc::clone(&self.store))
            .with_timeout(self.config.store.call_timeout)
            .with_cancellation(self.shutdown.child_token());
        match session {
            Some(session) => client.with_session(session),
            None => client,
        }
    }
}
