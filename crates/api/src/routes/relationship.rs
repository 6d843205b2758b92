use axum::routing::delete;
use axum::Router;

use crate::handlers::relationship;
use crate::state::AppState;

/// Routes mounted at `/relationships`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(relationship::delete))
}
