use axum::routing::{patch, put};
use axum::Router;

use crate::handlers::mechanic;
use crate::state::AppState;

/// Routes mounted at `/mechanics`.
///
/// ```text
/// PUT    /positions   -> save_positions
/// PATCH  /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/positions", put(mechanic::save_positions))
        .route("/{id}", patch(mechanic::update).delete(mechanic::delete))
}
