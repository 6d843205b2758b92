pub mod health;
pub mod mechanic;
pub mod page;
pub mod project;
pub mod relationship;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires the `apikey` header; store-backed routes also read
/// the optional bearer session.
///
/// ```text
/// /projects                                   list, create
/// /projects/{id}                              get, update, delete
/// /projects/{id}/graph                        graph editor load
/// /projects/{id}/mechanics                    list, create
/// /projects/{id}/relationships                list, create
///
/// /mechanics/positions                        bulk position save (PUT)
/// /mechanics/{id}                             update, delete
///
/// /relationships/{id}                         delete
///
/// /pages/projects/{id}                        editor page parameters
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/mechanics", mechanic::router())
        .nest("/relationships", relationship::router())
        .nest("/pages", page::router())
}
