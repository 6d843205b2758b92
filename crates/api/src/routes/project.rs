//! Route definitions for the `/projects` resource and its nested graph.

use axum::routing::get;
use axum::Router;

use crate::handlers::{graph, mechanic, project, relationship};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PATCH  /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /{id}/graph             -> graph::load
/// GET    /{id}/mechanics         -> mechanic::list_by_project
/// POST   /{id}/mechanics         -> mechanic::create
/// GET    /{id}/relationships     -> relationship::list_by_project
/// POST   /{id}/relationships     -> relationship::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/graph", get(graph::load))
        .route(
            "/{id}/mechanics",
            get(mechanic::list_by_project).post(mechanic::create),
        )
        .route(
            "/{id}/relationships",
            get(relationship::list_by_project).post(relationship::create),
        )
}
