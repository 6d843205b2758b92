//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mechgraph_db::models::project::{NewProject, Project, UpdateProject};

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = caller.client(&state).create_project(&input).await?;
    tracing::info!(project_id = %project.id, user_id = %project.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>, caller: Caller) -> AppResult<Json<Vec<Project>>> {
    let projects = caller.client(&state).get_user_projects().await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let id = parse_id("project", &id)?;
    let project = caller.client(&state).get_project(id).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let id = parse_id("project", &id)?;
    let project = caller.client(&state).update_project(id, &input).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Always 204 for a well-formed id: deleting a missing or foreign project is a no-op.
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id("project", &id)?;
    caller.client(&state).delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
