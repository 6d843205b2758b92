//! Handlers for mechanic relationships.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mechgraph_db::models::relationship::{MechanicRelationship, NewRelationship};

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/relationships
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<String>,
    Json(input): Json<NewRelationship>,
) -> AppResult<(StatusCode, Json<MechanicRelationship>)> {
    let project_id = parse_id("project", &project_id)?;
    let relationship = caller
        .client(&state)
        .create_mechanic_relationship(
            project_id,
            input.source_mechanic_id,
            input.target_mechanic_id,
            input.relationship_type.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(relationship)))
}

/// GET /api/v1/projects/{id}/relationships
pub async fn list_by_project(
    State(state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<MechanicRelationship>>> {
    let project_id = parse_id("project", &project_id)?;
    let relationships = caller
        .client(&state)
        .get_project_mechanic_relationships(project_id)
        .await?;
    Ok(Json(relationships))
}

/// DELETE /api/v1/relationships/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id("relationship", &id)?;
    caller.client(&state).delete_mechanic_relationship(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
