//! Handlers for game mechanics.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mechgraph_core::mechanic::MechanicPosition;
use mechgraph_db::models::mechanic::{GameMechanic, NewMechanic, UpdateMechanic};
use mechgraph_store::graph::{positions_from_flow_nodes, FlowNode};
use serde::Deserialize;

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::state::AppState;

/// Body of a bulk position save: plain `{id, x, y}` entries, or the nodes the
/// editor reports at the end of a drag.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PositionBatch {
    Positions(Vec<MechanicPosition>),
    Nodes(Vec<FlowNode>),
}

/// POST /api/v1/projects/{id}/mechanics
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<String>,
    Json(input): Json<NewMechanic>,
) -> AppResult<(StatusCode, Json<GameMechanic>)> {
    let project_id = parse_id("project", &project_id)?;
    let mechanic = caller
        .client(&state)
        .create_mechanic(project_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(mechanic)))
}

/// GET /api/v1/projects/{id}/mechanics
pub async fn list_by_project(
    State(state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<GameMechanic>>> {
    let project_id = parse_id("project", &project_id)?;
    let mechanics = caller
        .client(&state)
        .get_project_mechanics(project_id)
        .await?;
    Ok(Json(mechanics))
}

/// PATCH /api/v1/mechanics/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(input): Json<UpdateMechanic>,
) -> AppResult<Json<GameMechanic>> {
    let id = parse_id("mechanic", &id)?;
    let mechanic = caller.client(&state).update_mechanic(id, &input).await?;
    Ok(Json(mechanic))
}

/// DELETE /api/v1/mechanics/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id("mechanic", &id)?;
    caller.client(&state).delete_mechanic(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/mechanics/positions
pub async fn save_positions(
    State(state): State<AppState>,
    caller: Caller,
    Json(batch): Json<PositionBatch>,
) -> AppResult<StatusCode> {
    let positions = match batch {
        PositionBatch::Positions(positions) => positions,
        PositionBatch::Nodes(nodes) => positions_from_flow_nodes(&nodes)?,
    };
    caller
        .client(&state)
        .save_mechanic_positions(&positions)
        .await?;
    tracing::debug!(count = positions.len(), "Mechanic positions saved");
    Ok(StatusCode::NO_CONTENT)
}
