//! Handler for the editor's initial graph load.

use axum::extract::{Path, State};
use axum::Json;
use mechgraph_store::graph::{FlowEdge, FlowNode};
use mechgraph_store::ProjectGraph;
use serde::Serialize;

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::state::AppState;

/// Stored rows plus the editor's node and edge shapes.
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    #[serde(flatten)]
    pub graph: ProjectGraph,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

/// GET /api/v1/projects/{id}/graph
pub async fn load(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> AppResult<Json<GraphResponse>> {
    let id = parse_id("project", &id)?;
    let graph = caller.client(&state).load_project_graph(id).await?;

    let dangling = graph.dangling_relationships().len();
    if dangling > 0 {
        tracing::debug!(project_id = %id, dangling, "Skipping dangling relationships");
    }

    Ok(Json(GraphResponse {
        nodes: graph.flow_nodes(),
        edges: graph.flow_edges(),
        graph,
    }))
}
