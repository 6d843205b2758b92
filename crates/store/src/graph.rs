//! Graph editor adapter.
//!
//! Converts a project's mechanics and relationships into the node and edge
//! shapes the canvas editor renders, and converts dragged nodes back into a
//! position batch.

use std::collections::HashSet;

use mechgraph_core::error::CoreError;
use mechgraph_core::mechanic::{MechanicPosition, MechanicType};
use mechgraph_core::types::DbId;
use mechgraph_db::models::mechanic::GameMechanic;
use mechgraph_db::models::project::Project;
use mechgraph_db::models::relationship::MechanicRelationship;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node type the editor registers its mechanic renderer under.
pub const MECHANIC_NODE_TYPE: &str = "mechanic";

/// A project with everything drawn on its canvas.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectGraph {
    pub project: Project,
    pub mechanics: Vec<GameMechanic>,
    pub relationships: Vec<MechanicRelationship>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNodeData {
    pub label: String,
    pub description: String,
    pub mechanic_type: MechanicType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: FlowPosition,
    pub data: FlowNodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

impl ProjectGraph {
    /// One node per mechanic, in mechanic order.
    pub fn flow_nodes(&self) -> Vec<FlowNode> {
        self.mechanics
            .iter()
            .map(|m| FlowNode {
                id: m.id.to_string(),
                node_type: MECHANIC_NODE_TYPE.to_string(),
                position: FlowPosition {
                    x: m.position_x,
                    y: m.position_y,
                },
                data: FlowNodeData {
                    label: m.name.clone(),
                    description: m.description.clone(),
                    mechanic_type: m.mechanic_type,
                },
            })
            .collect()
    }

    /// One edge per relationship whose endpoints are both on the canvas.
    pub fn flow_edges(&self) -> Vec<FlowEdge> {
        let ids = self.mechanic_ids();
        self.relationships
            .iter()
            .filter(|r| connects(&ids, r))
            .map(|r| FlowEdge {
                id: r.id.to_string(),
                source: r.source_mechanic_id.to_string(),
                target: r.target_mechanic_id.to_string(),
                label: r.relationship_type.clone(),
            })
            .collect()
    }

    /// Relationships left behind by a deleted endpoint mechanic.
    pub fn dangling_relationships(&self) -> Vec<&MechanicRelationship> {
        let ids = self.mechanic_ids();
        self.relationships
            .iter()
            .filter(|r| !connects(&ids, r))
            .collect()
    }

    fn mechanic_ids(&self) -> HashSet<DbId> {
        self.mechanics.iter().map(|m| m.id).collect()
    }
}

fn connects(ids: &HashSet<DbId>, relationship: &MechanicRelationship) -> bool {
    ids.contains(&relationship.source_mechanic_id) && ids.contains(&relationship.target_mechanic_id)
}

/// Turn nodes reported by the editor after a drag into a position batch.
pub fn positions_from_flow_nodes(nodes: &[FlowNode]) -> Result<Vec<MechanicPosition>, CoreError> {
    nodes
        .iter()
        .map(|node| {
            let id = Uuid::parse_str(&node.id).map_err(|_| {
                CoreError::Validation(format!("Node id '{}' is not a mechanic id", node.id))
            })?;
            Ok(MechanicPosition {
                id,
                x: node.position.x,
                y: node.position.y,
            })
        })
        .collect()
}
