//! Game mechanic entity model and DTOs.

use mechgraph_core::mechanic::MechanicType;
use mechgraph_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `game_mechanics` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GameMechanic {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub mechanic_type: MechanicType,
    pub position_x: f64,
    pub position_y: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a mechanic inside a project.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewMechanic {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub mechanic_type: MechanicType,
    #[serde(default)]
    pub position_x: f64,
    #[serde(default)]
    pub position_y: f64,
}

/// DTO for updating a mechanic. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMechanic {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub mechanic_type: Option<MechanicType>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}
