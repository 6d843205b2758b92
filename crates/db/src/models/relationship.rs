//! Directed, labelled edges between mechanics of one project.

use mechgraph_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mechanic_relationships` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MechanicRelationship {
    pub id: DbId,
    pub project_id: DbId,
    pub source_mechanic_id: DbId,
    pub target_mechanic_id: DbId,
    pub relationship_type: String,
    pub created_at: Timestamp,
}

/// DTO for creating a relationship. `relationship_type` defaults to
/// `"implements"` when omitted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewRelationship {
    pub source_mechanic_id: DbId,
    pub target_mechanic_id: DbId,
    pub relationship_type: Option<String>,
}
