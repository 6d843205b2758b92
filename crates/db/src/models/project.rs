//! Project entity model and DTOs.

use mechgraph_core::patch::double_option;
use mechgraph_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Owner. Set from the session at creation and never changed.
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. The owner comes from the session.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// DTO for updating an existing project. Absent fields are left untouched.
///
/// `description` and `image_url` distinguish "absent" (`None`) from an
/// explicit `null` (`Some(None)`), which clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}
