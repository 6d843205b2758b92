//! Repository for the `projects` table.

use mechgraph_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{NewProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image_url, user_id, created_at, updated_at";

/// Provides CRUD operations for projects, scoped to the owning user.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner: DbId,
        input: &NewProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, image_url, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(owner)
            .fetch_one(pool)
            .await
    }

    /// List the viewer's projects, most recently modified first.
    pub async fn list(pool: &PgPool, viewer: Option<DbId>) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE user_id = $1
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(viewer)
            .fetch_all(pool)
            .await
    }

    /// Find a project by id. Absent and invisible rows both yield `None`.
    pub async fn find_by_id(
        pool: &PgPool,
        viewer: Option<DbId>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(viewer)
            .fetch_optional(pool)
            .await
    }

    /// Update a project. Only supplied fields in `input` are applied.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = CASE WHEN $4 THEN $5::text ELSE description END,
                image_url = CASE WHEN $6 THEN $7::text ELSE image_url END
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(viewer)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.image_url.is_some())
            .bind(input.image_url.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a project (mechanics and relationships cascade).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, viewer: Option<DbId>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(viewer)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
