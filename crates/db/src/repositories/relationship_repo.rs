//! Repository for the `mechanic_relationships` table.

use mechgraph_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::MechanicRelationship;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, source_mechanic_id, target_mechanic_id, relationship_type, created_at";

/// Row filter: the relationship's project is owned by the viewer (`$2`).
const VISIBLE: &str =
    "EXISTS (SELECT 1 FROM projects p WHERE p.id = r.project_id AND p.user_id = $2)";

/// Provides create/list/delete for relationships between mechanics.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a relationship between two mechanics of the same visible project.
    ///
    /// Returns `None` (and writes nothing) if the project is not visible or
    /// either endpoint is not a mechanic of that project.
    pub async fn create(
        pool: &PgPool,
        viewer: Option<DbId>,
        project_id: DbId,
        source_id: DbId,
        target_id: DbId,
        relationship_type: &str,
    ) -> Result<Option<MechanicRelationship>, sqlx::Error> {
        let query = format!(
            "INSERT INTO mechanic_relationships
                (project_id, source_mechanic_id, target_mechanic_id, relationship_type)
             SELECT p.id, $3::uuid, $4::uuid, $5::text
             FROM projects p
             WHERE p.id = $1 AND p.user_id = $2
               AND EXISTS (SELECT 1 FROM game_mechanics s WHERE s.id = $3 AND s.project_id = p.id)
               AND EXISTS (SELECT 1 FROM game_mechanics t WHERE t.id = $4 AND t.project_id = p.id)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MechanicRelationship>(&query)
            .bind(project_id)
            .bind(viewer)
            .bind(source_id)
            .bind(target_id)
            .bind(relationship_type)
            .fetch_optional(pool)
            .await
    }

    /// List a project's relationships in creation order.
    pub async fn list_by_project(
        pool: &PgPool,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> Result<Vec<MechanicRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mechanic_relationships r
             WHERE r.project_id = $1 AND {VISIBLE}
             ORDER BY r.created_at ASC, r.id ASC"
        );
        sqlx::query_as::<_, MechanicRelationship>(&query)
            .bind(project_id)
            .bind(viewer)
            .fetch_all(pool)
            .await
    }

    /// Delete a relationship. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, viewer: Option<DbId>, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM mechanic_relationships r WHERE r.id = $1 AND {VISIBLE}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(viewer)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
