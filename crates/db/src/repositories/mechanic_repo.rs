//! Repository for the `game_mechanics` table.

use mechgraph_core::mechanic::MechanicPosition;
use mechgraph_core::types::DbId;
use sqlx::PgPool;

use crate::models::mechanic::{GameMechanic, NewMechanic, UpdateMechanic};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, name, description, type, position_x, position_y, created_at, updated_at";

/// Row filter: the mechanic's project is owned by the viewer (`$2`).
const VISIBLE: &str =
    "EXISTS (SELECT 1 FROM projects p WHERE p.id = m.project_id AND p.user_id = $2)";

/// Provides CRUD operations and the bulk position save for mechanics.
pub struct MechanicRepo;

impl MechanicRepo {
    /// Insert a mechanic into a project visible to `viewer`.
    ///
    /// Returns `None` (and writes nothing) if the project is absent or not
    /// visible.
    pub async fn create(
        pool: &PgPool,
        viewer: Option<DbId>,
        project_id: DbId,
        input: &NewMechanic,
    ) -> Result<Option<GameMechanic>, sqlx::Error> {
        let query = format!(
            "INSERT INTO game_mechanics (project_id, name, description, type, position_x, position_y)
             SELECT p.id, $3::text, $4::text, $5::text, $6::float8, $7::float8
             FROM projects p
             WHERE p.id = $1 AND p.user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GameMechanic>(&query)
            .bind(project_id)
            .bind(viewer)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.mechanic_type.as_db_value())
            .bind(input.position_x)
            .bind(input.position_y)
            .fetch_optional(pool)
            .await
    }

    /// List a project's mechanics in creation order.
    pub async fn list_by_project(
        pool: &PgPool,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> Result<Vec<GameMechanic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM game_mechanics m
             WHERE m.project_id = $1 AND {VISIBLE}
             ORDER BY m.created_at ASC, m.id ASC"
        );
        sqlx::query_as::<_, GameMechanic>(&query)
            .bind(project_id)
            .bind(viewer)
            .fetch_all(pool)
            .await
    }

    /// Update a mechanic. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateMechanic,
    ) -> Result<Option<GameMechanic>, sqlx::Error> {
        let query = format!(
            "UPDATE game_mechanics m SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                type = COALESCE($5, type),
                position_x = COALESCE($6, position_x),
                position_y = COALESCE($7, position_y)
             WHERE m.id = $1 AND {VISIBLE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GameMechanic>(&query)
            .bind(id)
            .bind(viewer)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.mechanic_type.map(|t| t.as_db_value()))
            .bind(input.position_x)
            .bind(input.position_y)
            .fetch_optional(pool)
            .await
    }

    /// Delete a mechanic. Relationships that reference it are left in place.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, viewer: Option<DbId>, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM game_mechanics m WHERE m.id = $1 AND {VISIBLE}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(viewer)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write every position of the batch in a single statement.
    ///
    /// The batch must not repeat ids. Runs in one transaction that is only
    /// committed when every listed mechanic was visible and updated; otherwise
    /// it is rolled back and `false` is returned with no position changed.
    pub async fn save_positions(
        pool: &PgPool,
        viewer: Option<DbId>,
        positions: &[MechanicPosition],
    ) -> Result<bool, sqlx::Error> {
        let ids: Vec<DbId> = positions.iter().map(|p| p.id).collect();
        let xs: Vec<f64> = positions.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = positions.iter().map(|p| p.y).collect();

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE game_mechanics m SET
                position_x = v.pos_x,
                position_y = v.pos_y
             FROM UNNEST($1::uuid[], $3::float8[], $4::float8[]) AS v(pos_id, pos_x, pos_y)
             WHERE m.id = v.pos_id AND {VISIBLE}"
        );
        let result = sqlx::query(&query)
            .bind(&ids)
            .bind(viewer)
            .bind(&xs)
            .bind(&ys)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() != ids.len() as u64 {
            tracing::debug!(
                expected = ids.len(),
                updated = result.rows_affected(),
                "Position batch touched unknown mechanics, rolling back"
            );
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
