//! Postgres backend built on the `mechgraph-db` repositories.

use async_trait::async_trait;
use mechgraph_core::mechanic::MechanicPosition;
use mechgraph_core::types::DbId;
use mechgraph_db::models::mechanic::{GameMechanic, NewMechanic, UpdateMechanic};
use mechgraph_db::models::project::{NewProject, Project, UpdateProject};
use mechgraph_db::models::relationship::MechanicRelationship;
use mechgraph_db::repositories::{MechanicRepo, ProjectRepo, RelationshipRepo};
use mechgraph_db::DbPool;

use crate::backend::GraphStore;
use crate::error::{BackendError, BackendResult, ENDPOINT_OUTSIDE_PROJECT, UNKNOWN_MECHANIC};

#[derive(Debug, Clone)]
pub struct PgGraphStore {
    pool: DbPool,
}

impl PgGraphStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl GraphStore for PgGraphStore {
    async fn ping(&self) -> BackendResult<()> {
        mechgraph_db::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_project(&self, owner: DbId, input: &NewProject) -> BackendResult<Project> {
        Ok(ProjectRepo::create(&self.pool, owner, input).await?)
    }

    async fn list_projects(&self, viewer: Option<DbId>) -> BackendResult<Vec<Project>> {
        Ok(ProjectRepo::list(&self.pool, viewer).await?)
    }

    async fn find_project(
        &self,
        viewer: Option<DbId>,
        id: DbId,
    ) -> BackendResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(&self.pool, viewer, id).await?)
    }

    async fn update_project(
        &self,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateProject,
    ) -> BackendResult<Option<Project>> {
        Ok(ProjectRepo::update(&self.pool, viewer, id, input).await?)
    }

    async fn delete_project(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()> {
        let deleted = ProjectRepo::delete(&self.pool, viewer, id).await?;
        tracing::debug!(project_id = %id, deleted, "Project delete");
        Ok(())
    }

    async fn insert_mechanic(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
        input: &NewMechanic,
    ) -> BackendResult<Option<GameMechanic>> {
        Ok(MechanicRepo::create(&self.pool, viewer, project_id, input).await?)
    }

    async fn list_mechanics(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> BackendResult<Vec<GameMechanic>> {
        Ok(MechanicRepo::list_by_project(&self.pool, viewer, project_id).await?)
    }

    async fn update_mechanic(
        &self,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateMechanic,
    ) -> BackendResult<Option<GameMechanic>> {
        Ok(MechanicRepo::update(&self.pool, viewer, id, input).await?)
    }

    async fn delete_mechanic(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()> {
        let deleted = MechanicRepo::delete(&self.pool, viewer, id).await?;
        tracing::debug!(mechanic_id = %id, deleted, "Mechanic delete");
        Ok(())
    }

    async fn insert_relationship(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
        source_id: DbId,
        target_id: DbId,
        relationship_type: &str,
    ) -> BackendResult<Option<MechanicRelationship>> {
        let created = RelationshipRepo::create(
            &self.pool,
            viewer,
            project_id,
            source_id,
            target_id,
            relationship_type,
        )
        .await?;
        if created.is_some() {
            return Ok(created);
        }

        // Nothing was inserted: tell an invisible project apart from bad endpoints.
        if ProjectRepo::find_by_id(&self.pool, viewer, project_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }
        Err(BackendError::rejected(
            ENDPOINT_OUTSIDE_PROJECT,
            format!(
                "Mechanics {source_id} and {target_id} must both belong to project {project_id}"
            ),
        ))
    }

    async fn list_relationships(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> BackendResult<Vec<MechanicRelationship>> {
        Ok(RelationshipRepo::list_by_project(&self.pool, viewer, project_id).await?)
    }

    async fn delete_relationship(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()> {
        let deleted = RelationshipRepo::delete(&self.pool, viewer, id).await?;
        tracing::debug!(relationship_id = %id, deleted, "Relationship delete");
        Ok(())
    }

    async fn save_positions(
        &self,
        viewer: Option<DbId>,
        positions: &[MechanicPosition],
    ) -> BackendResult<()> {
        if MechanicRepo::save_positions(&self.pool, viewer, positions).await? {
            Ok(())
        } else {
            Err(BackendError::rejected(
                UNKNOWN_MECHANIC,
                "Position batch references mechanics that do not exist or are not visible",
            ))
        }
    }
}
