//! The backend seam under [`StoreClient`](crate::StoreClient).
//!
//! Every method is one request against the store and is scoped to a viewer:
//! the optional user id whose projects are visible. `None` sees nothing.
//! Single-row writes and lookups return `Option`, leaving the client to turn
//! an empty result into a not-found.

use async_trait::async_trait;
use mechgraph_core::mechanic::MechanicPosition;
use mechgraph_core::types::DbId;
use mechgraph_db::models::mechanic::{GameMechanic, NewMechanic, UpdateMechanic};
use mechgraph_db::models::project::{NewProject, Project, UpdateProject};
use mechgraph_db::models::relationship::MechanicRelationship;

use crate::error::BackendResult;

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> BackendResult<()>;

    async fn insert_project(&self, owner: DbId, input: &NewProject) -> BackendResult<Project>;

    /// Visible projects, `updated_at` descending.
    async fn list_projects(&self, viewer: Option<DbId>) -> BackendResult<Vec<Project>>;

    async fn find_project(&self, viewer: Option<DbId>, id: DbId)
        -> BackendResult<Option<Project>>;

    async fn update_project(
        &self,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateProject,
    ) -> BackendResult<Option<Project>>;

    /// Succeeds whether or not a row was removed.
    async fn delete_project(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()>;

    /// `None` when the project is absent or not visible.
    async fn insert_mechanic(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
        input: &NewMechanic,
    ) -> BackendResult<Option<GameMechanic>>;

    /// A project's mechanics in creation order.
    async fn list_mechanics(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> BackendResult<Vec<GameMechanic>>;

    async fn update_mechanic(
        &self,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateMechanic,
    ) -> BackendResult<Option<GameMechanic>>;

    async fn delete_mechanic(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()>;

    /// `None` when the project is absent or not visible. Endpoints that are
    /// not mechanics of the project are rejected.
    async fn insert_relationship(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
        source_id: DbId,
        target_id: DbId,
        relationship_type: &str,
    ) -> BackendResult<Option<MechanicRelationship>>;

    /// A project's relationships in creation order.
    async fn list_relationships(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> BackendResult<Vec<MechanicRelationship>>;

    async fn delete_relationship(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()>;

    /// Apply every position or none. `positions` never repeats an id.
    async fn save_positions(
        &self,
        viewer: Option<DbId>,
        positions: &[MechanicPosition],
    ) -> BackendResult<()>;
}
