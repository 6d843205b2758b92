//! In-process backend holding the three tables in memory.
//!
//! Mirrors the Postgres schema rules: owner-scoped visibility, the name and
//! type checks, project deletion cascading to mechanics and relationships,
//! mechanic deletion leaving relationships alone, and all-or-nothing position
//! batches. Used by the test suites and for running the API without a
//! database (`STORE_URL=memory://`).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mechgraph_core::mechanic::{validate_mechanic_name, MechanicPosition};
use mechgraph_core::project::validate_project_name;
use mechgraph_core::types::{DbId, Timestamp};
use mechgraph_db::models::mechanic::{GameMechanic, NewMechanic, UpdateMechanic};
use mechgraph_db::models::project::{NewProject, Project, UpdateProject};
use mechgraph_db::models::relationship::MechanicRelationship;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::GraphStore;
use crate::error::{BackendError, BackendResult, ENDPOINT_OUTSIDE_PROJECT, UNKNOWN_MECHANIC};

#[derive(Debug, Default)]
struct Tables {
    projects: HashMap<DbId, Project>,
    mechanics: HashMap<DbId, GameMechanic>,
    relationships: HashMap<DbId, MechanicRelationship>,
    last_timestamp: Option<Timestamp>,
}

impl Tables {
    /// Strictly increasing clock so ordering by timestamp is deterministic.
    fn tick(&mut self) -> Timestamp {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }

    fn project_visible(&self, viewer: Option<DbId>, project_id: DbId) -> bool {
        match (viewer, self.projects.get(&project_id)) {
            (Some(viewer), Some(project)) => project.user_id == viewer,
            _ => false,
        }
    }

    fn mechanic_visible(&self, viewer: Option<DbId>, id: DbId) -> bool {
        self.mechanics
            .get(&id)
            .is_some_and(|m| self.project_visible(viewer, m.project_id))
    }
}

#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    tables: RwLock<Tables>,
    latency: Option<Duration>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every request by `latency`, imitating a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn ping(&self) -> BackendResult<()> {
        self.round_trip().await;
        Ok(())
    }

    async fn insert_project(&self, owner: DbId, input: &NewProject) -> BackendResult<Project> {
        self.round_trip().await;
        validate_project_name(&input.name)?;

        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn list_projects(&self, viewer: Option<DbId>) -> BackendResult<Vec<Project>> {
        self.round_trip().await;
        let Some(viewer) = viewer else {
            return Ok(Vec::new());
        };

        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| p.user_id == viewer)
            .cloned()
            .collect();
        projects.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(projects)
    }

    async fn find_project(
        &self,
        viewer: Option<DbId>,
        id: DbId,
    ) -> BackendResult<Option<Project>> {
        self.round_trip().await;
        let tables = self.tables.read().await;
        if !tables.project_visible(viewer, id) {
            return Ok(None);
        }
        Ok(tables.projects.get(&id).cloned())
    }

    async fn update_project(
        &self,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateProject,
    ) -> BackendResult<Option<Project>> {
        self.round_trip().await;
        if let Some(name) = &input.name {
            validate_project_name(name)?;
        }

        let mut tables = self.tables.write().await;
        if !tables.project_visible(viewer, id) {
            return Ok(None);
        }
        let now = tables.tick();
        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = description.clone();
        }
        if let Some(image_url) = &input.image_url {
            project.image_url = image_url.clone();
        }
        project.updated_at = now;
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()> {
        self.round_trip().await;
        let mut tables = self.tables.write().await;
        if !tables.project_visible(viewer, id) {
            return Ok(());
        }
        tables.projects.remove(&id);
        tables.mechanics.retain(|_, m| m.project_id != id);
        tables.relationships.retain(|_, r| r.project_id != id);
        Ok(())
    }

    async fn insert_mechanic(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
        input: &NewMechanic,
    ) -> BackendResult<Option<GameMechanic>> {
        self.round_trip().await;
        validate_mechanic_name(&input.name)?;

        let mut tables = self.tables.write().await;
        if !tables.project_visible(viewer, project_id) {
            return Ok(None);
        }
        let now = tables.tick();
        let mechanic = GameMechanic {
            id: Uuid::new_v4(),
            project_id,
            name: input.name.clone(),
            description: input.description.clone(),
            mechanic_type: input.mechanic_type,
            position_x: input.position_x,
            position_y: input.position_y,
            created_at: now,
            updated_at: now,
        };
        tables.mechanics.insert(mechanic.id, mechanic.clone());
        Ok(Some(mechanic))
    }

    async fn list_mechanics(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> BackendResult<Vec<GameMechanic>> {
        self.round_trip().await;
        let tables = self.tables.read().await;
        if !tables.project_visible(viewer, project_id) {
            return Ok(Vec::new());
        }
        let mut mechanics: Vec<GameMechanic> = tables
            .mechanics
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        mechanics.sort_by_key(|m| (m.created_at, m.id));
        Ok(mechanics)
    }

    async fn update_mechanic(
        &self,
        viewer: Option<DbId>,
        id: DbId,
        input: &UpdateMechanic,
    ) -> BackendResult<Option<GameMechanic>> {
        self.round_trip().await;
        if let Some(name) = &input.name {
            validate_mechanic_name(name)?;
        }

        let mut tables = self.tables.write().await;
        if !tables.mechanic_visible(viewer, id) {
            return Ok(None);
        }
        let now = tables.tick();
        let Some(mechanic) = tables.mechanics.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            mechanic.name = name.clone();
        }
        if let Some(description) = &input.description {
            mechanic.description = description.clone();
        }
        if let Some(mechanic_type) = input.mechanic_type {
            mechanic.mechanic_type = mechanic_type;
        }
        if let Some(x) = input.position_x {
            mechanic.position_x = x;
        }
        if let Some(y) = input.position_y {
            mechanic.position_y = y;
        }
        mechanic.updated_at = now;
        Ok(Some(mechanic.clone()))
    }

    async fn delete_mechanic(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()> {
        self.round_trip().await;
        let mut tables = self.tables.write().await;
        if tables.mechanic_visible(viewer, id) {
            tables.mechanics.remove(&id);
        }
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
        self.round_trip().await;
        let mut tables = self.tables.write().await;
        if !tables.project_visible(viewer, project_id) {
            return Ok(None);
        }

        let in_project = |id: &DbId| {
            tables
                .mechanics
                .get(id)
                .is_some_and(|m| m.project_id == project_id)
        };
        if !in_project(&source_id) || !in_project(&target_id) {
            return Err(BackendError::rejected(
                ENDPOINT_OUTSIDE_PROJECT,
                format!(
                    "Mechanics {source_id} and {target_id} must both belong to project {project_id}"
                ),
            ));
        }

        let now = tables.tick();
        let relationship = MechanicRelationship {
            id: Uuid::new_v4(),
            project_id,
            source_mechanic_id: source_id,
            target_mechanic_id: target_id,
            relationship_type: relationship_type.to_string(),
            created_at: now,
        };
        tables
            .relationships
            .insert(relationship.id, relationship.clone());
        Ok(Some(relationship))
    }

    async fn list_relationships(
        &self,
        viewer: Option<DbId>,
        project_id: DbId,
    ) -> BackendResult<Vec<MechanicRelationship>> {
        self.round_trip().await;
        let tables = self.tables.read().await;
        if !tables.project_visible(viewer, project_id) {
            return Ok(Vec::new());
        }
        let mut relationships: Vec<MechanicRelationship> = tables
            .relationships
            .values()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect();
        relationships.sort_by_key(|r| (r.created_at, r.id));
        Ok(relationships)
    }

    async fn delete_relationship(&self, viewer: Option<DbId>, id: DbId) -> BackendResult<()> {
        self.round_trip().await;
        let mut tables = self.tables.write().await;
        let visible = tables
            .relationships
            .get(&id)
            .is_some_and(|r| tables.project_visible(viewer, r.project_id));
        if visible {
            tables.relationships.remove(&id);
        }
        Ok(())
    }

    async fn save_positions(
        &self,
        viewer: Option<DbId>,
        positions: &[MechanicPosition],
    ) -> BackendResult<()> {
        self.round_trip().await;
        let mut tables = self.tables.write().await;

        let missing: Vec<String> = positions
            .iter()
            .filter(|p| !tables.mechanic_visible(viewer, p.id))
            .map(|p| p.id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BackendError::rejected(
                UNKNOWN_MECHANIC,
                format!("Unknown mechanics in position batch: {}", missing.join(", ")),
            ));
        }

        let now = tables.tick();
        for position in positions {
            if let Some(mechanic) = tables.mechanics.get_mut(&position.id) {
                mechanic.position_x = position.x;
                mechanic.position_y = position.y;
                mechanic.updated_at = now;
            }
        }
        Ok(())
    }
}
