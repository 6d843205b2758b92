//! The access-layer client.
//!
//! One method per operation. Each method performs a single backend request
//! bounded by the client's call timeout and its cancellation token, and
//! reports every failure to `tracing` and to the optional [`ErrorHook`]
//! before returning it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mechgraph_core::error::CoreError;
use mechgraph_core::mechanic::{
    collapse_positions, resolve_relationship_type, validate_mechanic_name, validate_position,
    MechanicPosition,
};
use mechgraph_core::project::validate_project_name;
use mechgraph_core::types::DbId;
use mechgraph_db::models::mechanic::{GameMechanic, NewMechanic, UpdateMechanic};
use mechgraph_db::models::project::{NewProject, Project, UpdateProject};
use mechgraph_db::models::relationship::MechanicRelationship;
use tokio_util::sync::CancellationToken;

use crate::backend::GraphStore;
use crate::error::{BackendError, BackendResult, StoreError, StoreResult};
use crate::graph::ProjectGraph;
use crate::session::Session;

/// Default upper bound on a single store call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Diagnostic side channel invoked with every failure before it is returned.
pub type ErrorHook = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Cheaply cloneable handle to the store, bound to one caller.
#[derive(Clone)]
pub struct StoreClient {
    store: Arc<dyn GraphStore>,
    session: Option<Session>,
    call_timeout: Duration,
    cancel: CancellationToken,
    error_hook: Option<ErrorHook>,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("session", &self.session)
            .field("call_timeout", &self.call_timeout)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("error_hook", &self.error_hook.is_some())
            .finish()
    }
}

impl StoreClient {
    /// An anonymous client with the default timeout and a fresh token.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            session: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            cancel: CancellationToken::new(),
            error_hook: None,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Calls in flight when `cancel` fires fail with [`BackendError::Cancelled`];
    /// later calls fail immediately.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = Some(hook);
        self
    }

    pub fn session(&self) -> Option<Session> {
        self.session
    }

    fn viewer(&self) -> Option<DbId> {
        self.session.map(|s| s.user_id)
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    /// Run one backend request under the timeout and cancellation token.
    async fn call<T, F>(&self, operation: &'static str, request: F) -> StoreResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        tracing::debug!(operation, "Store call");
        let outcome = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(BackendError::Cancelled),
            result = tokio::time::timeout(self.call_timeout, request) => {
                result.unwrap_or(Err(BackendError::TimedOut(self.call_timeout)))
            }
        };
        outcome.map_err(|source| self.fail(StoreError::Operation { operation, source }))
    }

    /// Log `err`, hand it to the hook, and give it back for returning.
    fn fail(&self, err: StoreError) -> StoreError {
        tracing::warn!(kind = ?err.kind(), error = %err, "Store call failed");
        if let Some(hook) = &self.error_hook {
            hook(&err);
        }
        err
    }

    fn invalid(&self, operation: &'static str, err: CoreError) -> StoreError {
        self.fail(StoreError::Operation {
            operation,
            source: BackendError::Validation(err),
        })
    }

    fn missing(&self, entity: &'static str, id: DbId) -> StoreError {
        self.fail(StoreError::not_found(entity, id))
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Create a project owned by the session's user.
    pub async fn create_project(&self, input: &NewProject) -> StoreResult<Project> {
        let Some(session) = self.session else {
            return Err(self.fail(StoreError::AuthenticationRequired));
        };
        validate_project_name(&input.name).map_err(|e| self.invalid("create_project", e))?;

        self.call(
            "create_project",
            self.store.insert_project(session.user_id, input),
        )
        .await
    }

    /// Projects visible to the session, most recently modified first.
    pub async fn get_user_projects(&self) -> StoreResult<Vec<Project>> {
        self.call("get_user_projects", self.store.list_projects(self.viewer()))
            .await
    }

    pub async fn get_project(&self, id: DbId) -> StoreResult<Project> {
        self.call("get_project", self.store.find_project(self.viewer(), id))
            .await?
            .ok_or_else(|| self.missing("project", id))
    }

    /// Apply the supplied fields and return the updated row.
    pub async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Project> {
        if let Some(name) = &input.name {
            validate_project_name(name).map_err(|e| self.invalid("update_project", e))?;
        }
        self.call(
            "update_project",
            self.store.update_project(self.viewer(), id, input),
        )
        .await?
        .ok_or_else(|| self.missing("project", id))
    }

    /// Delete a project. Deleting a missing id succeeds.
    pub async fn delete_project(&self, id: DbId) -> StoreResult<()> {
        self.call("delete_project", self.store.delete_project(self.viewer(), id))
            .await
    }

    // -----------------------------------------------------------------------
    // Mechanics
    // -----------------------------------------------------------------------

    pub async fn create_mechanic(
        &self,
        project_id: DbId,
        input: &NewMechanic,
    ) -> StoreResult<GameMechanic> {
        validate_mechanic_name(&input.name)
            .and_then(|()| validate_position(input.position_x, input.position_y))
            .map_err(|e| self.invalid("create_mechanic", e))?;

        self.call(
            "create_mechanic",
            self.store.insert_mechanic(self.viewer(), project_id, input),
        )
        .await?
        .ok_or_else(|| self.missing("project", project_id))
    }

    /// A project's mechanics in creation order.
    pub async fn get_project_mechanics(&self, project_id: DbId) -> StoreResult<Vec<GameMechanic>> {
        self.call(
            "get_project_mechanics",
            self.store.list_mechanics(self.viewer(), project_id),
        )
        .await
    }

    pub async fn update_mechanic(
        &self,
        id: DbId,
        input: &UpdateMechanic,
    ) -> StoreResult<GameMechanic> {
        if let Some(name) = &input.name {
            validate_mechanic_name(name).map_err(|e| self.invalid("update_mechanic", e))?;
        }
        validate_position(
            input.position_x.unwrap_or_default(),
            input.position_y.unwrap_or_default(),
        )
        .map_err(|e| self.invalid("update_mechanic", e))?;

        self.call(
            "update_mechanic",
            self.store.update_mechanic(self.viewer(), id, input),
        )
        .await?
        .ok_or_else(|| self.missing("mechanic", id))
    }

    /// Delete a mechanic. Relationships referencing it are kept.
    pub async fn delete_mechanic(&self, id: DbId) -> StoreResult<()> {
        self.call("delete_mechanic", self.store.delete_mechanic(self.viewer(), id))
            .await
    }

    /// Persist a batch of canvas positions in one round trip.
    ///
    /// All-or-nothing: if any mechanic is unknown or not visible, no position
    /// changes. Repeated ids keep their last entry. An empty batch returns
    /// without contacting the store.
    pub async fn save_mechanic_positions(&self, positions: &[MechanicPosition]) -> StoreResult<()> {
        let batch = collapse_positions(positions)
            .map_err(|e| self.invalid("save_mechanic_positions", e))?;
        if batch.is_empty() {
            return Ok(());
        }

        self.call(
            "save_mechanic_positions",
            self.store.save_positions(self.viewer(), &batch),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Relationships
    // -----------------------------------------------------------------------

    /// Connect `source_id` to `target_id`. The label defaults to `"implements"`.
    pub async fn create_mechanic_relationship(
        &self,
        project_id: DbId,
        source_id: DbId,
        target_id: DbId,
        relationship_type: Option<&str>,
    ) -> StoreResult<MechanicRelationship> {
        let label = resolve_relationship_type(relationship_type)
            .map_err(|e| self.invalid("create_mechanic_relationship", e))?;

        self.call(
            "create_mechanic_relationship",
            self.store
                .insert_relationship(self.viewer(), project_id, source_id, target_id, &label),
        )
        .await?
        .ok_or_else(|| self.missing("project", project_id))
    }

    /// A project's relationships in creation order, dangling ones included.
    pub async fn get_project_mechanic_relationships(
        &self,
        project_id: DbId,
    ) -> StoreResult<Vec<MechanicRelationship>> {
        self.call(
            "get_project_mechanic_relationships",
            self.store.list_relationships(self.viewer(), project_id),
        )
        .await
    }

    pub async fn delete_mechanic_relationship(&self, id: DbId) -> StoreResult<()> {
        self.call(
            "delete_mechanic_relationship",
            self.store.delete_relationship(self.viewer(), id),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    /// Everything the graph editor needs for its initial render.
    pub async fn load_project_graph(&self, project_id: DbId) -> StoreResult<ProjectGraph> {
        let project = self.get_project(project_id).await?;
        let (mechanics, relationships) = tokio::try_join!(
            self.get_project_mechanics(project_id),
            self.get_project_mechanic_relationships(project_id),
        )?;
        Ok(ProjectGraph {
            project,
            mechanics,
            relationships,
        })
    }

    pub async fn health_check(&self) -> StoreResult<()> {
        self.call("health_check", self.store.ping()).await
    }
}
