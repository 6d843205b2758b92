//! Access-layer behaviour exercised through `StoreClient` over the in-memory
//! backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use mechgraph_core::mechanic::{MechanicPosition, MechanicType};
use mechgraph_db::models::mechanic::{NewMechanic, UpdateMechanic};
use mechgraph_db::models::project::{NewProject, UpdateProject};
use mechgraph_store::error::{ENDPOINT_OUTSIDE_PROJECT, UNKNOWN_MECHANIC};
use mechgraph_store::{
    BackendError, ErrorKind, MemoryGraphStore, Session, StoreClient, StoreError,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn shared_store() -> Arc<MemoryGraphStore> {
    Arc::new(MemoryGraphStore::new())
}

fn client_for(store: &Arc<MemoryGraphStore>, user_id: Uuid) -> StoreClient {
    StoreClient::new(store.clone()).with_session(Session::new(user_id))
}

fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        image_url: Some(format!("https://img.example/{name}.png")),
    }
}

fn new_mechanic(name: &str, x: f64, y: f64) -> NewMechanic {
    NewMechanic {
        name: name.to_string(),
        description: String::new(),
        mechanic_type: MechanicType::General,
        position_x: x,
        position_y: y,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_project_echoes_input_and_sets_owner() {
    let store = shared_store();
    let user = Uuid::new_v4();
    let client = client_for(&store, user);

    let project = client.create_project(&new_project("Deckbuilder")).await.unwrap();

    assert_eq!(project.name, "Deckbuilder");
    assert_eq!(project.description.as_deref(), Some("Deckbuilder description"));
    assert_eq!(
        project.image_url.as_deref(),
        Some("https://img.example/Deckbuilder.png")
    );
    assert_eq!(project.user_id, user);
    assert_eq!(project.created_at, project.updated_at);
}

#[tokio::test]
async fn anonymous_create_requires_authentication_and_writes_nothing() {
    let store = shared_store();
    let anonymous = StoreClient::new(store.clone());

    let err = anonymous
        .create_project(&new_project("Ghost"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::AuthenticationRequired);
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);

    let owner = client_for(&store, Uuid::new_v4());
    assert!(owner.get_user_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn anonymous_create_checks_session_before_name() {
    let anonymous = StoreClient::new(shared_store());
    let err = anonymous.create_project(&new_project("  ")).await.unwrap_err();
    assert_matches!(err, StoreError::AuthenticationRequired);
}

#[tokio::test]
async fn blank_project_name_is_an_operation_error() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let err = client.create_project(&new_project("   ")).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Operation {
            operation: "create_project",
            source: BackendError::Validation(_),
        }
    );
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let missing = Uuid::new_v4();

    let err = client.get_project(missing).await.unwrap_err();
    assert_matches!(err, StoreError::NotFound { entity: "project", ref id } if *id == missing.to_string());
}

#[tokio::test]
async fn other_users_project_is_not_found() {
    let store = shared_store();
    let owner = client_for(&store, Uuid::new_v4());
    let stranger = client_for(&store, Uuid::new_v4());
    let project = owner.create_project(&new_project("Private")).await.unwrap();

    assert_matches!(
        stranger.get_project(project.id).await,
        Err(StoreError::NotFound { .. })
    );
    assert!(stranger.get_user_projects().await.unwrap().is_empty());
    assert_matches!(
        stranger
            .update_project(project.id, &UpdateProject::default())
            .await,
        Err(StoreError::NotFound { .. })
    );

    // A stranger's delete is a silent no-op.
    stranger.delete_project(project.id).await.unwrap();
    assert_eq!(owner.get_project(project.id).await.unwrap(), project);
}

#[tokio::test]
async fn projects_listed_most_recently_modified_first() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let p1 = client.create_project(&new_project("one")).await.unwrap();
    let p2 = client.create_project(&new_project("two")).await.unwrap();
    let p3 = client.create_project(&new_project("three")).await.unwrap();

    let ids: Vec<Uuid> = client
        .get_user_projects()
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![p3.id, p2.id, p1.id]);

    // Touching the oldest moves it to the front.
    let rename = UpdateProject {
        name: Some("one again".to_string()),
        ..Default::default()
    };
    client.update_project(p1.id, &rename).await.unwrap();
    let first = &client.get_user_projects().await.unwrap()[0];
    assert_eq!(first.id, p1.id);
}

#[tokio::test]
async fn update_name_leaves_other_fields_identical() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let before = client.create_project(&new_project("Draft")).await.unwrap();

    let after = client
        .update_project(
            before.id,
            &UpdateProject {
                name: Some("Final".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(after.name, "Final");
    assert_eq!(after.description, before.description);
    assert_eq!(after.image_url, before.image_url);
    assert_eq!(after.user_id, before.user_id);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn explicit_null_clears_description() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Clearable")).await.unwrap();

    let patch: UpdateProject = serde_json::from_str(r#"{"description": null}"#).unwrap();
    let updated = client.update_project(project.id, &patch).await.unwrap();

    assert_eq!(updated.description, None);
    assert_eq!(updated.image_url, project.image_url);
}

#[tokio::test]
async fn delete_project_is_idempotent_and_cascades() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Doomed")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();
    let b = client
        .create_mechanic(project.id, &new_mechanic("B", 0.0, 0.0))
        .await
        .unwrap();
    client
        .create_mechanic_relationship(project.id, a.id, b.id, None)
        .await
        .unwrap();

    client.delete_project(project.id).await.unwrap();
    client.delete_project(project.id).await.unwrap();

    assert_matches!(
        client.get_project(project.id).await,
        Err(StoreError::NotFound { .. })
    );
    assert_matches!(
        client.update_mechanic(a.id, &UpdateMechanic::default()).await,
        Err(StoreError::NotFound { entity: "mechanic", .. })
    );
}

// ---------------------------------------------------------------------------
// Mechanics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mechanics_listed_in_creation_order() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Ordered")).await.unwrap();

    let mut created = Vec::new();
    for name in ["first", "second", "third"] {
        let m = client
            .create_mechanic(project.id, &new_mechanic(name, 0.0, 0.0))
            .await
            .unwrap();
        created.push(m.id);
    }

    let listed: Vec<Uuid> = client
        .get_project_mechanics(project.id)
        .await
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn mechanic_in_invisible_project_is_not_found() {
    let store = shared_store();
    let owner = client_for(&store, Uuid::new_v4());
    let project = owner.create_project(&new_project("Mine")).await.unwrap();

    let stranger = client_for(&store, Uuid::new_v4());
    let err = stranger
        .create_mechanic(project.id, &new_mechanic("Sneaky", 0.0, 0.0))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::NotFound { entity: "project", .. });
    assert!(owner.get_project_mechanics(project.id).await.unwrap().is_empty());
    assert!(stranger
        .get_project_mechanics(project.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn non_finite_position_rejected() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Canvas")).await.unwrap();

    let err = client
        .create_mechanic(project.id, &new_mechanic("Bad", f64::NAN, 0.0))
        .await
        .unwrap_err();
    assert_matches!(
        err.backend(),
        Some(BackendError::Validation(_))
    );
}

#[tokio::test]
async fn update_mechanic_changes_only_supplied_fields() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Patchy")).await.unwrap();
    let mechanic = client
        .create_mechanic(project.id, &new_mechanic("Stamina", 5.0, 6.0))
        .await
        .unwrap();

    let updated = client
        .update_mechanic(
            mechanic.id,
            &UpdateMechanic {
                mechanic_type: Some(MechanicType::Specific),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.mechanic_type, MechanicType::Specific);
    assert_eq!(updated.name, "Stamina");
    assert_eq!((updated.position_x, updated.position_y), (5.0, 6.0));
}

#[tokio::test]
async fn save_positions_applies_every_entry() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Layout")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();
    let b = client
        .create_mechanic(project.id, &new_mechanic("B", 0.0, 0.0))
        .await
        .unwrap();

    client
        .save_mechanic_positions(&[
            MechanicPosition { id: a.id, x: 10.0, y: 20.0 },
            MechanicPosition { id: b.id, x: 30.0, y: 40.0 },
        ])
        .await
        .unwrap();

    let mechanics = client.get_project_mechanics(project.id).await.unwrap();
    assert_eq!((mechanics[0].position_x, mechanics[0].position_y), (10.0, 20.0));
    assert_eq!((mechanics[1].position_x, mechanics[1].position_y), (30.0, 40.0));
}

#[tokio::test]
async fn save_positions_with_unknown_id_changes_nothing() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Atomic")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 1.0, 2.0))
        .await
        .unwrap();

    let err = client
        .save_mechanic_positions(&[
            MechanicPosition { id: a.id, x: 100.0, y: 200.0 },
            MechanicPosition { id: Uuid::new_v4(), x: 0.0, y: 0.0 },
        ])
        .await
        .unwrap_err();
    assert_matches!(
        err,
        StoreError::Operation {
            source: BackendError::Rejected { code: UNKNOWN_MECHANIC, .. },
            ..
        }
    );

    let mechanics = client.get_project_mechanics(project.id).await.unwrap();
    assert_eq!((mechanics[0].position_x, mechanics[0].position_y), (1.0, 2.0));
}

#[tokio::test]
async fn save_positions_rejects_other_users_mechanics() {
    let store = shared_store();
    let owner = client_for(&store, Uuid::new_v4());
    let project = owner.create_project(&new_project("Owned")).await.unwrap();
    let mechanic = owner
        .create_mechanic(project.id, &new_mechanic("A", 1.0, 1.0))
        .await
        .unwrap();

    let stranger = client_for(&store, Uuid::new_v4());
    let err = stranger
        .save_mechanic_positions(&[MechanicPosition { id: mechanic.id, x: 9.0, y: 9.0 }])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreOperation);

    let unchanged = &owner.get_project_mechanics(project.id).await.unwrap()[0];
    assert_eq!((unchanged.position_x, unchanged.position_y), (1.0, 1.0));
}

#[tokio::test]
async fn repeated_ids_keep_last_position() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Jitter")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();

    client
        .save_mechanic_positions(&[
            MechanicPosition { id: a.id, x: 1.0, y: 1.0 },
            MechanicPosition { id: a.id, x: 2.0, y: 3.0 },
        ])
        .await
        .unwrap();

    let saved = &client.get_project_mechanics(project.id).await.unwrap()[0];
    assert_eq!((saved.position_x, saved.position_y), (2.0, 3.0));
}

#[tokio::test]
async fn empty_position_batch_is_a_no_op() {
    // Anonymous and cancelled: succeeds only because nothing is sent.
    let cancel = CancellationToken::new();
    cancel.cancel();
    let client = StoreClient::new(shared_store()).with_cancellation(cancel);
    client.save_mechanic_positions(&[]).await.unwrap();
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

#[tokio::test]
async fn relationship_defaults_to_implements() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Linked")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();
    let b = client
        .create_mechanic(project.id, &new_mechanic("B", 0.0, 0.0))
        .await
        .unwrap();

    let created = client
        .create_mechanic_relationship(project.id, a.id, b.id, None)
        .await
        .unwrap();
    let labelled = client
        .create_mechanic_relationship(project.id, b.id, a.id, Some("counters"))
        .await
        .unwrap();

    assert_eq!(created.relationship_type, "implements");
    assert_eq!(created.source_mechanic_id, a.id);
    assert_eq!(created.target_mechanic_id, b.id);

    let listed = client
        .get_project_mechanic_relationships(project.id)
        .await
        .unwrap();
    assert_eq!(listed, vec![created.clone(), labelled]);

    client.delete_mechanic_relationship(created.id).await.unwrap();
    client.delete_mechanic_relationship(created.id).await.unwrap();
    let remaining = client
        .get_project_mechanic_relationships(project.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].relationship_type, "counters");
}

#[tokio::test]
async fn relationship_label_round_trips_unchanged() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Padded")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();
    let b = client
        .create_mechanic(project.id, &new_mechanic("B", 0.0, 0.0))
        .await
        .unwrap();

    let created = client
        .create_mechanic_relationship(project.id, a.id, b.id, Some(" counters "))
        .await
        .unwrap();
    assert_eq!(created.relationship_type, " counters ");

    let listed = client
        .get_project_mechanic_relationships(project.id)
        .await
        .unwrap();
    assert_eq!(listed[0].relationship_type, " counters ");

    let err = client
        .create_mechanic_relationship(project.id, a.id, b.id, Some("  "))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        StoreError::Operation {
            source: BackendError::Validation(_),
            ..
        }
    );
}

#[tokio::test]
async fn relationship_across_projects_rejected() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let left = client.create_project(&new_project("Left")).await.unwrap();
    let right = client.create_project(&new_project("Right")).await.unwrap();
    let a = client
        .create_mechanic(left.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();
    let b = client
        .create_mechanic(right.id, &new_mechanic("B", 0.0, 0.0))
        .await
        .unwrap();

    let err = client
        .create_mechanic_relationship(left.id, a.id, b.id, None)
        .await
        .unwrap_err();
    assert_matches!(
        err.backend(),
        Some(BackendError::Rejected { code: ENDPOINT_OUTSIDE_PROJECT, .. })
    );
}

#[tokio::test]
async fn deleting_mechanic_leaves_relationships_dangling() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    let project = client.create_project(&new_project("Dangling")).await.unwrap();
    let a = client
        .create_mechanic(project.id, &new_mechanic("A", 0.0, 0.0))
        .await
        .unwrap();
    let b = client
        .create_mechanic(project.id, &new_mechanic("B", 0.0, 0.0))
        .await
        .unwrap();
    let edge = client
        .create_mechanic_relationship(project.id, a.id, b.id, None)
        .await
        .unwrap();

    client.delete_mechanic(b.id).await.unwrap();

    let relationships = client
        .get_project_mechanic_relationships(project.id)
        .await
        .unwrap();
    assert_eq!(relationships, vec![edge.clone()]);

    let graph = client.load_project_graph(project.id).await.unwrap();
    assert_eq!(graph.mechanics.len(), 1);
    assert!(graph.flow_edges().is_empty());
    assert_eq!(graph.dangling_relationships()[0].id, edge.id);
}

#[tokio::test]
async fn load_project_graph_for_unknown_project_is_not_found() {
    let client = client_for(&shared_store(), Uuid::new_v4());
    assert_matches!(
        client.load_project_graph(Uuid::new_v4()).await,
        Err(StoreError::NotFound { entity: "project", .. })
    );
}

// ---------------------------------------------------------------------------
// Timeouts, cancellation and the diagnostic hook
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_backend_times_out() {
    let store = Arc::new(MemoryGraphStore::new().with_latency(Duration::from_millis(500)));
    let client = StoreClient::new(store).with_timeout(Duration::from_millis(20));

    let err = client.get_user_projects().await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Operation {
            operation: "get_user_projects",
            source: BackendError::TimedOut(_),
        }
    );
}

#[tokio::test]
async fn cancelled_token_fails_calls() {
    let cancel = CancellationToken::new();
    let client = client_for(&shared_store(), Uuid::new_v4()).with_cancellation(cancel.clone());
    cancel.cancel();

    let err = client.get_user_projects().await.unwrap_err();
    assert_matches!(err.backend(), Some(BackendError::Cancelled));
}

#[tokio::test]
async fn cancellation_interrupts_in_flight_call() {
    let store = Arc::new(MemoryGraphStore::new().with_latency(Duration::from_millis(500)));
    let cancel = CancellationToken::new();
    let client = StoreClient::new(store)
        .with_session(Session::new(Uuid::new_v4()))
        .with_cancellation(cancel.clone());

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let err = client.health_check().await.unwrap_err();
    assert_matches!(err.backend(), Some(BackendError::Cancelled));
    trigger.await.unwrap();
}

#[tokio::test]
async fn error_hook_sees_every_failure() {
    let seen: Arc<Mutex<Vec<ErrorKind>>> = Arc::default();
    let sink = seen.clone();
    let store = shared_store();
    let client = StoreClient::new(store.clone()).with_error_hook(Arc::new(move |err: &StoreError| {
        sink.lock().unwrap().push(err.kind());
    }));

    let _ = client.create_project(&new_project("Anon")).await;
    let _ = client.get_project(Uuid::new_v4()).await;
    client.get_user_projects().await.unwrap();

    let owned = client_for(&store, Uuid::new_v4()).with_error_hook(Arc::new({
        let sink = seen.clone();
        move |err: &StoreError| sink.lock().unwrap().push(err.kind())
    }));
    let _ = owned.create_project(&new_project("")).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ErrorKind::AuthenticationRequired,
            ErrorKind::NotFound,
            ErrorKind::StoreOperation,
        ]
    );
}

#[tokio::test]
async fn health_check_succeeds() {
    StoreClient::new(shared_store()).health_check().await.unwrap();
}
