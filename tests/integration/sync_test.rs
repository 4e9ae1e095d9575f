//! Integration tests for signed-in mutations against the remote store.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use dataroom_core::error::ErrorKind;
use dataroom_core::traits::RemoteStore;
use dataroom_core::types::Collection;
use dataroom_entity::Preferences;
use dataroom_service::hierarchy::verify_invariants;

use helpers::{TestWorkspace, UndeletableCache, pdf};

#[tokio::test]
async fn test_create_room_writes_room_and_root() {
    let mut ws = TestWorkspace::signed_in().await;

    let created = ws.coordinator.create_room("Acme").await.unwrap();

    assert_eq!(ws.remote.document_count(ws.user, Collection::Rooms), 1);
    assert_eq!(ws.remote.document_count(ws.user, Collection::Folders), 1);
    let root = ws
        .remote
        .document(ws.user, Collection::Folders, created.root_folder_id.into_uuid())
        .unwrap();
    assert_eq!(root["name"], "All documents");

    ws.settle().await;
    let snapshot = ws.coordinator.snapshot();
    assert_eq!(snapshot.active_room_id, Some(created.room_id));
    assert_eq!(snapshot.active_folder_id, Some(created.root_folder_id));
    assert!(verify_invariants(&snapshot, ws.coordinator.engine().policy()).is_ok());
}

#[tokio::test]
async fn test_feed_echo_converges_to_local_state() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let legal = ws
        .coordinator
        .create_folder(created.root_folder_id, "Legal")
        .await
        .unwrap();
    ws.coordinator.rename_folder(legal, "Contracts").await.unwrap();
    let local = ws.coordinator.snapshot();

    ws.settle().await;
    assert_eq!(*ws.coordinator.snapshot(), *local);
}

#[tokio::test]
async fn test_failed_write_leaves_snapshot_untouched() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let legal = ws
        .coordinator
        .create_folder(created.root_folder_id, "Legal")
        .await
        .unwrap();
    ws.settle().await;
    let before = ws.coordinator.snapshot();

    ws.remote.fail_next_writes(1);
    let err = ws.coordinator.rename_folder(legal, "Finance").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteWrite);
    assert!(Arc::ptr_eq(&before, &ws.coordinator.snapshot()));
    let remote_name = ws
        .remote
        .document(ws.user, Collection::Folders, legal.into_uuid())
        .map(|doc| doc["name"].clone());
    assert_eq!(remote_name, Some(serde_json::json!("Legal")));
}

#[tokio::test]
async fn test_partial_write_failure_is_reported_with_counts() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let before = ws.coordinator.snapshot();

    ws.remote.fail_next_writes(1);
    let err = ws
        .coordinator
        .create_folder(created.root_folder_id, "Legal")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteWrite);
    assert!(err.message.contains("1 of 2 remote writes failed"));
    assert!(Arc::ptr_eq(&before, &ws.coordinator.snapshot()));
}

#[tokio::test]
async fn test_unavailable_remote_rejects_mutations() {
    let mut ws = TestWorkspace::signed_in().await;
    ws.remote.set_available(false);

    let err = ws.coordinator.create_room("Acme").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RemoteWrite);
    assert!(ws.coordinator.snapshot().is_empty());
}

#[tokio::test]
async fn test_selection_is_stored_as_preferences() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let legal = ws
        .coordinator
        .create_folder(created.root_folder_id, "Legal")
        .await
        .unwrap();
    let writes = ws.remote.writes_applied();

    ws.coordinator.select_folder(legal).await.unwrap();

    assert_eq!(ws.remote.writes_applied(), writes);
    let doc = ws.remote.get_preferences(ws.user).await.unwrap().unwrap();
    let stored: Preferences = serde_json::from_value(doc).unwrap();
    assert_eq!(stored.active_room_id, Some(created.room_id));
    assert_eq!(stored.active_folder_id, Some(legal));
}

#[tokio::test]
async fn test_delete_folder_removes_remote_documents_and_content() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let legal = ws
        .coordinator
        .create_folder(created.root_folder_id, "Legal")
        .await
        .unwrap();
    let uploaded = ws
        .coordinator
        .upload_files(legal, vec![("nda.pdf".to_string(), pdf("nda"))])
        .await
        .unwrap();
    let file_id = uploaded.created[0];
    assert!(ws.coordinator.read_content(file_id).await.unwrap().is_some());

    let outcome = ws.coordinator.delete_folder(legal).await.unwrap();

    assert!(outcome.removed_file_ids.contains(&file_id));
    assert_eq!(ws.remote.document_count(ws.user, Collection::Files), 0);
    assert_eq!(ws.remote.document_count(ws.user, Collection::Folders), 1);
    let cached = ws
        .cache
        .read(ws.coordinator.owner(), file_id)
        .await
        .unwrap();
    assert!(cached.is_none());
}

#[tokio::test]
async fn test_content_cleanup_failure_does_not_block_delete() {
    let mut ws = TestWorkspace::with_cache(Arc::new(UndeletableCache::new()));
    ws.sign_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let uploaded = ws
        .coordinator
        .upload_files(
            created.root_folder_id,
            vec![("a.pdf".to_string(), pdf("a")), ("b.pdf".to_string(), pdf("b"))],
        )
        .await
        .unwrap();

    let outcome = ws.coordinator.delete_room(created.room_id).await.unwrap();

    assert_eq!(outcome.removed_file_ids.len(), uploaded.created.len());
    assert!(ws.coordinator.snapshot().is_empty());
    assert_eq!(ws.remote.document_count(ws.user, Collection::Files), 0);
    assert_eq!(ws.remote.document_count(ws.user, Collection::Rooms), 0);
}

#[tokio::test]
async fn test_failed_upload_metadata_discards_cached_content() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();

    ws.remote.fail_next_writes(1);
    let err = ws
        .coordinator
        .upload_files(created.root_folder_id, vec![("deck.pdf".to_string(), pdf("x"))])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RemoteWrite);
    let cached = ws
        .cache
        .list_all(ws.coordinator.owner())
        .await
        .unwrap();
    assert!(cached.is_empty());
}

#[tokio::test]
async fn test_each_echo_keeps_the_committed_state() {
    let mut ws = TestWorkspace::signed_in().await;
    ws.coordinator.create_room("Alpha").await.unwrap();
    let beta = ws.coordinator.create_room("Beta").await.unwrap();
    let legal = ws
        .coordinator
        .create_folder(beta.root_folder_id, "Legal")
        .await
        .unwrap();
    ws.coordinator
        .upload_files(legal, vec![("nda.pdf".to_string(), pdf("nda"))])
        .await
        .unwrap();
    ws.coordinator.select_folder(legal).await.unwrap();
    let committed = ws.coordinator.snapshot();
    let policy = ws.coordinator.engine().policy().clone();

    let mut deliveries = 0;
    while let Ok(Ok(collection)) =
        tokio::time::timeout(Duration::from_millis(100), ws.coordinator.process_next()).await
    {
        deliveries += 1;
        let snapshot = ws.coordinator.snapshot();
        if let Err(violations) = verify_invariants(&snapshot, &policy) {
            panic!("delivery {deliveries} ({collection}) broke the hierarchy: {violations:?}");
        }
        assert_eq!(snapshot.active_room_id, Some(beta.room_id));
        assert_eq!(snapshot.active_folder_id, Some(legal));
        assert_eq!(*snapshot, *committed);
    }
    assert!(deliveries >= 5);
}

#[tokio::test]
async fn test_rejected_delete_keeps_cached_content() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let uploaded = ws
        .coordinator
        .upload_files(created.root_folder_id, vec![("a.pdf".to_string(), pdf("a"))])
        .await
        .unwrap();
    let file_id = uploaded.created[0];
    ws.settle().await;

    ws.remote.fail_next_writes(5);
    let err = ws.coordinator.delete_file(file_id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RemoteWrite);
    ws.remote.fail_next_writes(0);

    let snapshot = ws.coordinator.snapshot();
    assert!(snapshot.file(file_id).unwrap().is_hydrated());
    let data = ws.coordinator.read_content(file_id).await.unwrap();
    assert_eq!(data, Some(pdf("a")));

    ws.coordinator.delete_file(file_id).await.unwrap();
    let cached = ws.cache.read(ws.coordinator.owner(), file_id).await.unwrap();
    assert!(cached.is_none());
}
