//! Integration tests for session lifecycle and remote feed handling.

mod helpers;

use dataroom_core::error::ErrorKind;
use dataroom_core::events::WorkspaceEvent;
use dataroom_core::traits::RemoteStore;
use dataroom_core::types::{Collection, FolderId};
use dataroom_entity::{Folder, Room};
use dataroom_service::sync::FeedState;

use helpers::{TestWorkspace, pdf};

#[tokio::test]
async fn test_initial_sync_marks_every_feed_ready() {
    let ws = TestWorkspace::signed_in().await;

    assert!(ws.coordinator.is_signed_in());
    assert_eq!(ws.coordinator.user(), Some(ws.user));
    let status = ws.coordinator.feed_status();
    assert_eq!(status.len(), Collection::ALL.len());
    assert!(status.iter().all(|(_, state)| *state == FeedState::Ready));
    assert!(ws.coordinator.snapshot().is_empty());
}

#[tokio::test]
async fn test_changes_from_another_writer_are_merged() {
    let mut ws = TestWorkspace::signed_in().await;

    let root_id = FolderId::new();
    let room = Room::new("Written elsewhere", root_id);
    let root = Folder::with_id(root_id, "All documents", None, room.id);
    ws.remote
        .set(
            ws.user,
            Collection::Folders,
            root_id.into_uuid(),
            serde_json::to_value(&root).unwrap(),
        )
        .await
        .unwrap();
    ws.remote
        .set(
            ws.user,
            Collection::Rooms,
            room.id.into_uuid(),
            serde_json::to_value(&room).unwrap(),
        )
        .await
        .unwrap();

    assert!(ws.settle().await >= 2);
    let snapshot = ws.coordinator.snapshot();
    assert_eq!(snapshot.room(room.id), Some(&room));
    assert_eq!(snapshot.active_room_id, Some(room.id));
    assert_eq!(snapshot.active_folder_id, Some(root_id));
}

#[tokio::test]
async fn test_remote_room_deletion_reassigns_active_room() {
    let mut ws = TestWorkspace::signed_in().await;
    let alpha = ws.coordinator.create_room("Alpha").await.unwrap();
    let beta = ws.coordinator.create_room("Beta").await.unwrap();
    ws.settle().await;
    assert_eq!(ws.coordinator.snapshot().active_room_id, Some(beta.room_id));

    ws.remote
        .delete(ws.user, Collection::Rooms, beta.room_id.into_uuid())
        .await
        .unwrap();
    ws.settle().await;

    let snapshot = ws.coordinator.snapshot();
    assert_eq!(snapshot.active_room_id, Some(alpha.room_id));
    assert_eq!(snapshot.active_folder_id, Some(alpha.root_folder_id));
}

#[tokio::test]
async fn test_resume_rehydrates_cached_content() {
    let mut ws = TestWorkspace::signed_in().await;
    let created = ws.coordinator.create_room("Acme").await.unwrap();
    let uploaded = ws
        .coordinator
        .upload_files(
            created.root_folder_id,
            vec![("deck.pdf".to_string(), pdf("deck"))],
        )
        .await
        .unwrap();
    let file_id = uploaded.created[0];

    ws.coordinator.sign_out();
    assert!(ws.coordinator.snapshot().is_empty());

    ws.sign_in().await;
    let snapshot = ws.coordinator.snapshot();
    let file = snapshot.file(file_id).unwrap();
    assert!(file.is_hydrated());
    assert_eq!(file.name, "deck.pdf");
    let data = ws.coordinator.read_content(file_id).await.unwrap().unwrap();
    assert_eq!(data, pdf("deck"));
}

#[tokio::test]
async fn test_resume_restores_last_active_folder() {
    let mut ws = TestWorkspace::signed_in().await;
    ws.coordinator.create_room("Alpha").await.unwrap();
    let beta = ws.coordinator.create_room("Beta").await.unwrap();
    let legal = ws
        .coordinator
        .create_folder(beta.root_folder_id, "Legal")
        .await
        .unwrap();
    ws.coordinator.select_folder(legal).await.unwrap();

    ws.coordinator.sign_out();
    ws.sign_in().await;

    let snapshot = ws.coordinator.snapshot();
    assert_eq!(snapshot.active_room_id, Some(beta.room_id));
    assert_eq!(snapshot.active_folder_id, Some(legal));
}

#[tokio::test]
async fn test_stale_preferences_fall_back_to_first_room() {
    let mut ws = TestWorkspace::signed_in().await;
    let alpha = ws.coordinator.create_room("Alpha").await.unwrap();
    let beta = ws.coordinator.create_room("Beta").await.unwrap();
    ws.coordinator.sign_out();

    ws.remote
        .delete(ws.user, Collection::Rooms, beta.room_id.into_uuid())
        .await
        .unwrap();
    ws.remote
        .delete(ws.user, Collection::Folders, beta.root_folder_id.into_uuid())
        .await
        .unwrap();
    ws.sign_in().await;

    let snapshot = ws.coordinator.snapshot();
    assert_eq!(snapshot.active_room_id, Some(alpha.room_id));
    assert_eq!(snapshot.active_folder_id, Some(alpha.root_folder_id));
}

#[tokio::test]
async fn test_feed_error_is_reported_and_tracked() {
    let mut ws = TestWorkspace::signed_in().await;
    let mut events = ws.coordinator.subscribe_events();

    ws.remote
        .inject_feed_error(ws.user, Collection::Files, "permission denied");
    ws.settle().await;

    let status = ws.coordinator.feed_status();
    let files = status
        .iter()
        .find(|(collection, _)| *collection == Collection::Files)
        .map(|(_, state)| state.clone());
    assert_eq!(files, Some(FeedState::Error("permission denied".to_string())));

    let mut failed = None;
    while let Ok(event) = events.try_recv() {
        if let WorkspaceEvent::FeedFailed {
            collection,
            message,
        } = event
        {
            failed = Some((collection, message));
        }
    }
    assert_eq!(
        failed,
        Some((Collection::Files, "permission denied".to_string()))
    );
}

#[tokio::test]
async fn test_sign_out_ends_the_session() {
    let mut ws = TestWorkspace::signed_in().await;
    ws.coordinator.create_room("Acme").await.unwrap();
    let mut events = ws.coordinator.subscribe_events();

    ws.coordinator.sign_out();

    assert!(!ws.coordinator.is_signed_in());
    assert!(ws.coordinator.snapshot().is_empty());
    let err = ws.coordinator.process_next().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Session);
    assert!(matches!(
        events.try_recv(),
        Ok(WorkspaceEvent::SessionChanged { user_id: None })
    ));
}

#[tokio::test]
async fn test_sign_in_fails_when_remote_is_unreachable() {
    let mut ws = TestWorkspace::signed_out();
    ws.remote.set_available(false);

    let err = ws.coordinator.sign_in(ws.user).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Session);
    assert!(!ws.coordinator.is_signed_in());
}

#[tokio::test]
async fn test_signed_out_edits_never_reach_the_remote() {
    let mut ws = TestWorkspace::signed_out();
    let created = ws.coordinator.create_room("Local only").await.unwrap();
    ws.coordinator
        .create_folder(created.root_folder_id, "Drafts")
        .await
        .unwrap();

    assert_eq!(ws.remote.writes_applied(), 0);
    assert_eq!(ws.coordinator.snapshot().folders.len(), 2);
}
