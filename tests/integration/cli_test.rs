//! Integration tests driving the command line against a stored workspace.

use std::path::Path;

use clap::Parser;
use dataroom_cli::{Cli, LocalWorkspace};
use dataroom_core::config::AppConfig;
use dataroom_core::error::ErrorKind;
use dataroom_service::Hierarchy;

fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.workspace.state_path = dir.join("workspace.json").display().to_string();
    config.cache.provider = "local".to_string();
    config.cache.local.root = dir.join("content").display().to_string();
    config
}

async fn run(config: &AppConfig, args: &[&str]) -> Result<(), dataroom_core::AppError> {
    let cli = Cli::try_parse_from(std::iter::once("dataroom").chain(args.iter().copied()))
        .expect("arguments parse");
    cli.execute(config).await
}

#[tokio::test]
async fn test_commands_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["room", "create", "Acme"]).await.unwrap();
    run(&config, &["room", "create", "acme"]).await.unwrap();
    run(&config, &["folder", "create", "Legal"]).await.unwrap();

    let workspace = LocalWorkspace::open(&config).await.unwrap();
    let snapshot = workspace.coordinator.snapshot();
    let hierarchy = Hierarchy::new(&snapshot);
    let names: Vec<&str> = hierarchy
        .sorted_rooms()
        .iter()
        .map(|room| room.name.as_str())
        .collect();
    assert_eq!(names, vec!["Acme", "acme (1)"]);

    let active_room = hierarchy.room(snapshot.active_room_id.unwrap()).unwrap();
    assert_eq!(active_room.name, "acme (1)");
    let children = hierarchy.sorted_child_folders(active_room.root_folder_id);
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "Legal");
}

#[tokio::test]
async fn test_upload_move_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = dir.path().join("Term Sheet.pdf");
    tokio::fs::write(&source, b"%PDF-1.7 terms").await.unwrap();
    let ignored = dir.path().join("notes.txt");
    tokio::fs::write(&ignored, b"notes").await.unwrap();

    run(&config, &["room", "create", "Acme"]).await.unwrap();
    run(&config, &["folder", "create", "Legal"]).await.unwrap();
    let source_arg = source.display().to_string();
    let ignored_arg = ignored.display().to_string();
    run(&config, &["file", "upload", source_arg.as_str(), ignored_arg.as_str()])
        .await
        .unwrap();

    let (file_id, legal_id) = {
        let workspace = LocalWorkspace::open(&config).await.unwrap();
        let snapshot = workspace.coordinator.snapshot();
        assert_eq!(snapshot.files.len(), 1);
        let file = snapshot.files.values().next().unwrap();
        assert_eq!(file.name, "Term Sheet.pdf");
        assert!(file.is_hydrated());
        let legal = snapshot
            .folders
            .values()
            .find(|folder| folder.name == "Legal")
            .unwrap();
        (file.id, legal.id)
    };

    let (file_arg, legal_arg) = (file_id.to_string(), legal_id.to_string());
    run(&config, &["move", "--to", legal_arg.as_str(), "--file", file_arg.as_str()])
        .await
        .unwrap();
    let exported = dir.path().join("export.pdf");
    let exported_arg = exported.display().to_string();
    run(&config, &["file", "show", file_arg.as_str(), "--output", exported_arg.as_str()])
        .await
        .unwrap();

    let workspace = LocalWorkspace::open(&config).await.unwrap();
    let snapshot = workspace.coordinator.snapshot();
    assert_eq!(snapshot.file(file_id).unwrap().parent_folder_id, legal_id);
    let written = tokio::fs::read(&exported).await.unwrap();
    assert_eq!(written, b"%PDF-1.7 terms");
}

#[tokio::test]
async fn test_rm_all_keeps_the_room_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["room", "create", "Acme"]).await.unwrap();
    run(&config, &["folder", "create", "Legal"]).await.unwrap();
    run(&config, &["folder", "create", "Finance"]).await.unwrap();
    run(&config, &["rm", "--all"]).await.unwrap();

    let workspace = LocalWorkspace::open(&config).await.unwrap();
    let snapshot = workspace.coordinator.snapshot();
    assert_eq!(snapshot.rooms.len(), 1);
    assert_eq!(snapshot.folders.len(), 1);

    let err = run(&config, &["rm", "--all"]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_room_delete_with_yes_and_check() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["room", "create", "Acme"]).await.unwrap();
    let room_id = {
        let workspace = LocalWorkspace::open(&config).await.unwrap();
        workspace.coordinator.snapshot().active_room_id.unwrap()
    };
    run(&config, &["check"]).await.unwrap();

    let room_arg = room_id.to_string();
    run(&config, &["room", "delete", room_arg.as_str(), "--yes"]).await.unwrap();

    let workspace = LocalWorkspace::open(&config).await.unwrap();
    assert!(workspace.coordinator.snapshot().is_empty());
    run(&config, &["check"]).await.unwrap();
}

#[tokio::test]
async fn test_check_reports_a_corrupted_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    run(&config, &["room", "create", "Acme"]).await.unwrap();

    let raw = tokio::fs::read_to_string(&config.workspace.state_path)
        .await
        .unwrap();
    let mut state: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for folder in state["folders"].as_object_mut().unwrap().values_mut() {
        folder["parent_id"] = serde_json::Value::String(uuid::Uuid::new_v4().to_string());
    }
    tokio::fs::write(&config.workspace.state_path, state.to_string())
        .await
        .unwrap();

    let err = run(&config, &["check"]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_move_rejects_malformed_payload() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    run(&config, &["room", "create", "Acme"]).await.unwrap();
    let root = {
        let workspace = LocalWorkspace::open(&config).await.unwrap();
        workspace.coordinator.snapshot().active_folder_id.unwrap()
    };
    let root_arg = root.to_string();

    let err = run(&config, &["move", "--to", root_arg.as_str(), "--payload", "not json"])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
