// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hv_core::project::ProjectSlug;
use hv_core::session::{Session, SessionId};
use std::path::PathBuf;

fn sample_checkpoint(session_id: SessionId) -> Checkpoint {
    let session =
        Session::new(ProjectSlug::new("demo").unwrap(), "build it", PathBuf::from("/work"), 1_000, 5_000);
    let mut checkpoint = Checkpoint::from_session(&session, 1_000);
    checkpoint.session_id = session_id;
    checkpoint
}

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hv-storage-test-{name}-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn write_then_list_round_trips_a_checkpoint() {
    let root = temp_root("write-list");
    let store = CheckpointStore::new(&root);
    let session_id = SessionId::new();
    store.write(&sample_checkpoint(session_id)).await.unwrap();

    let found = store.list().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].session_id, session_id);

    tokio::fs::remove_dir_all(&root).await.ok();
}

#[tokio::test]
async fn delete_is_idempotent_for_a_missing_checkpoint() {
    let root = temp_root("delete-missing");
    let store = CheckpointStore::new(&root);
    store.delete(SessionId::new()).await.unwrap();
    store.delete(SessionId::new()).await.unwrap();
}

#[tokio::test]
async fn delete_removes_a_written_checkpoint() {
    let root = temp_root("delete-written");
    let store = CheckpointStore::new(&root);
    let session_id = SessionId::new();
    store.write(&sample_checkpoint(session_id)).await.unwrap();
    assert!(store.exists(session_id).await);

    store.delete(session_id).await.unwrap();
    assert!(!store.exists(session_id).await);

    tokio::fs::remove_dir_all(&root).await.ok();
}

#[tokio::test]
async fn list_is_empty_when_the_directory_does_not_exist() {
    let store = CheckpointStore::new(temp_root("never-created"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_skips_a_corrupt_file_without_failing_the_scan() {
    let root = temp_root("corrupt");
    let store = CheckpointStore::new(&root);
    let good_id = SessionId::new();
    store.write(&sample_checkpoint(good_id)).await.unwrap();

    let checkpoints_dir = root.join(".haivemind").join("checkpoints");
    tokio::fs::write(checkpoints_dir.join("not-json.json"), b"{ not valid").await.unwrap();

    let found = store.list().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].session_id, good_id);

    tokio::fs::remove_dir_all(&root).await.ok();
}
