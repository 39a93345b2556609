// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hv_core::project::ProjectSlug;
use hv_core::session::{Session, SessionStatus};
use hv_oracles::FsWorkspaceStore;
use std::path::PathBuf;

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hv-storage-recovery-{name}-{}", uuid::Uuid::new_v4()))
}

fn sample_session(status: SessionStatus) -> Session {
    let mut session =
        Session::new(ProjectSlug::new("demo").unwrap(), "build it", PathBuf::from("/work"), 1_000, 5_000);
    session.status = status;
    session
}

#[tokio::test]
async fn an_orphaned_checkpoint_with_no_matching_session_is_recovered() {
    let root = temp_root("orphan");
    let session = sample_session(SessionStatus::Running);
    let checkpoint = hv_core::checkpoint::Checkpoint::from_session(&session, 1_500);
    CheckpointStore::new(&root).write(&checkpoint).await.unwrap();

    let workspace = Arc::new(FsWorkspaceStore::new(&root));
    let scanner = RecoveryScanner::new(&root, workspace);
    let recovered = scanner.scan().await.unwrap();

    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].session_id, session.id);
    assert!(!CheckpointStore::new(&root).exists(session.id).await);

    tokio::fs::remove_dir_all(&root).await.ok();
}

#[tokio::test]
async fn a_checkpoint_whose_session_already_completed_is_discarded_not_recovered() {
    let root = temp_root("completed");
    let session = sample_session(SessionStatus::Running);
    let checkpoint = hv_core::checkpoint::Checkpoint::from_session(&session, 1_500);
    CheckpointStore::new(&root).write(&checkpoint).await.unwrap();

    let workspace = Arc::new(FsWorkspaceStore::new(&root));
    let mut finalized = session.clone();
    finalized.status = SessionStatus::Completed;
    workspace.save_session(&finalized).await.unwrap();

    let scanner = RecoveryScanner::new(&root, workspace);
    let recovered = scanner.scan().await.unwrap();

    assert!(recovered.is_empty());
    assert!(!CheckpointStore::new(&root).exists(session.id).await);

    tokio::fs::remove_dir_all(&root).await.ok();
}

#[tokio::test]
async fn an_empty_checkpoint_directory_recovers_nothing() {
    let root = temp_root("empty");
    let workspace = Arc::new(FsWorkspaceStore::new(&root));
    let scanner = RecoveryScanner::new(&root, workspace);
    assert!(scanner.scan().await.unwrap().is_empty());
}

#[tokio::test]
async fn recovered_sessions_split_completed_and_incomplete_tasks() {
    use hv_core::plan::Plan;
    use hv_core::task::{Task, TaskId, TaskStatus};

    let root = temp_root("split");
    let mut session = sample_session(SessionStatus::Running);
    let done_id = TaskId::new("done");
    let pending_id = TaskId::new("pending");
    let mut done_task = Task::new(done_id.clone(), "do the thing", vec![]);
    done_task.status = TaskStatus::Done;
    session.plan = Plan::from_tasks(vec![done_task, Task::new(pending_id.clone(), "do the other thing", vec![])]);
    let checkpoint = hv_core::checkpoint::Checkpoint::from_session(&session, 2_000);
    CheckpointStore::new(&root).write(&checkpoint).await.unwrap();

    let workspace = Arc::new(FsWorkspaceStore::new(&root));
    let scanner = RecoveryScanner::new(&root, workspace);
    let recovered = scanner.scan().await.unwrap();

    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].completed_tasks, vec![done_id]);
    assert_eq!(recovered[0].incomplete_tasks, vec![pending_id]);

    tokio::fs::remove_dir_all(&root).await.ok();
}
