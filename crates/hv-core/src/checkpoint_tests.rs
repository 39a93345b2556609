// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::project::ProjectSlug;
use crate::task::Task;
use std::path::PathBuf;

fn session() -> Session {
    let mut session = Session::new(
        ProjectSlug::new("demo").unwrap(),
        "build a todo app",
        PathBuf::from("/work/demo"),
        1_000,
        100,
    );
    session.plan = Plan::from_tasks(vec![
        Task::new(TaskId::new("a"), "scaffold", vec![]),
        Task::new(TaskId::new("b"), "tests", vec![TaskId::new("a")]),
    ]);
    session.plan.task_mut(&TaskId::new("a")).unwrap().status = TaskStatus::Done;
    session
}

#[test]
fn from_session_snapshots_every_checkpointed_field() {
    let session = session();
    let checkpoint = Checkpoint::from_session(&session, 1_500);
    assert_eq!(checkpoint.session_id, session.id);
    assert_eq!(checkpoint.project_slug, session.project_slug);
    assert_eq!(checkpoint.checkpointed_at_epoch_ms, 1_500);
    assert_eq!(checkpoint.prompt, session.prompt);
    assert_eq!(checkpoint.work_dir, session.work_dir);
    assert_eq!(checkpoint.plan.tasks.len(), 2);
}

#[test]
fn is_stale_respects_the_threshold() {
    let checkpoint = Checkpoint::from_session(&session(), 1_000);
    assert!(!checkpoint.is_stale(10_500, 10_000));
    assert!(checkpoint.is_stale(11_001, 10_000));
}

#[test]
fn into_interrupted_splits_tasks_by_terminal_status() {
    let checkpoint = Checkpoint::from_session(&session(), 2_000);
    let interrupted = checkpoint.into_interrupted();
    assert_eq!(interrupted.completed_tasks, vec![TaskId::new("a")]);
    assert_eq!(interrupted.incomplete_tasks, vec![TaskId::new("b")]);
    assert_eq!(interrupted.recovered_at_epoch_ms, 2_000);
}

#[test]
fn serde_round_trip_preserves_checkpoint_shape() {
    let checkpoint = Checkpoint::from_session(&session(), 2_000);
    let json = serde_json::to_string(&checkpoint).expect("serializes");
    let back: Checkpoint = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back.session_id, checkpoint.session_id);
    assert_eq!(back.plan.tasks.len(), checkpoint.plan.tasks.len());
}
