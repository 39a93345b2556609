// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::session_service::SessionService;
use async_trait::async_trait;
use hv_bus::EventBus;
use hv_core::clock::FakeClock;
use hv_core::config::Config;
use hv_core::event::EventKind;
use hv_core::plan::Plan;
use hv_core::project::{Project, ProjectSkills, ProjectSlug};
use hv_core::session::SessionStatus;
use hv_core::task::{Task, TaskId};
use hv_oracles::{Decomposer, FsWorkspaceStore, MockBackend, MockVerifier, OracleError, TarballSnapshot, WorkspaceStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

struct SlowDecomposer {
    delay: Duration,
}

#[async_trait]
impl Decomposer for SlowDecomposer {
    async fn decompose(&self, _prompt: &str, _skills: &ProjectSkills, _existing: Option<&Plan>) -> Result<Plan, OracleError> {
        tokio::time::sleep(self.delay).await;
        Ok(Plan::from_tasks(vec![Task::new(TaskId::new("task-0"), "slow", vec![])]))
    }
}

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hv-daemon-shutdown-{name}-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn cancelling_a_mid_flight_session_marks_it_interrupted_and_keeps_its_checkpoint() {
    let slug = ProjectSlug::new("shutdown-mid-flight").unwrap();
    let root = temp_root("mid-flight");
    let work_dir = root.join("work");
    tokio::fs::create_dir_all(&work_dir).await.unwrap();

    let workspace: Arc<dyn WorkspaceStore> = Arc::new(FsWorkspaceStore::new(&root));
    let mut project = Project::new(slug.clone(), "demo", 1_000);
    project.directory = Some(work_dir.clone());
    workspace.create_project(project).await.unwrap();

    let bus = EventBus::new();
    let (sub_id, mut receiver) = bus.subscribe();
    bus.subscribe_project(sub_id, slug.clone());

    let mut config = Config { workspace_root: root.clone(), ..Config::default() };
    config.orchestrator_timeout_ms = 5_000;
    config.checkpoint_interval_ms = 60_000;

    let service = Arc::new(SessionService::new(
        config,
        bus.clone(),
        Arc::clone(&workspace),
        Arc::new(SlowDecomposer { delay: Duration::from_millis(200) }),
        Arc::new(MockVerifier::new()),
        Arc::new(TarballSnapshot::new(root.join("snapshots"))),
        Arc::new(MockBackend::new()),
        hv_storage::CheckpointStore::new(&root),
        FakeClock::new(),
        false,
    ));

    let live = service.live_sessions();
    let run_handle = {
        let service = Arc::clone(&service);
        let slug = slug.clone();
        tokio::spawn(async move { service.start(&slug, "build it").await })
    };

    // Give the decompose call a moment to start before the live-session
    // registry has something to cancel.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(live.snapshot().len(), 1);

    shutdown(&bus, &live, "shutting down", Duration::from_secs(2)).await;

    let session = run_handle.await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Interrupted);
    assert!(live.snapshot().is_empty());

    let checkpoints = hv_storage::CheckpointStore::new(&root);
    assert!(checkpoints.exists(session.id).await, "interrupted session's checkpoint must survive");

    let mut saw_warning = false;
    let mut saw_interrupted = false;
    while let Ok(event) = receiver.try_recv() {
        match event.kind() {
            EventKind::ShutdownWarning => saw_warning = true,
            EventKind::SessionInterrupted => saw_interrupted = true,
            _ => {}
        }
    }
    assert!(saw_warning);
    assert!(saw_interrupted);
}

#[tokio::test]
async fn shutdown_with_no_live_sessions_returns_immediately() {
    let bus = EventBus::new();
    let live = LiveSessions::new();

    let started = tokio::time::Instant::now();
    shutdown(&bus, &live, "shutting down", Duration::from_secs(30)).await;
    assert!(started.elapsed() < Duration::from_secs(1));
}
