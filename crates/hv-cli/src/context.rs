// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the Session Service's collaborators together for the `hv`
//! binary. Decomposer/Verifier/Backend are Non-goals to host for real
//! (§1) — the CLI always runs the deterministic mock oracles named in
//! `hv-oracles`; `--mock` only toggles skipping the Verify-Fix Loop.

use hv_bus::EventBus;
use hv_core::clock::{Clock, SystemClock};
use hv_core::config::Config;
use hv_core::project::ProjectSlug;
use hv_daemon::SessionService;
use hv_oracles::{FsWorkspaceStore, MockBackend, MockDecomposer, MockVerifier, TarballSnapshot, WorkspaceStore};
use hv_storage::{CheckpointStore, RecoveryScanner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Context {
    pub workspace: Arc<dyn WorkspaceStore>,
    pub bus: EventBus,
    pub service: Arc<SessionService<SystemClock>>,
}

impl Context {
    pub async fn new(workspace_root: PathBuf, skip_verify_fix: bool) -> anyhow::Result<Self> {
        let workspace: Arc<dyn WorkspaceStore> = Arc::new(FsWorkspaceStore::new(&workspace_root));
        let bus = EventBus::new();

        let scanner = RecoveryScanner::new(&workspace_root, Arc::clone(&workspace));
        match scanner.scan().await {
            Ok(recovered) if !recovered.is_empty() => {
                warn!(count = recovered.len(), "recovered interrupted sessions from a prior crash");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "startup recovery scan failed"),
        }

        let config = Config { workspace_root: workspace_root.clone(), ..Config::default() };

        let service = Arc::new(SessionService::new(
            config,
            bus.clone(),
            Arc::clone(&workspace),
            Arc::new(MockDecomposer::new()),
            Arc::new(MockVerifier::new()),
            Arc::new(TarballSnapshot::new(workspace_root.join(".haivemind").join("snapshots"))),
            Arc::new(MockBackend::new()),
            CheckpointStore::new(&workspace_root),
            SystemClock,
            skip_verify_fix,
        ));

        info!(workspace = %workspace_root.display(), "hv daemon context ready");
        Ok(Self { workspace, bus, service })
    }

    pub async fn get_or_create_project(&self, slug: &ProjectSlug) -> anyhow::Result<hv_core::project::Project> {
        if let Some(project) = self.workspace.get_project(slug).await? {
            return Ok(project);
        }
        let project = hv_core::project::Project::new(slug.clone(), slug.as_str(), SystemClock.epoch_ms());
        self.workspace.create_project(project.clone()).await?;
        Ok(project)
    }
}
