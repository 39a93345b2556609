// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup recovery scan (§4.6): every checkpoint left on disk after
//! an unclean shutdown is either a session that truly crashed mid-run,
//! or one that finalized in the brief window before its checkpoint was
//! deleted. The workspace store is the source of truth for which.

use crate::checkpoint_store::CheckpointStore;
use crate::error::StoreError;
use hv_core::checkpoint::InterruptedSession;
use hv_core::session::SessionId;
use hv_oracles::WorkspaceStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Atomically write `bytes` to `path`: write to a sibling `.tmp` file,
/// then rename over the destination.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Io { path: parent.to_path_buf(), source: e })?;
    }
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await.map_err(|e| StoreError::Io { path: tmp.clone(), source: e })?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| StoreError::Io { path: path.to_path_buf(), source: e })
}

pub struct RecoveryScanner {
    checkpoints: CheckpointStore,
    interrupted_dir: PathBuf,
    workspace: Arc<dyn WorkspaceStore>,
}

impl RecoveryScanner {
    pub fn new(workspace_root: impl Into<PathBuf>, workspace: Arc<dyn WorkspaceStore>) -> Self {
        let workspace_root = workspace_root.into();
        Self {
            checkpoints: CheckpointStore::new(&workspace_root),
            interrupted_dir: workspace_root.join(".haivemind").join("interrupted"),
            workspace,
        }
    }

    fn interrupted_path(&self, session_id: SessionId) -> PathBuf {
        self.interrupted_dir.join(format!("{session_id}.json"))
    }

    /// Scan every on-disk checkpoint; convert the ones whose session
    /// isn't already finalized in the workspace store into interrupted-
    /// session records, persist them, and delete the now-redundant
    /// checkpoint. Returns the interrupted sessions found this run.
    pub async fn scan(&self) -> Result<Vec<InterruptedSession>, StoreError> {
        let mut recovered = Vec::new();

        for checkpoint in self.checkpoints.list().await? {
            let session_id = checkpoint.session_id;
            let project_slug = checkpoint.project_slug.clone();

            let already_finalized = self
                .workspace
                .get_session(&project_slug, &session_id)
                .await?
                .map(|s| s.is_finalized())
                .unwrap_or(false);

            if already_finalized {
                self.checkpoints.delete(session_id).await?;
                continue;
            }

            let interrupted = checkpoint.into_interrupted();
            let bytes = serde_json::to_vec_pretty(&interrupted)?;
            write_atomic(&self.interrupted_path(session_id), &bytes).await?;
            self.checkpoints.delete(session_id).await?;
            recovered.push(interrupted);
        }

        Ok(recovered)
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
