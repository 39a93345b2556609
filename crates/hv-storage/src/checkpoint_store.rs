// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed checkpoint directory: one file per live session,
//! written atomically (§4.6, §5 "Checkpoint directory" shared
//! resource). Readers tolerate partial/corrupt files by treating them
//! as "not yet recovered" rather than erroring the whole scan.

use crate::error::StoreError;
use hv_core::checkpoint::Checkpoint;
use hv_core::session::SessionId;
use std::path::{Path, PathBuf};
use tracing::warn;

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

#[derive(Clone)]
pub struct CheckpointStore {
    checkpoints_dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self { checkpoints_dir: workspace_root.into().join(".haivemind").join("checkpoints") }
    }

    fn path_for(&self, session_id: SessionId) -> PathBuf {
        self.checkpoints_dir.join(format!("{session_id}.json"))
    }

    pub async fn write(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(checkpoint)?;
        write_atomic(&self.path_for(checkpoint.session_id), &bytes).await
    }

    /// Idempotent: a missing file is not an error (§8 "for every
    /// finalized session: no checkpoint file remains").
    pub async fn delete(&self, session_id: SessionId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(session_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io { path: self.path_for(session_id), source: e }),
        }
    }

    pub async fn exists(&self, session_id: SessionId) -> bool {
        tokio::fs::metadata(self.path_for(session_id)).await.is_ok()
    }

    /// Every checkpoint file currently on disk, skipping (with a
    /// warning) any file that fails to parse rather than failing the
    /// whole scan — a checkpoint mid-write at the moment of a crash is
    /// expected, not exceptional (§5 "readers tolerate partial
    /// files").
    pub async fn list(&self) -> Result<Vec<Checkpoint>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.checkpoints_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io { path: self.checkpoints_dir.clone(), source: e }),
        };

        let mut checkpoints = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io { path: self.checkpoints_dir.clone(), source: e })?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<Checkpoint>(&bytes) {
                    Ok(checkpoint) => checkpoints.push(checkpoint),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unparsable checkpoint"),
                },
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable checkpoint"),
            }
        }
        Ok(checkpoints)
    }
}

#[cfg(test)]
#[path = "checkpoint_store_tests.rs"]
mod tests;
