// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot oracle: rollback points taken before a session touches the
//! workspace (§3 Checkpoint "snapshot ref", §4.5 step 3). "A snapshot
//! ref is either a git tag or a tarball path" per the persisted layout
//! — this implementation always produces a tarball, since the core
//! cannot assume the workspace is a git repository.

use crate::error::OracleError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait Snapshot: Send + Sync + 'static {
    /// Capture `work_dir` and return an opaque ref usable with [`Snapshot::rollback`].
    async fn create(&self, work_dir: &Path) -> Result<String, OracleError>;

    /// Restore `work_dir` to the state captured under `snapshot_ref`.
    async fn rollback(&self, work_dir: &Path, snapshot_ref: &str) -> Result<(), OracleError>;
}

/// Tarball-backed [`Snapshot`]: gzip tar archives of `work_dir` kept
/// under `<snapshots_dir>/<ref>.tar.gz`. The ref is a uuid so repeated
/// snapshots of the same workspace never collide.
#[derive(Debug, Clone)]
pub struct TarballSnapshot {
    snapshots_dir: PathBuf,
}

impl TarballSnapshot {
    pub fn new(snapshots_dir: impl Into<PathBuf>) -> Self {
        Self { snapshots_dir: snapshots_dir.into() }
    }

    fn archive_path(&self, snapshot_ref: &str) -> PathBuf {
        self.snapshots_dir.join(format!("{snapshot_ref}.tar.gz"))
    }
}

#[async_trait]
impl Snapshot for TarballSnapshot {
    async fn create(&self, work_dir: &Path) -> Result<String, OracleError> {
        let snapshot_ref = uuid::Uuid::new_v4().to_string();
        let archive_path = self.archive_path(&snapshot_ref);
        let snapshots_dir = self.snapshots_dir.clone();
        let work_dir = work_dir.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<(), OracleError> {
            std::fs::create_dir_all(&snapshots_dir)
                .map_err(|e| OracleError::Io { path: snapshots_dir.clone(), source: e })?;
            let file = std::fs::File::create(&archive_path)
                .map_err(|e| OracleError::Io { path: archive_path.clone(), source: e })?;
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            builder
                .append_dir_all(".", &work_dir)
                .map_err(|e| OracleError::SnapshotFailed(e.to_string()))?;
            builder.into_inner().map_err(|e| OracleError::SnapshotFailed(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| OracleError::SnapshotFailed(e.to_string()))??;

        Ok(snapshot_ref)
    }

    async fn rollback(&self, work_dir: &Path, snapshot_ref: &str) -> Result<(), OracleError> {
        let archive_path = self.archive_path(snapshot_ref);
        if !archive_path.exists() {
            return Err(OracleError::NotFound(snapshot_ref.to_string()));
        }
        let work_dir = work_dir.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<(), OracleError> {
            // Clear the workspace before extracting so files removed
            // since the snapshot don't linger.
            if work_dir.exists() {
                for entry in std::fs::read_dir(&work_dir)
                    .map_err(|e| OracleError::Io { path: work_dir.clone(), source: e })?
                {
                    let entry = entry.map_err(|e| OracleError::Io { path: work_dir.clone(), source: e })?;
                    let path = entry.path();
                    if path.is_dir() {
                        std::fs::remove_dir_all(&path)
                    } else {
                        std::fs::remove_file(&path)
                    }
                    .map_err(|e| OracleError::Io { path: path.clone(), source: e })?;
                }
            } else {
                std::fs::create_dir_all(&work_dir)
                    .map_err(|e| OracleError::Io { path: work_dir.clone(), source: e })?;
            }

            let file = std::fs::File::open(&archive_path)
                .map_err(|e| OracleError::Io { path: archive_path.clone(), source: e })?;
            let decoder = flate2::read::GzDecoder::new(file);
            let mut archive = tar::Archive::new(decoder);
            archive.unpack(&work_dir).map_err(|e| OracleError::SnapshotFailed(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| OracleError::SnapshotFailed(e.to_string()))??;

        Ok(())
    }
}

/// Reads the first few bytes of `path` to sanity-check an archive
/// exists and is non-empty. Used only by tests.
#[cfg(test)]
fn archive_len(path: &Path) -> u64 {
    use std::io::Read;
    let mut file = std::fs::File::open(path).unwrap();
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).unwrap();
    buf.len() as u64
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
