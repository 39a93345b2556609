// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the out-of-scope collaborators (§1 "named by
//! their interface only"). Every oracle call the core awaits is
//! wrapped in a timeout by the caller; these variants are what the
//! oracle itself can fail with.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("backend spawn failed: {0}")]
    SpawnFailed(String),

    #[error("decomposer failed: {0}")]
    DecomposeFailed(String),

    #[error("verifier failed: {0}")]
    VerifyFailed(String),

    #[error("snapshot operation failed: {0}")]
    SnapshotFailed(String),

    #[error("workspace store I/O error at {path}: {source}")]
    Io { path: std::path::PathBuf, #[source] source: std::io::Error },

    #[error("workspace store record not found: {0}")]
    NotFound(String),

    #[error("workspace store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
