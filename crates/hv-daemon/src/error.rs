// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal session errors (§7 taxonomy: "Fatal session error — decomposer
//! failed/timed out, snapshot failed, unexpected exception"). Transient
//! agent errors and admission rejections never reach this type — they
//! resolve inside the Task Runner.

use hv_core::project::ProjectSlug;
use hv_engine::EngineError;
use hv_oracles::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown project {0}")]
    UnknownProject(ProjectSlug),

    #[error("project {0} has no prior session for autopilot to continue from")]
    NoPriorSession(ProjectSlug),

    #[error("a session is already running for project {0} and concurrent starts are forbidden")]
    SessionInFlight(ProjectSlug),

    #[error("decomposer timed out after {0}ms")]
    DecomposeTimeout(u64),

    #[error("decomposer failed: {0}")]
    DecomposeFailed(String),

    #[error("snapshot failed: {0}")]
    SnapshotFailed(String),

    #[error("plan contains a cycle: {0:?}")]
    CyclicPlan(Vec<String>),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Store(#[from] hv_storage::StoreError),
}
