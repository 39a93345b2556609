// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors produced by the Agent Manager, Task Runner, and Verify-Fix
//! Loop (§7 taxonomy — these are internal/fatal errors; transient
//! agent errors are recovered locally and never reach here).

use hv_core::agent::AgentId;
use hv_core::task::TaskId;
use hv_oracles::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("task {0} references unknown dependency")]
    UnknownDependency(TaskId),

    #[error("plan contains a cycle: {0:?}")]
    CyclicPlan(Vec<TaskId>),

    #[error("backend spawn failed: {0}")]
    SpawnFailed(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
