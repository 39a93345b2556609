// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hv-oracles: traits for the out-of-scope collaborators named by the
//! core (§1 "the core treats these as pluggable oracles, named by
//! their interface only") — Backend, Decomposer, Verifier,
//! FollowUpPlanner, WorkspaceStore, Snapshot — plus deterministic mock
//! implementations used for tests and `--mock` CLI runs.

pub mod backend;
pub mod decomposer;
pub mod error;
pub mod planner;
pub mod snapshot;
pub mod verifier;
pub mod workspace_store;

pub use backend::{
    Backend, BackendError, BackendExit, BackendHandle, BackendSpawnSpec, MockBackend, ScriptedOutcome,
};
pub use decomposer::{Decomposer, MockDecomposer};
pub use error::OracleError;
pub use planner::{FallbackPlanner, FollowUpPlanner};
pub use snapshot::{Snapshot, TarballSnapshot};
pub use verifier::{MockVerifier, Verifier, VerifyOutcome};
pub use workspace_store::{FsWorkspaceStore, WorkspaceStore};
