// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hv-engine: the session execution core — Agent Manager (§4.2), Task
//! Runner (§4.3), and Verify-Fix Loop (§4.4). Depends only on the
//! `hv-core` domain types and the `hv-oracles` collaborator traits;
//! owns no I/O of its own beyond spawning the backends it's handed.

pub mod agent_manager;
pub mod error;
pub mod scheduler;
pub mod summarizer;
pub mod verify_fix;

pub use agent_manager::AgentManager;
pub use error::EngineError;
pub use scheduler::{TaskRunner, TaskRunnerOutcome};
pub use verify_fix::{VerifyFixLoop, VerifyFixOutcome};
