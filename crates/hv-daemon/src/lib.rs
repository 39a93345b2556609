// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hv-daemon: the Session Service (§4.5) and Autopilot (§4.7) — the
//! orchestration layer that wires the oracle collaborators, the Agent
//! Manager, the Task Runner, and the Verify-Fix Loop together behind
//! the process-wide locks and checkpoint timer. Installing a global
//! `tracing` subscriber is this crate's job, not any of its
//! dependencies' — every crate below only emits `tracing::{info,warn,
//! error,debug}!` calls.

pub mod autopilot;
pub mod error;
pub mod lock;
pub mod mirror;
pub mod session_service;
pub mod shutdown;

pub use autopilot::{Autopilot, AutopilotConfig, AutopilotStopReason};
pub use error::SessionError;
pub use lock::LiveSessions;
pub use mirror::SessionMirror;
pub use session_service::SessionService;
pub use shutdown::{shutdown, DEFAULT_GRACE};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Respects `RUST_LOG`,
/// defaulting to `info`. Call once at process startup (`hv-cli`'s
/// `main`); calling it twice panics, matching
/// `tracing_subscriber::fmt::Subscriber::init`'s own contract.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
