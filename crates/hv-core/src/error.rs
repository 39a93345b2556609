// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy for the core crates.
//!
//! Maps onto the taxonomy in the spec's error handling design: user
//! errors are surfaced as-is by callers (CLI exit codes / REST 4xx),
//! transient agent errors are recovered internally and never reach
//! here, fatal errors propagate as one of these variants.

use thiserror::Error;

/// Errors produced by `hv-core` itself (config parsing, id validation).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid project slug {0:?}: must be url-safe, lowercase, non-empty")]
    InvalidSlug(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("task {0} references unknown dependency {1}")]
    UnknownDependency(String, String),
}
