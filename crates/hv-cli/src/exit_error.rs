// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code (§6 "Exit
//! codes: 0 success; 1 any failed task or error; 2 usage").
//!
//! Commands return `ExitError` instead of calling `std::process::exit`
//! directly, so `main` is the only place that terminates the process.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(1, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<hv_daemon::SessionError> for ExitError {
    fn from(e: hv_daemon::SessionError) -> Self {
        use hv_daemon::SessionError;
        match e {
            SessionError::UnknownProject(_) | SessionError::NoPriorSession(_) => Self::usage(e.to_string()),
            other => Self::failure(other.to_string()),
        }
    }
}
