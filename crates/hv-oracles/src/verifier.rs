// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Verifier oracle: judges workspace state after the DAG drains
//! (§4.4 Verify-Fix Loop). Runs as a subprocess with its own
//! `orchestratorTimeoutMs`; a timeout is the caller's responsibility
//! to translate into `{passed: false, issues: ["Verification timed
//! out"]}`, not this trait's.

use crate::error::OracleError;
use async_trait::async_trait;
use hv_core::plan::Plan;
use hv_core::project::ProjectSkills;
use hv_core::task::Task;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

/// `{passed, issues, followUpTasks}` (§4.4 step 2).
#[derive(Debug, Clone, Default)]
pub struct VerifyOutcome {
    pub passed: bool,
    pub issues: Vec<String>,
    pub follow_up_tasks: Vec<Task>,
}

impl VerifyOutcome {
    pub fn pass() -> Self {
        Self { passed: true, issues: Vec::new(), follow_up_tasks: Vec::new() }
    }

    pub fn fail(issues: Vec<String>, follow_up_tasks: Vec<Task>) -> Self {
        Self { passed: false, issues, follow_up_tasks }
    }
}

#[async_trait]
pub trait Verifier: Send + Sync + 'static {
    async fn verify(
        &self,
        plan: &Plan,
        work_dir: &Path,
        skills: &ProjectSkills,
    ) -> Result<VerifyOutcome, OracleError>;
}

/// Deterministic fake: replays a queue of scripted outcomes, one per
/// round, repeating the last once exhausted. Defaults to passing
/// immediately, matching mock-mode's "skip the loop" behavior for
/// sessions that never script one.
#[derive(Clone)]
pub struct MockVerifier {
    rounds: Arc<Mutex<VecDeque<VerifyOutcome>>>,
}

impl Default for MockVerifier {
    fn default() -> Self {
        Self { rounds: Arc::new(Mutex::new(VecDeque::from([VerifyOutcome::pass()]))) }
    }
}

impl MockVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(rounds: Vec<VerifyOutcome>) -> Self {
        Self { rounds: Arc::new(Mutex::new(rounds.into())) }
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    async fn verify(
        &self,
        _plan: &Plan,
        _work_dir: &Path,
        _skills: &ProjectSkills,
    ) -> Result<VerifyOutcome, OracleError> {
        let mut rounds = self.rounds.lock();
        if rounds.len() > 1 {
            Ok(rounds.pop_front().unwrap_or_else(VerifyOutcome::pass))
        } else {
            Ok(rounds.front().cloned().unwrap_or_else(VerifyOutcome::pass))
        }
    }
}

#[cfg(test)]
#[path = "verifier_tests.rs"]
mod tests;
