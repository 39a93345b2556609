// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend adapter: opaque subprocess launcher (§1 out-of-scope
//! collaborators — "producing a child handle and a CLI-command
//! string; the core consumes only the spawn operation and byte
//! stream"). The Agent Manager depends only on this trait; a real
//! backend shells out to `copilot`/`ollama`/etc, the mock used in
//! tests and `--mock` CLI mode scripts deterministic outcomes.

use async_trait::async_trait;
use hv_core::task::TaskId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend spawn failed: {0}")]
    SpawnFailed(String),
}

/// What the Agent Manager asks a backend to run.
#[derive(Debug, Clone)]
pub struct BackendSpawnSpec {
    pub task_id: TaskId,
    pub model: String,
    pub work_dir: PathBuf,
    /// The task label plus, on retries, the prior attempt's summary
    /// digest folded in as escalation context (§4.2).
    pub prompt: String,
}

/// Terminal outcome of a subprocess attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendExit {
    Success,
    Failure,
    Killed,
}

/// A live backend process: an output stream plus a wait/kill handle.
/// Methods take `&self` (not `&mut self`) so a handle can be shared
/// between the task awaiting its exit and `killAll`'s termination
/// sweep — implementations hold any mutable state behind interior
/// mutability.
#[async_trait]
pub trait BackendHandle: Send + Sync {
    /// Resolves when the subprocess exits on its own.
    async fn wait(&self) -> BackendExit;

    /// Send SIGTERM (or the platform equivalent).
    async fn terminate(&self);

    /// Send SIGKILL (or the platform equivalent). Idempotent.
    async fn kill(&self);
}

/// Launches backend subprocesses. The core consumes only `spawn`.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Start a subprocess for `spec`. Output bytes are pushed to
    /// `output_tx` as they arrive; the manager forwards each chunk
    /// into the agent's bounded buffer and an `agent:output` event.
    async fn spawn(
        &self,
        spec: BackendSpawnSpec,
        output_tx: mpsc::Sender<Vec<u8>>,
    ) -> Result<Box<dyn BackendHandle>, BackendError>;
}

/// One scripted outcome for a task under [`MockBackend`].
#[derive(Debug, Clone)]
pub struct ScriptedOutcome {
    pub exit: BackendExit,
    pub output_chunks: Vec<Vec<u8>>,
}

impl ScriptedOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit: BackendExit::Success, output_chunks: vec![output.into().into_bytes()] }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self { exit: BackendExit::Failure, output_chunks: vec![output.into().into_bytes()] }
    }
}

/// Deterministic fake used in tests and `--mock` CLI mode. Scripts are
/// keyed by `taskId`; a task with no script default-succeeds with
/// empty output, an approach mirroring the coop sidecar's
/// `FakeAgentAdapter` test double.
#[derive(Clone, Default)]
pub struct MockBackend {
    scripts: Arc<Mutex<HashMap<TaskId, Vec<ScriptedOutcome>>>>,
    calls: Arc<Mutex<Vec<TaskId>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for a task's successive attempts, consumed
    /// oldest-first as the Agent Manager retries. The last entry
    /// repeats once exhausted.
    pub fn script(&self, task_id: TaskId, outcomes: Vec<ScriptedOutcome>) {
        self.scripts.lock().insert(task_id, outcomes);
    }

    pub fn calls(&self) -> Vec<TaskId> {
        self.calls.lock().clone()
    }
}

struct MockHandle {
    exit: Mutex<BackendExit>,
}

#[async_trait]
impl BackendHandle for MockHandle {
    async fn wait(&self) -> BackendExit {
        *self.exit.lock()
    }

    async fn terminate(&self) {
        *self.exit.lock() = BackendExit::Killed;
    }

    async fn kill(&self) {
        *self.exit.lock() = BackendExit::Killed;
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn spawn(
        &self,
        spec: BackendSpawnSpec,
        output_tx: mpsc::Sender<Vec<u8>>,
    ) -> Result<Box<dyn BackendHandle>, BackendError> {
        self.calls.lock().push(spec.task_id.clone());

        let attempt = self.calls.lock().iter().filter(|t| **t == spec.task_id).count() - 1;
        let outcome = {
            let scripts = self.scripts.lock();
            scripts.get(&spec.task_id).map(|outcomes| {
                outcomes.get(attempt).or_else(|| outcomes.last()).cloned().unwrap_or_else(|| {
                    ScriptedOutcome::success(String::new())
                })
            })
        }
        .unwrap_or_else(|| ScriptedOutcome::success(String::new()));

        for chunk in &outcome.output_chunks {
            let _ = output_tx.send(chunk.clone()).await;
        }

        Ok(Box::new(MockHandle { exit: Mutex::new(outcome.exit) }))
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
