// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent: one subprocess attempt at a task.
//!
//! `AgentId` is distinct from the task it runs for and from whatever
//! session/process handle the backend adapter uses internally — an
//! agent record is the orchestrator's view of one attempt, not the
//! backend's.

use crate::config::ModelTier;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for one subprocess attempt at a task.
    pub struct AgentId("agt-");
}

/// Status of an agent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Pending,
    Running,
    Success,
    Failed,
    Killed,
    Timeout,
}

crate::simple_display! {
    AgentStatus {
        Pending => "pending",
        Running => "running",
        Success => "success",
        Failed => "failed",
        Killed => "killed",
        Timeout => "timeout",
    }
}

impl AgentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, AgentStatus::Pending | AgentStatus::Running)
    }

    /// Terminal, but not `Success` — counts as a transient agent error
    /// that the Agent Manager may retry (§7 taxonomy).
    pub fn is_retryable_failure(self) -> bool {
        matches!(self, AgentStatus::Failed | AgentStatus::Killed | AgentStatus::Timeout)
    }
}

/// Test counts reported by the Verifier/backend in an agent's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCounts {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// Structured summary derived from an agent's raw output by the pure
/// summarizer (§4.2 Output summarization).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub files_changed: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub commands: Vec<String>,
    pub tests: TestCounts,
    pub digest: String,
}

/// One subprocess attempt at a task (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub task_id: TaskId,
    pub model: String,
    pub model_tier: ModelTier,
    pub multiplier: u32,
    pub status: AgentStatus,
    pub retries: u32,
    #[serde(skip)]
    pub output: Vec<u8>,
    pub started_at_epoch_ms: u64,
    pub ended_at_epoch_ms: Option<u64>,
    pub reason: Option<String>,
    pub summary: Option<AgentSummary>,
}

impl Agent {
    pub fn new(
        task_id: TaskId,
        model: impl Into<String>,
        model_tier: ModelTier,
        multiplier: u32,
        retries: u32,
        started_at_epoch_ms: u64,
    ) -> Self {
        Self {
            id: AgentId::new(),
            task_id,
            model: model.into(),
            model_tier,
            multiplier,
            status: AgentStatus::Pending,
            retries,
            output: Vec::new(),
            started_at_epoch_ms,
            ended_at_epoch_ms: None,
            reason: None,
            summary: None,
        }
    }

    /// Append a chunk to the bounded output buffer, evicting the
    /// oldest bytes once `cap` is exceeded.
    pub fn append_output(&mut self, chunk: &[u8], cap: usize) {
        self.output.extend_from_slice(chunk);
        if self.output.len() > cap {
            let excess = self.output.len() - cap;
            self.output.drain(0..excess);
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
