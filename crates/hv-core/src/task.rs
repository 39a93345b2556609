// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: a node in the session DAG.

use crate::agent::AgentId;
use crate::config::ModelTier;
use serde::{Deserialize, Serialize};

/// Task identifier: a string, unique within its session, assigned by
/// the Decomposer oracle (not randomly generated — the Decomposer may
/// reuse human-meaningful names like `"write-tests"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Status of a task node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Ready,
    Running,
    Done,
    Failed,
    Skipped,
}

crate::simple_display! {
    TaskStatus {
        Pending => "pending",
        Ready => "ready",
        Running => "running",
        Done => "done",
        Failed => "failed",
        Skipped => "skipped",
    }
}

impl TaskStatus {
    /// `true` once a task can never transition again (§8 invariant:
    /// no task transitions out of `done` or `skipped`; `failed` is
    /// also terminal — it only ever moves descendants to `skipped`).
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed | TaskStatus::Skipped)
    }
}

/// A node in the session DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub label: String,
    pub status: TaskStatus,
    pub dependencies: Vec<TaskId>,
    pub retries: u32,
    pub tier: ModelTier,
    /// Back-reference to the task this one was spawned to fix, if any
    /// (Verify-Fix loop follow-up tasks).
    pub fix_for: Option<TaskId>,
    /// Agents attempted for this task, most recent last.
    pub agent_ids: Vec<AgentId>,
}

impl Task {
    pub fn new(id: TaskId, label: impl Into<String>, dependencies: Vec<TaskId>) -> Self {
        Self {
            id,
            label: label.into(),
            status: TaskStatus::Pending,
            dependencies,
            retries: 0,
            tier: ModelTier::DEFAULT,
            fix_for: None,
            agent_ids: Vec::new(),
        }
    }

    pub fn fix_for(mut self, parent: TaskId) -> Self {
        self.fix_for = Some(parent);
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
