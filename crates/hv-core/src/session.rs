// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier and the top-level per-prompt session record.
//!
//! A Session exclusively owns its Tasks and Agents (§3 Ownership); the
//! workspace directory is shared and serialized by a per-workDir lock
//! owned by the Task Runner, not by the Session itself.

use crate::agent::{Agent, AgentId};
use crate::cost::CostSummary;
use crate::plan::Plan;
use crate::project::ProjectSlug;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Session identifier: a UUID scoped to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Planning,
    Running,
    Completed,
    Failed,
    Interrupted,
}

crate::simple_display! {
    SessionStatus {
        Planning => "planning",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Interrupted => "interrupted",
    }
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

/// The top-level per-prompt session record (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub project_slug: ProjectSlug,
    pub prompt: String,
    pub status: SessionStatus,
    pub started_at_epoch_ms: u64,
    pub ended_at_epoch_ms: Option<u64>,
    pub work_dir: PathBuf,
    pub plan: Plan,
    pub agents: HashMap<AgentId, Agent>,
    pub cost_summary: CostSummary,
    pub snapshot_ref: Option<String>,
    pub timeline: Timeline,
}

impl Session {
    pub fn new(
        project_slug: ProjectSlug,
        prompt: impl Into<String>,
        work_dir: PathBuf,
        started_at_epoch_ms: u64,
        timeline_cap: usize,
    ) -> Self {
        Self {
            id: SessionId::new(),
            project_slug,
            prompt: prompt.into(),
            status: SessionStatus::Planning,
            started_at_epoch_ms,
            ended_at_epoch_ms: None,
            work_dir,
            plan: Plan::default(),
            agents: HashMap::new(),
            cost_summary: CostSummary::default(),
            snapshot_ref: None,
            timeline: Timeline::new(timeline_cap),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
