// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk crash-recovery record for a live session (§4.6).
//!
//! Lives at `<workspace>/.haivemind/checkpoints/<sessionId>.json`,
//! written atomically (temp file + rename) every `checkpointIntervalMs`
//! and once more synchronously on shutdown. Deleted on successful
//! finalize — its mere presence on startup is what marks a session as
//! having crashed.

use crate::agent::{Agent, AgentId};
use crate::cost::CostSummary;
use crate::plan::Plan;
use crate::project::ProjectSlug;
use crate::session::{Session, SessionId};
use crate::task::{TaskId, TaskStatus};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// `{sessionId, projectSlug, checkpointedAt, prompt, plan, agents,
/// timeline, costSummary, workDir}` (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub session_id: SessionId,
    pub project_slug: ProjectSlug,
    pub checkpointed_at_epoch_ms: u64,
    pub prompt: String,
    pub plan: Plan,
    pub agents: HashMap<AgentId, Agent>,
    pub timeline: Timeline,
    pub cost_summary: CostSummary,
    pub work_dir: PathBuf,
}

impl Checkpoint {
    /// Snapshot a live session at `now_epoch_ms`.
    pub fn from_session(session: &Session, now_epoch_ms: u64) -> Self {
        Self {
            session_id: session.id,
            project_slug: session.project_slug.clone(),
            checkpointed_at_epoch_ms: now_epoch_ms,
            prompt: session.prompt.clone(),
            plan: session.plan.clone(),
            agents: session.agents.clone(),
            timeline: session.timeline.clone(),
            cost_summary: session.cost_summary.clone(),
            work_dir: session.work_dir.clone(),
        }
    }

    /// `true` if `now_epoch_ms` is more than `stale_after_ms` past
    /// `checkpointedAt` — the recovery scan doesn't use this directly
    /// (every surviving checkpoint file is recovered regardless of
    /// age), but it's how the spec's "at most 10s stale" crash-recovery
    /// guarantee is verified.
    pub fn is_stale(&self, now_epoch_ms: u64, stale_after_ms: u64) -> bool {
        now_epoch_ms.saturating_sub(self.checkpointed_at_epoch_ms) > stale_after_ms
    }

    /// Convert a recovered checkpoint into an interrupted-session
    /// record (§4.6 Recovery): tasks split into completed vs.
    /// incomplete by terminal status.
    pub fn into_interrupted(self) -> InterruptedSession {
        let (completed, incomplete): (Vec<TaskId>, Vec<TaskId>) = self
            .plan
            .tasks
            .iter()
            .map(|t| (t.id.clone(), t.status))
            .fold((Vec::new(), Vec::new()), |(mut done, mut pending), (id, status)| {
                if matches!(status, TaskStatus::Done) {
                    done.push(id);
                } else {
                    pending.push(id);
                }
                (done, pending)
            });

        InterruptedSession {
            session_id: self.session_id,
            project_slug: self.project_slug,
            completed_tasks: completed,
            incomplete_tasks: incomplete,
            timeline: self.timeline,
            recovered_at_epoch_ms: self.checkpointed_at_epoch_ms,
        }
    }
}

/// Persisted at `<workspace>/.haivemind/interrupted/<sessionId>.json`
/// after a recovery scan converts an orphaned checkpoint (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptedSession {
    pub session_id: SessionId,
    pub project_slug: ProjectSlug,
    pub completed_tasks: Vec<TaskId>,
    pub incomplete_tasks: Vec<TaskId>,
    pub timeline: Timeline,
    pub recovered_at_epoch_ms: u64,
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
