// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Follow-up planner oracle: picks Autopilot's next prompt (§4.7).
//! "The core treats the planner (follow-up selector) as a pluggable
//! oracle with a fallback that picks from the project's pending
//! reflections" — the fallback here is the project's `skills` entries,
//! the nearest in-scope stand-in for "pending reflections" since
//! reflection/skill-extraction is itself an out-of-scope collaborator.

use async_trait::async_trait;
use hv_core::project::Project;
use hv_core::session::Session;

#[async_trait]
pub trait FollowUpPlanner: Send + Sync + 'static {
    /// Propose the next prompt given the project and its most recent
    /// session, or `None` to signal nothing impactful remains.
    async fn propose(&self, project: &Project, last_session: &Session) -> Option<String>;
}

/// Picks the next unconsumed skill entry as a follow-up prompt, or
/// `None` once the project's skill backlog is drained — the fallback
/// behavior the spec describes for when no richer planner is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPlanner;

#[async_trait]
impl FollowUpPlanner for FallbackPlanner {
    async fn propose(&self, project: &Project, _last_session: &Session) -> Option<String> {
        project.skills.entries.first().map(|hint| format!("Address: {hint}"))
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
