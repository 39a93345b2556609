// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Autopilot: the bounded outer loop that chains sessions by proposing
//! its own follow-up prompts (§4.7). Continues from a project's most
//! recent session — there is no seed prompt of its own, matching the
//! CLI surface's `autopilot <slug>` taking no prompt argument.

use crate::error::SessionError;
use crate::session_service::SessionService;
use hv_bus::EventBus;
use hv_core::clock::Clock;
use hv_core::project::ProjectSlug;
use hv_core::session::{Session, SessionStatus};
use hv_core::event::Event;
use hv_oracles::{FollowUpPlanner, WorkspaceStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Inputs to one Autopilot run (§4.7 "Inputs").
#[derive(Debug, Clone)]
pub struct AutopilotConfig {
    pub max_cycles: u32,
    pub cost_ceiling: Option<u64>,
    pub require_tests: bool,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self { max_cycles: 3, cost_ceiling: None, require_tests: false }
    }
}

/// Which stop condition ended the loop (§4.7 "Stop conditions").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutopilotStopReason {
    MaxCycles,
    CostCeiling,
    FailingTests,
    SessionFailed,
    ExternalStop,
    /// Not one of the spec's five named conditions, but a pluggable
    /// planner returning `None` has nowhere else to go.
    NoFollowUp,
}

impl std::fmt::Display for AutopilotStopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AutopilotStopReason::MaxCycles => "reached max cycles",
            AutopilotStopReason::CostCeiling => "exceeded cost ceiling",
            AutopilotStopReason::FailingTests => "last session reported failing tests",
            AutopilotStopReason::SessionFailed => "last session failed",
            AutopilotStopReason::ExternalStop => "external stop signal",
            AutopilotStopReason::NoFollowUp => "planner proposed no follow-up",
        })
    }
}

pub struct Autopilot<C: Clock + 'static> {
    session_service: Arc<SessionService<C>>,
    workspace: Arc<dyn WorkspaceStore>,
    planner: Arc<dyn FollowUpPlanner>,
    bus: EventBus,
}

impl<C: Clock + 'static> Autopilot<C> {
    pub fn new(
        session_service: Arc<SessionService<C>>,
        workspace: Arc<dyn WorkspaceStore>,
        planner: Arc<dyn FollowUpPlanner>,
        bus: EventBus,
    ) -> Self {
        Self { session_service, workspace, planner, bus }
    }

    /// Run the loop to completion. `cancel` is the external stop
    /// signal (§4.7 "user invokes stop endpoint").
    pub async fn run(
        &self,
        slug: &ProjectSlug,
        config: AutopilotConfig,
        cancel: CancellationToken,
    ) -> Result<AutopilotStopReason, SessionError> {
        let mut last_session = self.most_recent_session(slug).await?;

        self.bus.broadcast(Event::AutopilotStarted { project_slug: slug.clone() });
        let mut cycle = 0u32;
        // The Agent Manager (and its CostSummary) is recreated per
        // session, so `last_session.cost_summary` alone is only that
        // session's cost — track the running total across cycles
        // ourselves for the cumulative cost-ceiling check.
        let mut cumulative_premium_requests = 0u64;

        let reason = loop {
            if let Some(reason) = self.stop_reason(&last_session, &config, cycle, cumulative_premium_requests, &cancel) {
                break reason;
            }

            let project = self.workspace.get_project(slug).await?.ok_or_else(|| SessionError::UnknownProject(slug.clone()))?;
            let Some(prompt) = self.planner.propose(&project, &last_session).await else {
                break AutopilotStopReason::NoFollowUp;
            };

            info!(project_slug = %slug, cycle, %prompt, "autopilot starting cycle");
            let session = match self.session_service.continue_chat(slug, last_session, prompt.clone()).await {
                Ok(session) => session,
                Err(e) => {
                    warn!(project_slug = %slug, cycle, error = %e, "autopilot cycle failed fatally");
                    break AutopilotStopReason::SessionFailed;
                }
            };
            cumulative_premium_requests += session.cost_summary.total_premium_requests;

            self.bus.broadcast(Event::AutopilotCycle {
                project_slug: slug.clone(),
                cycle,
                session_id: Some(session.id),
                decision: prompt,
            });

            last_session = session;
            cycle += 1;
        };

        info!(project_slug = %slug, %reason, "autopilot stopped");
        self.bus.broadcast(Event::AutopilotStopped { project_slug: slug.clone(), reason: reason.to_string() });
        Ok(reason)
    }

    async fn most_recent_session(&self, slug: &ProjectSlug) -> Result<Session, SessionError> {
        let mut sessions = self.workspace.list_sessions(slug).await?;
        sessions.pop().ok_or_else(|| SessionError::NoPriorSession(slug.clone()))
    }

    fn stop_reason(
        &self,
        last_session: &Session,
        config: &AutopilotConfig,
        cycle: u32,
        cumulative_premium_requests: u64,
        cancel: &CancellationToken,
    ) -> Option<AutopilotStopReason> {
        if cancel.is_cancelled() {
            return Some(AutopilotStopReason::ExternalStop);
        }
        if cycle >= config.max_cycles {
            return Some(AutopilotStopReason::MaxCycles);
        }
        if let Some(ceiling) = config.cost_ceiling {
            if cumulative_premium_requests > ceiling {
                return Some(AutopilotStopReason::CostCeiling);
            }
        }
        if config.require_tests && last_session.agents.values().any(|a| a.summary.as_ref().is_some_and(|s| s.tests.failed > 0)) {
            return Some(AutopilotStopReason::FailingTests);
        }
        if last_session.status == SessionStatus::Failed {
            return Some(AutopilotStopReason::SessionFailed);
        }
        None
    }
}

#[cfg(test)]
#[path = "autopilot_tests.rs"]
mod tests;
