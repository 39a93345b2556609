// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Verify-Fix Loop: after the Task Runner drains, a Verifier oracle
//! judges the workspace and, on failure, the runner spawns its
//! proposed follow-up tasks for another round (§4.4).

use crate::scheduler::TaskRunner;
use hv_bus::EventBus;
use hv_core::clock::Clock;
use hv_core::config::Config;
use hv_core::event::{Event, SessionWarningType, VerifyPhase};
use hv_core::plan::Plan;
use hv_core::project::ProjectSkills;
use hv_core::session::SessionId;
use hv_oracles::Verifier;
use std::path::Path;
use std::sync::Arc;

/// Outcome of running the loop to its conclusion.
#[derive(Debug, Clone)]
pub struct VerifyFixOutcome {
    pub passed: bool,
    pub rounds_run: u32,
    pub issues: Vec<String>,
}

pub struct VerifyFixLoop<C: Clock + 'static> {
    verifier: Arc<dyn Verifier>,
    runner: TaskRunner<C>,
    bus: EventBus,
    session_id: SessionId,
    max_rounds: u32,
}

impl<C: Clock + 'static> VerifyFixLoop<C> {
    pub fn new(
        verifier: Arc<dyn Verifier>,
        runner: TaskRunner<C>,
        bus: EventBus,
        session_id: SessionId,
        config: &Config,
    ) -> Self {
        Self { verifier, runner, bus, session_id, max_rounds: config.verify_max_rounds }
    }

    /// Drive up to `maxRounds` verify/fix rounds (§4.4). A round that
    /// passes short-circuits immediately; exhausting all rounds
    /// without passing is not itself a session failure — the caller
    /// still finalizes the session, only noting the shortfall.
    pub async fn run(&self, plan: &mut Plan, work_dir: &Path, skills: &ProjectSkills) -> VerifyFixOutcome {
        let mut last_issues = Vec::new();

        for round in 1..=self.max_rounds {
            self.bus.broadcast(Event::VerifyStatus {
                session_id: self.session_id,
                status: VerifyPhase::Running,
                round: Some(round),
                issues: Vec::new(),
            });

            let outcome = match self.verifier.verify(plan, work_dir, skills).await {
                Ok(outcome) => outcome,
                Err(_) => hv_oracles::VerifyOutcome::fail(vec!["Verification timed out".to_string()], Vec::new()),
            };

            if outcome.passed {
                self.bus.broadcast(Event::VerifyStatus {
                    session_id: self.session_id,
                    status: VerifyPhase::Passed,
                    round: Some(round),
                    issues: Vec::new(),
                });
                return VerifyFixOutcome { passed: true, rounds_run: round, issues: Vec::new() };
            }

            last_issues = outcome.issues.clone();
            self.bus.broadcast(Event::VerifyStatus {
                session_id: self.session_id,
                status: VerifyPhase::Fixing,
                round: Some(round),
                issues: outcome.issues.clone(),
            });

            if outcome.follow_up_tasks.is_empty() {
                break;
            }

            let follow_up_ids: Vec<_> = outcome.follow_up_tasks.iter().map(|t| t.id.clone()).collect();
            plan.tasks.extend(outcome.follow_up_tasks);
            self.runner.run_follow_ups(plan, work_dir, follow_up_ids).await;
        }

        self.bus.broadcast(Event::SessionWarning {
            session_id: self.session_id,
            warning_type: SessionWarningType::VerifyExhausted,
            message: format!("verify-fix loop exhausted {} round(s) without passing", self.max_rounds),
        });
        self.bus.broadcast(Event::VerifyStatus {
            session_id: self.session_id,
            status: VerifyPhase::Failed,
            round: Some(self.max_rounds),
            issues: last_issues.clone(),
        });

        VerifyFixOutcome { passed: false, rounds_run: self.max_rounds, issues: last_issues }
    }
}

#[cfg(test)]
#[path = "verify_fix_tests.rs"]
mod tests;
