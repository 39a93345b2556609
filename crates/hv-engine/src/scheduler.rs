// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task Runner: the DAG scheduler (§4.3). Drives the Agent Manager
//! through a plan in dependency order, honoring the admission limits
//! and cancellation discipline from §5.

use crate::agent_manager::AgentManager;
use crate::summarizer;
use hv_bus::EventBus;
use hv_core::agent::AgentStatus;
use hv_core::clock::Clock;
use hv_core::config::Config;
use hv_core::cost::CostSummary;
use hv_core::event::{Event, SessionWarningType};
use hv_core::plan::Plan;
use hv_core::session::SessionId;
use hv_core::task::{TaskId, TaskStatus};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Result of draining a plan (§4.3 step 3).
#[derive(Debug, Clone, Default)]
pub struct TaskRunnerOutcome {
    pub failed_tasks: Vec<TaskId>,
    pub skipped_tasks: Vec<TaskId>,
    pub cost_summary: CostSummary,
}

pub struct TaskRunner<C: Clock + 'static> {
    agents: AgentManager<C>,
    bus: EventBus,
    session_id: SessionId,
    config: Config,
    cancel: CancellationToken,
}

impl<C: Clock + 'static> TaskRunner<C> {
    pub fn new(
        agents: AgentManager<C>,
        bus: EventBus,
        session_id: SessionId,
        config: Config,
        cancel: CancellationToken,
    ) -> Self {
        Self { agents, bus, session_id, config, cancel }
    }

    /// Drain `plan` to completion or cancellation (§4.3 algorithm).
    /// Mutates task statuses/tiers/agent history in place as the plan
    /// advances; `plan.find_cycle` must already have been checked by
    /// the caller (Session Service validates before this call so a
    /// cyclic plan never reaches the runner).
    pub async fn run(&self, plan: &mut Plan, work_dir: &Path) -> TaskRunnerOutcome {
        let ready: VecDeque<TaskId> = plan.initial_ready().into();
        self.drain(plan, work_dir, ready).await
    }

    /// Run a set of newly-appended, dependency-free tasks (the
    /// Verify-Fix Loop's follow-up tasks, §4.4 step 3) without
    /// re-admitting anything already settled elsewhere in `plan`.
    pub async fn run_follow_ups(
        &self,
        plan: &mut Plan,
        work_dir: &Path,
        follow_up_ids: Vec<TaskId>,
    ) -> TaskRunnerOutcome {
        self.drain(plan, work_dir, follow_up_ids.into()).await
    }

    async fn drain(&self, plan: &mut Plan, work_dir: &Path, mut ready: VecDeque<TaskId>) -> TaskRunnerOutcome {
        let mut done: HashSet<TaskId> = HashSet::new();
        let mut failed: Vec<TaskId> = Vec::new();
        let mut skipped: Vec<TaskId> = Vec::new();
        let mut running: HashMap<hv_core::agent::AgentId, TaskId> = HashMap::new();

        let (tx, mut rx) = mpsc::channel(self.config.max_concurrency.max(1));

        loop {
            if self.cancel.is_cancelled() {
                self.agents.kill_all().await;
                break;
            }

            while !self.cancel.is_cancelled() && running.len() < self.config.max_concurrency {
                let Some(task_id) = ready.pop_front() else { break };
                #[allow(clippy::expect_used)]
                let task_tier = plan.task(&task_id).expect("ready task exists in plan").tier;
                let (tier, model) = self.agents.next_model(&task_id, task_tier);
                if self.admit(plan, &task_id, &model, &mut skipped, &mut done) {
                    let agent_id = self.dispatch(plan, &task_id, tier, model, work_dir).await;
                    running.insert(agent_id, task_id.clone());
                    let agents = self.agents.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let result = agents.wait(agent_id).await;
                        let _ = tx.send((agent_id, result)).await;
                    });
                } else {
                    failed.push(task_id.clone());
                }
            }

            if running.is_empty() {
                if ready.is_empty() {
                    break;
                }
                // Nothing admitted this round but tasks remain ready
                // (e.g. all were rejected by the cost ceiling) —
                // nothing left to await, so drain them as failures
                // too rather than spin forever.
                continue;
            }

            let Some((agent_id, result)) = rx.recv().await else { break };
            let Some(task_id) = running.remove(&agent_id) else { continue };

            match result {
                Ok((AgentStatus::Success, _)) => {
                    done.insert(task_id.clone());
                    if let Some(task) = plan.task_mut(&task_id) {
                        task.status = TaskStatus::Done;
                    }
                    self.publish_task_status(&task_id, TaskStatus::Done, None, None);
                    for dependent in plan.dependents_of(&task_id) {
                        if plan.all_deps_done(&dependent, &done) && !ready.contains(&dependent) {
                            ready.push_back(dependent);
                        }
                    }
                }
                Ok((_status, reason)) => {
                    self.handle_failure(plan, &task_id, reason, &mut ready, &mut failed, &mut skipped, &done);
                }
                Err(e) => {
                    self.handle_failure(
                        plan,
                        &task_id,
                        Some(e.to_string()),
                        &mut ready,
                        &mut failed,
                        &mut skipped,
                        &done,
                    );
                }
            }
        }

        TaskRunnerOutcome { failed_tasks: failed, skipped_tasks: skipped, cost_summary: self.agents.cost_summary() }
    }

    /// Cost-ceiling admission check (§4.3 "Admission control") against
    /// an already-selected `model`. On rejection, marks the task
    /// `failed` and propagates `skipped` to its descendants, returning
    /// `false`.
    fn admit(
        &self,
        plan: &mut Plan,
        task_id: &TaskId,
        model: &hv_core::config::ModelChoice,
        skipped: &mut Vec<TaskId>,
        done: &HashSet<TaskId>,
    ) -> bool {
        let Some(ceiling) = self.config.cost_ceiling else { return true };
        if model.multiplier > 0 && self.agents.cost_summary().would_exceed(model.multiplier, ceiling) {
            self.bus.broadcast(Event::SessionWarning {
                session_id: self.session_id,
                warning_type: SessionWarningType::CostCeiling,
                message: format!("cost ceiling exceeded for task {task_id}"),
            });
            if let Some(task) = plan.task_mut(task_id) {
                task.status = TaskStatus::Failed;
            }
            self.publish_task_status(task_id, TaskStatus::Failed, None, None);
            self.propagate_skip(plan, task_id, skipped, done);
            return false;
        }
        true
    }

    async fn dispatch(
        &self,
        plan: &mut Plan,
        task_id: &TaskId,
        tier: hv_core::config::ModelTier,
        model: hv_core::config::ModelChoice,
        work_dir: &Path,
    ) -> hv_core::agent::AgentId {
        #[allow(clippy::expect_used)]
        let task = plan.task(task_id).expect("ready task exists in plan").clone();

        let prompt = match task.agent_ids.last() {
            Some(prior_agent_id) => self
                .agents
                .session_snapshot()
                .get(prior_agent_id)
                .and_then(|agent| agent.summary.clone())
                .map(|summary| summarizer::escalation_context(&task.label, &summary))
                .unwrap_or_else(|| task.label.clone()),
            None => task.label.clone(),
        };

        if let Some(task) = plan.task_mut(task_id) {
            task.status = TaskStatus::Running;
            task.tier = tier;
        }
        self.publish_task_status(task_id, TaskStatus::Running, Some(task.retries), Some(tier));

        let agent_id =
            self.agents.spawn(task_id.clone(), tier, model, task.retries, work_dir.to_path_buf(), prompt).await;
        if let Some(task) = plan.task_mut(task_id) {
            task.agent_ids.push(agent_id);
        }
        agent_id
    }

    fn handle_failure(
        &self,
        plan: &mut Plan,
        task_id: &TaskId,
        reason: Option<String>,
        ready: &mut VecDeque<TaskId>,
        failed: &mut Vec<TaskId>,
        skipped: &mut Vec<TaskId>,
        done: &HashSet<TaskId>,
    ) {
        let max_retries = self.config.max_retries_total;
        let retries = {
            #[allow(clippy::expect_used)]
            let task = plan.task_mut(task_id).expect("failing task exists in plan");
            task.retries += 1;
            task.retries
        };

        if retries < max_retries {
            ready.push_back(task_id.clone());
            return;
        }

        if let Some(task) = plan.task_mut(task_id) {
            task.status = TaskStatus::Failed;
        }
        failed.push(task_id.clone());
        self.publish_task_status(task_id, TaskStatus::Failed, Some(retries), None);
        let _ = reason;
        self.propagate_skip(plan, task_id, skipped, done);
    }

    /// Mark every descendant of an exhausted-failure task `skipped`
    /// (§4.3 "propagate to descendants as skipped").
    fn propagate_skip(&self, plan: &mut Plan, task_id: &TaskId, skipped: &mut Vec<TaskId>, done: &HashSet<TaskId>) {
        for descendant in plan.descendants_of(task_id) {
            if done.contains(&descendant) || skipped.contains(&descendant) {
                continue;
            }
            if let Some(task) = plan.task_mut(&descendant) {
                if task.status.is_terminal() {
                    continue;
                }
                task.status = TaskStatus::Skipped;
            }
            skipped.push(descendant.clone());
            self.publish_task_status(&descendant, TaskStatus::Skipped, None, None);
        }
    }

    fn publish_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        retries: Option<u32>,
        model_tier: Option<hv_core::config::ModelTier>,
    ) {
        self.bus.broadcast(Event::TaskStatus {
            task_id: task_id.clone(),
            session_id: self.session_id,
            status,
            retries,
            model_tier,
        });
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
