// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Manager: spawns, supervises, and accounts for per-task worker
//! subprocesses (§4.2).

use crate::error::EngineError;
use crate::summarizer;
use hv_bus::EventBus;
use hv_core::agent::{Agent, AgentId, AgentStatus};
use hv_core::clock::Clock;
use hv_core::config::{Config, ModelChoice, ModelTier};
use hv_core::cost::CostSummary;
use hv_core::event::Event;
use hv_core::session::SessionId;
use hv_core::task::TaskId;
use hv_oracles::{Backend, BackendExit, BackendSpawnSpec};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

type WaitResult = Result<(AgentStatus, Option<String>), EngineError>;

struct ManagerState {
    agents: HashMap<AgentId, Agent>,
    waiters: HashMap<AgentId, oneshot::Receiver<(AgentStatus, Option<String>)>>,
    live: HashMap<AgentId, Arc<dyn hv_oracles::BackendHandle>>,
    retry_index_by_task: HashMap<TaskId, usize>,
    cost: CostSummary,
}

/// Supervises every agent for a single session. Cheap to clone — all
/// state lives behind the inner `Arc`.
pub struct AgentManager<C: Clock> {
    backend: Arc<dyn Backend>,
    bus: EventBus,
    config: Config,
    session_id: SessionId,
    clock: C,
    state: Arc<Mutex<ManagerState>>,
}

impl<C: Clock> Clone for AgentManager<C> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            bus: self.bus.clone(),
            config: self.config.clone(),
            session_id: self.session_id,
            clock: self.clock.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C: Clock + 'static> AgentManager<C> {
    pub fn new(backend: Arc<dyn Backend>, bus: EventBus, config: Config, session_id: SessionId, clock: C) -> Self {
        Self {
            backend,
            bus,
            config,
            session_id,
            clock,
            state: Arc::new(Mutex::new(ManagerState {
                agents: HashMap::new(),
                waiters: HashMap::new(),
                live: HashMap::new(),
                retry_index_by_task: HashMap::new(),
                cost: CostSummary::default(),
            })),
        }
    }

    /// Select the next `(tier, model)` for a task attempt, escalating
    /// the tier once its retry list is exhausted (§4.2 tier escalation
    /// policy). Call before each `spawn`; the retry index advances on
    /// every call for the same task and resets when the tier rises.
    pub fn next_model(&self, task_id: &TaskId, current_tier: ModelTier) -> (ModelTier, ModelChoice) {
        let mut state = self.state.lock();
        let retry_index = state.retry_index_by_task.entry(task_id.clone()).or_insert(0);
        let choices = self.config.escalation.tier(current_tier);

        if let Some(choice) = choices.get(*retry_index) {
            let choice = choice.clone();
            *retry_index += 1;
            return (current_tier, choice);
        }

        let escalated = current_tier.escalate();
        if escalated == current_tier {
            // Already at the ceiling with its list exhausted: repeat
            // the last entry rather than panic on an empty table.
            let fallback = choices.last().cloned().unwrap_or_else(|| ModelChoice::new("unknown", 0));
            return (current_tier, fallback);
        }
        *retry_index = 1;
        let escalated_choices = self.config.escalation.tier(escalated);
        let choice = escalated_choices.first().cloned().unwrap_or_else(|| ModelChoice::new("unknown", 0));
        (escalated, choice)
    }

    /// Spawn a subprocess attempt at `task_id` and return its agent
    /// record id immediately; the terminal outcome resolves through
    /// [`AgentManager::wait`] (§4.2 `spawn`).
    pub async fn spawn(
        &self,
        task_id: TaskId,
        tier: ModelTier,
        model: ModelChoice,
        retries: u32,
        work_dir: PathBuf,
        prompt: String,
    ) -> AgentId {
        let now = self.clock.epoch_ms();
        let agent = Agent::new(task_id.clone(), model.model.clone(), tier, model.multiplier, retries, now);
        let agent_id = agent.id;

        let (done_tx, done_rx) = oneshot::channel();
        {
            let mut state = self.state.lock();
            state.agents.insert(agent_id, agent);
            state.waiters.insert(agent_id, done_rx);
        }

        self.bus.broadcast(Event::AgentStatus {
            agent_id,
            task_id: task_id.clone(),
            session_id: self.session_id,
            status: AgentStatus::Running,
            model: model.model.clone(),
            model_tier: tier,
            multiplier: model.multiplier,
            reason: None,
        });

        let manager = self.clone();
        tokio::spawn(async move {
            manager.run(agent_id, task_id, tier, model, work_dir, prompt, done_tx).await;
        });

        agent_id
    }

    async fn run(
        &self,
        agent_id: AgentId,
        task_id: TaskId,
        tier: ModelTier,
        model: ModelChoice,
        work_dir: PathBuf,
        prompt: String,
        done_tx: oneshot::Sender<(AgentStatus, Option<String>)>,
    ) {
        let (output_tx, mut output_rx) = mpsc::channel::<Vec<u8>>(64);
        let spec = BackendSpawnSpec { task_id: task_id.clone(), model: model.model.clone(), work_dir, prompt };

        let handle: Arc<dyn hv_oracles::BackendHandle> = match self.backend.spawn(spec, output_tx).await {
            Ok(handle) => Arc::from(handle),
            Err(e) => {
                self.finish(agent_id, &task_id, tier, model.multiplier, AgentStatus::Failed, Some(e.to_string()))
                    .await;
                let _ = done_tx.send((AgentStatus::Failed, Some(e.to_string())));
                return;
            }
        };
        self.state.lock().live.insert(agent_id, handle.clone());

        let reader_state = self.state.clone();
        let reader_bus = self.bus.clone();
        let session_id = self.session_id;
        let reader_cap = self.config.agent_output_cap_bytes;
        let reader_agent_id = agent_id;
        let reader = tokio::spawn(async move {
            while let Some(chunk) = output_rx.recv().await {
                {
                    let mut state = reader_state.lock();
                    if let Some(agent) = state.agents.get_mut(&reader_agent_id) {
                        agent.append_output(&chunk, reader_cap);
                    }
                }
                reader_bus.broadcast(Event::AgentOutput {
                    agent_id: reader_agent_id,
                    session_id,
                    chunk: String::from_utf8_lossy(&chunk).into_owned(),
                });
            }
        });

        enum Outcome {
            Exited(BackendExit),
            TimedOut,
        }

        let outcome = tokio::select! {
            exit = handle.wait() => Outcome::Exited(exit),
            () = tokio::time::sleep(Duration::from_millis(self.config.agent_timeout_ms)) => Outcome::TimedOut,
        };
        let (status, reason) = match outcome {
            Outcome::Exited(BackendExit::Success) => (AgentStatus::Success, None),
            Outcome::Exited(BackendExit::Failure) => {
                (AgentStatus::Failed, Some("backend exited with failure".to_string()))
            }
            // Process exited with Killed without this task having timed
            // it out itself: it was killed externally via `kill_all`.
            Outcome::Exited(BackendExit::Killed) => (AgentStatus::Killed, Some("agent killed".to_string())),
            Outcome::TimedOut => {
                warn!(agent = %agent_id, "agent timed out, escalating SIGTERM -> SIGKILL");
                handle.terminate().await;
                tokio::time::sleep(Duration::from_millis(self.config.kill_grace_ms)).await;
                handle.kill().await;
                (
                    AgentStatus::Timeout,
                    Some(format!("Agent timed out after {} minutes", self.config.agent_timeout_ms / 60_000)),
                )
            }
        };
        let _ = reader.await;
        self.state.lock().live.remove(&agent_id);

        self.finish(agent_id, &task_id, tier, model.multiplier, status, reason.clone()).await;
        let _ = done_tx.send((status, reason));
    }

    async fn finish(
        &self,
        agent_id: AgentId,
        task_id: &TaskId,
        tier: ModelTier,
        multiplier: u32,
        status: AgentStatus,
        reason: Option<String>,
    ) {
        let ended_at = self.clock.epoch_ms();
        let model = {
            let mut state = self.state.lock();
            state.cost.record(tier, multiplier);
            #[allow(clippy::expect_used)]
            let agent = state.agents.get_mut(&agent_id).expect("agent record inserted at spawn time");
            agent.status = status;
            agent.ended_at_epoch_ms = Some(ended_at);
            agent.reason = reason.clone();
            agent.summary = Some(summarizer::summarize(&agent.output));
            agent.model.clone()
        };

        self.bus.broadcast(Event::AgentStatus {
            agent_id,
            task_id: task_id.clone(),
            session_id: self.session_id,
            status,
            model,
            model_tier: tier,
            multiplier,
            reason,
        });
    }

    /// Resolve when `agent_id` reaches a terminal status.
    pub async fn wait(&self, agent_id: AgentId) -> WaitResult {
        let receiver = {
            let mut state = self.state.lock();
            state.waiters.remove(&agent_id)
        }
        .ok_or(EngineError::UnknownAgent(agent_id))?;
        receiver.await.map_err(|_| EngineError::UnknownAgent(agent_id))
    }

    /// SIGTERM every live child, wait the configured grace window,
    /// then SIGKILL. Idempotent: a call with nothing live returns 0.
    pub async fn kill_all(&self) -> usize {
        let handles: Vec<_> = {
            let mut state = self.state.lock();
            state.live.drain().map(|(_, h)| h).collect()
        };
        if handles.is_empty() {
            return 0;
        }
        for handle in &handles {
            handle.terminate().await;
        }
        tokio::time::sleep(Duration::from_millis(self.config.kill_grace_ms)).await;
        for handle in &handles {
            handle.kill().await;
        }
        handles.len()
    }

    /// Read-only snapshot of every agent record spawned this session.
    pub fn session_snapshot(&self) -> HashMap<AgentId, Agent> {
        self.state.lock().agents.clone()
    }

    pub fn cost_summary(&self) -> CostSummary {
        self.state.lock().cost.clone()
    }
}

#[cfg(test)]
#[path = "agent_manager_tests.rs"]
mod tests;
