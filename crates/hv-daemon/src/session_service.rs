// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Service: the 12-step lifecycle that turns a prompt into a
//! finalized session (§4.5). Owns the one piece of orchestration no
//! other crate does — wiring the Decomposer, Snapshot, Task Runner, and
//! Verify-Fix Loop together behind the process-wide locks from
//! [`crate::lock`] and the Checkpoint Service from `hv-storage`.

use crate::error::SessionError;
use crate::lock::{LiveSessions, SessionStartLocks, WorkDirLocks};
use crate::mirror::SessionMirror;
use hv_bus::EventBus;
use hv_core::checkpoint::Checkpoint;
use hv_core::clock::Clock;
use hv_core::config::Config;
use hv_core::event::{Event, PlanEdgeSummary, PlanTaskSummary};
use hv_core::plan::Plan;
use hv_core::project::ProjectSlug;
use hv_core::session::{Session, SessionStatus};
use hv_core::task::TaskId;
use hv_engine::{AgentManager, TaskRunner, VerifyFixLoop};
use hv_oracles::{Backend, Decomposer, Snapshot, Verifier, WorkspaceStore};
use hv_storage::{CheckpointStore, CheckpointTimer};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Collaborators the Session Service wires together. Constructed once
/// at daemon startup and shared across every project.
pub struct SessionService<C: Clock + 'static> {
    config: Config,
    bus: EventBus,
    workspace: Arc<dyn WorkspaceStore>,
    decomposer: Arc<dyn Decomposer>,
    verifier: Arc<dyn Verifier>,
    snapshot: Arc<dyn Snapshot>,
    backend: Arc<dyn Backend>,
    checkpoints: CheckpointStore,
    clock: C,
    work_dir_locks: WorkDirLocks,
    start_locks: SessionStartLocks,
    live_sessions: LiveSessions,
    /// `--mock` CLI runs skip the Verify-Fix Loop entirely (§4.5 step
    /// 8 "unless mock").
    skip_verify_fix: bool,
}

impl<C: Clock + 'static> SessionService<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        bus: EventBus,
        workspace: Arc<dyn WorkspaceStore>,
        decomposer: Arc<dyn Decomposer>,
        verifier: Arc<dyn Verifier>,
        snapshot: Arc<dyn Snapshot>,
        backend: Arc<dyn Backend>,
        checkpoints: CheckpointStore,
        clock: C,
        skip_verify_fix: bool,
    ) -> Self {
        Self {
            config,
            bus,
            workspace,
            decomposer,
            verifier,
            snapshot,
            backend,
            checkpoints,
            clock,
            work_dir_locks: WorkDirLocks::new(),
            start_locks: SessionStartLocks::new(),
            live_sessions: LiveSessions::new(),
            skip_verify_fix,
        }
    }

    /// The live-session registry, for [`crate::shutdown`] to cancel
    /// every running session without holding any of their `Plan`
    /// borrows.
    pub fn live_sessions(&self) -> LiveSessions {
        self.live_sessions.clone()
    }

    /// Start a brand-new session for `slug` (§4.5 steps 1-12).
    pub async fn start(&self, slug: &ProjectSlug, prompt: impl Into<String>) -> Result<Session, SessionError> {
        self.run(slug, prompt.into(), None).await
    }

    /// Re-enter a previously finalized session with a follow-up prompt
    /// (§4.5 "Chat / iteration"): reuses `workDir` and `snapshotRef`,
    /// skips straight to decompose-with-existing-plan at step 5.
    pub async fn continue_chat(
        &self,
        slug: &ProjectSlug,
        session: Session,
        prompt: impl Into<String>,
    ) -> Result<Session, SessionError> {
        self.run(slug, prompt.into(), Some(session)).await
    }

    async fn run(
        &self,
        slug: &ProjectSlug,
        prompt: String,
        existing: Option<Session>,
    ) -> Result<Session, SessionError> {
        // Step 1: validate project exists; acquire per-project start lock.
        let project =
            self.workspace.get_project(slug).await?.ok_or_else(|| SessionError::UnknownProject(slug.clone()))?;
        let start_guard =
            self.start_locks.try_acquire(slug).ok_or_else(|| SessionError::SessionInFlight(slug.clone()))?;

        let config = self.config.with_project_overrides(&project.settings);
        let is_chat = existing.is_some();

        // Step 2: allocate sessionId / workDir, or reuse the existing
        // session record for a chat re-entry.
        let mut session = match existing {
            Some(mut prior) => {
                prior.status = SessionStatus::Running;
                prior.prompt.clone_from(&prompt);
                prior.ended_at_epoch_ms = None;
                prior
            }
            None => {
                let work_dir = project
                    .directory
                    .clone()
                    .unwrap_or_else(|| config.workspace_root.join("projects").join(slug.as_str()).join("work"));
                Session::new(slug.clone(), prompt.clone(), work_dir, self.clock.epoch_ms(), config.timeline_cap)
            }
        };

        self.bus.register_session(session.id, slug.clone());
        self.bus.broadcast(Event::SessionStart {
            session_id: session.id,
            project_slug: slug.clone(),
            prompt: prompt.clone(),
        });

        let work_dir_guard = self.work_dir_locks.acquire(&session.work_dir).await;
        let cancel = CancellationToken::new();
        self.live_sessions.register(session.id, cancel.clone());

        // Step 3: snapshot rollback point (skipped on chat re-entry —
        // the prior session's snapshot still covers this workDir).
        if !is_chat {
            match self.snapshot.create(&session.work_dir).await {
                Ok(snapshot_ref) => session.snapshot_ref = Some(snapshot_ref),
                Err(e) => {
                    self.live_sessions.unregister(session.id);
                    self.bus.forget_session(&session.id);
                    return Err(SessionError::SnapshotFailed(e.to_string()));
                }
            }
        }

        // Step 4: project skills (settings already folded into `config`).
        let skills = match self.workspace.get_skills(slug).await {
            Ok(skills) => skills,
            Err(e) => {
                self.live_sessions.unregister(session.id);
                self.bus.forget_session(&session.id);
                return Err(e.into());
            }
        };

        let prior_task_ids: HashSet<TaskId> = session.plan.tasks.iter().map(|t| t.id.clone()).collect();
        let existing_plan_for_decompose = if is_chat { Some(session.plan.clone()) } else { None };

        let mirror = SessionMirror::new(session.plan.clone(), config.timeline_cap);
        let mirror_handle = mirror.spawn_listener(self.bus.clone(), session.id, slug.clone(), cancel.clone());

        let agent_manager =
            AgentManager::new(self.backend.clone(), self.bus.clone(), config.clone(), session.id, self.clock.clone());

        let timer_handle = self.spawn_checkpoint_timer(&session, &config, Arc::clone(&mirror), agent_manager.clone(), cancel.clone());

        let outcome = self
            .run_inner(&config, &mut session, existing_plan_for_decompose.as_ref(), &prior_task_ids, &agent_manager, &mirror, &skills, &cancel)
            .await;

        // Step 12: always-run cleanup, regardless of outcome. A session
        // cancelled from outside (graceful shutdown, §5) never reaches
        // Completed/Failed — its checkpoint is deliberately left on disk
        // for the Checkpoint Service's startup recovery scan to pick up.
        let was_cancelled = cancel.is_cancelled();
        cancel.cancel();
        let _ = mirror_handle.await;
        let _ = timer_handle.await;
        agent_manager.kill_all().await;

        if was_cancelled {
            session.status = SessionStatus::Interrupted;
            session.ended_at_epoch_ms = Some(self.clock.epoch_ms());
            session.agents = agent_manager.session_snapshot();
            session.cost_summary = agent_manager.cost_summary();
            session.plan = mirror.plan_snapshot();
            session.timeline = mirror.timeline_snapshot();

            // §5 shutdown step 2: flush this session's checkpoint one
            // more time before the grace window — the recovery scan on
            // next startup is what actually materializes the
            // interrupted-session record, so the checkpoint file must
            // reflect the final state, not the last periodic tick.
            if let Err(e) = self.checkpoints.write(&Checkpoint::from_session(&session, self.clock.epoch_ms())).await {
                warn!(session_id = %session.id, error = %e, "failed to flush checkpoint on interrupt");
            }

            // Broadcast before forgetting the session — the bus resolves
            // this event's project via the session index, which
            // `forget_session` below tears down.
            self.bus.broadcast(Event::SessionInterrupted { session_id: session.id });
            self.live_sessions.unregister(session.id);
            self.bus.forget_session(&session.id);
            drop(work_dir_guard);
            drop(start_guard);
            return Ok(session);
        }

        self.live_sessions.unregister(session.id);
        self.bus.forget_session(&session.id);
        drop(work_dir_guard);
        drop(start_guard);

        if let Err(e) = self.checkpoints.delete(session.id).await {
            warn!(session_id = %session.id, error = %e, "failed to delete checkpoint on finalize");
        }

        match outcome {
            Ok(()) => {
                session.status = SessionStatus::Completed;
                session.ended_at_epoch_ms = Some(self.clock.epoch_ms());
                session.agents = agent_manager.session_snapshot();
                session.cost_summary = agent_manager.cost_summary();
                session.plan = mirror.plan_snapshot();
                session.timeline = mirror.timeline_snapshot();

                if let Err(e) = self.workspace.save_session(&session).await {
                    error!(session_id = %session.id, error = %e, "failed to persist completed session");
                }
                self.bus.broadcast(Event::SessionComplete {
                    session_id: session.id,
                    cost_summary: session.cost_summary.clone(),
                });
                Ok(session)
            }
            Err(e) => {
                session.status = SessionStatus::Failed;
                session.ended_at_epoch_ms = Some(self.clock.epoch_ms());
                session.agents = agent_manager.session_snapshot();
                session.cost_summary = agent_manager.cost_summary();
                session.plan = mirror.plan_snapshot();
                session.timeline = mirror.timeline_snapshot();

                if let Err(save_err) = self.workspace.save_session(&session).await {
                    error!(session_id = %session.id, error = %save_err, "failed to persist failed session");
                }
                self.bus.broadcast(Event::SessionError { session_id: session.id, error: e.to_string() });
                Err(e)
            }
        }
    }

    /// Steps 5-10: decompose, validate, drain, verify-fix, tally.
    #[allow(clippy::too_many_arguments)]
    async fn run_inner(
        &self,
        config: &Config,
        session: &mut Session,
        existing_plan: Option<&Plan>,
        prior_task_ids: &HashSet<TaskId>,
        agent_manager: &AgentManager<C>,
        mirror: &Arc<SessionMirror>,
        skills: &hv_core::project::ProjectSkills,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        // Step 5: decompose under the orchestrator timeout.
        let plan = match tokio::time::timeout(
            Duration::from_millis(config.orchestrator_timeout_ms),
            self.decomposer.decompose(&session.prompt, skills, existing_plan),
        )
        .await
        {
            Ok(Ok(plan)) => plan,
            Ok(Err(e)) => return Err(SessionError::DecomposeFailed(e.to_string())),
            Err(_) => return Err(SessionError::DecomposeTimeout(config.orchestrator_timeout_ms)),
        };

        // §8 boundary: cyclic plan rejected before any agent spawns.
        if let Some(cycle) = plan.find_cycle() {
            return Err(SessionError::CyclicPlan(cycle.iter().map(|id| id.to_string()).collect()));
        }

        session.plan = plan;
        mirror.reset_plan(session.plan.clone());

        // Step 6: publish plan:created, checkpoint immediately.
        self.bus.broadcast(Event::PlanCreated {
            session_id: session.id,
            tasks: session
                .plan
                .tasks
                .iter()
                .map(|t| PlanTaskSummary { id: t.id.clone(), label: t.label.clone(), dependencies: t.dependencies.clone() })
                .collect(),
            edges: session.plan.edges.iter().map(|e| PlanEdgeSummary { source: e.source.clone(), target: e.target.clone() }).collect(),
        });
        self.checkpoints.write(&Checkpoint::from_session(session, self.clock.epoch_ms())).await?;

        // Step 7: drain the DAG. A chat re-entry only admits newly
        // appended tasks — everything from the prior plan is already
        // `done` and must not be re-run (§4.5 "Chat / iteration").
        let runner =
            TaskRunner::new(agent_manager.clone(), self.bus.clone(), session.id, config.clone(), cancel.clone());
        let new_task_ids: Vec<TaskId> =
            session.plan.tasks.iter().map(|t| t.id.clone()).filter(|id| !prior_task_ids.contains(id)).collect();

        if existing_plan.is_some() {
            runner.run_follow_ups(&mut session.plan, &session.work_dir, new_task_ids).await;
        } else {
            runner.run(&mut session.plan, &session.work_dir).await;
        }
        mirror.reset_plan(session.plan.clone());

        // Step 8: verify-fix loop, unless running in mock mode.
        if !self.skip_verify_fix {
            let verify_loop = VerifyFixLoop::new(self.verifier.clone(), runner, self.bus.clone(), session.id, config);
            let outcome = verify_loop.run(&mut session.plan, &session.work_dir, skills).await;
            mirror.reset_plan(session.plan.clone());
            if !outcome.passed {
                info!(session_id = %session.id, rounds = outcome.rounds_run, "verify-fix loop did not converge");
            }
        }

        Ok(())
    }

    fn spawn_checkpoint_timer(
        &self,
        session: &Session,
        config: &Config,
        mirror: Arc<SessionMirror>,
        agent_manager: AgentManager<C>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let timer = CheckpointTimer::new(self.checkpoints.clone(), config.checkpoint_interval_ms, cancel);
        let session_id = session.id;
        let project_slug = session.project_slug.clone();
        let prompt = session.prompt.clone();
        let work_dir = session.work_dir.clone();
        let clock = self.clock.clone();

        timer.spawn(move || {
            vec![Checkpoint {
                session_id,
                project_slug: project_slug.clone(),
                checkpointed_at_epoch_ms: clock.epoch_ms(),
                prompt: prompt.clone(),
                plan: mirror.plan_snapshot(),
                agents: agent_manager.session_snapshot(),
                timeline: mirror.timeline_snapshot(),
                cost_summary: agent_manager.cost_summary(),
                work_dir: work_dir.clone(),
            }]
        })
    }
}

#[cfg(test)]
#[path = "session_service_tests.rs"]
mod tests;
