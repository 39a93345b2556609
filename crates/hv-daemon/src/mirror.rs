// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-sourced mirror of a live session's plan and timeline, kept in
//! sync by subscribing to its own bus traffic rather than sharing a
//! borrow with the Task Runner (which holds `&mut Plan` for the
//! duration of a drain). The Checkpoint Service's periodic timer reads
//! this mirror; the Agent Manager remains the sole source of truth for
//! agent records and cost, fetched directly since it needs no mirror.

use hv_bus::EventBus;
use hv_core::event::Event;
use hv_core::plan::Plan;
use hv_core::project::ProjectSlug;
use hv_core::session::SessionId;
use hv_core::timeline::Timeline;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct SessionMirror {
    plan: Mutex<Plan>,
    timeline: Mutex<Timeline>,
}

impl SessionMirror {
    pub fn new(initial_plan: Plan, timeline_cap: usize) -> Arc<Self> {
        Arc::new(Self { plan: Mutex::new(initial_plan), timeline: Mutex::new(Timeline::new(timeline_cap)) })
    }

    pub fn plan_snapshot(&self) -> Plan {
        self.plan.lock().clone()
    }

    pub fn timeline_snapshot(&self) -> Timeline {
        self.timeline.lock().clone()
    }

    /// Replace the mirrored plan outright — called when the Session
    /// Service appends an incremental plan for the chat re-entry path,
    /// since that happens outside the bus (no `task:status` event
    /// marks "a new task was appended to the plan").
    pub fn reset_plan(&self, plan: Plan) {
        *self.plan.lock() = plan;
    }

    fn apply(&self, event: &Event) {
        if !event.is_timeline_exempt() {
            self.timeline.lock().push(event.clone());
        }
        if let Event::TaskStatus { task_id, status, retries, model_tier, .. } = event {
            let mut plan = self.plan.lock();
            if let Some(task) = plan.task_mut(task_id) {
                task.status = *status;
                if let Some(retries) = retries {
                    task.retries = *retries;
                }
                if let Some(tier) = model_tier {
                    task.tier = *tier;
                }
            }
        }
    }

    /// Subscribe to `project_slug`'s events and mirror everything
    /// belonging to `session_id` until `cancel` fires.
    pub fn spawn_listener(
        self: &Arc<Self>,
        bus: EventBus,
        session_id: SessionId,
        project_slug: ProjectSlug,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let mirror = Arc::clone(self);
        tokio::spawn(async move {
            let (sub_id, mut rx) = bus.subscribe_with_capacity(256);
            bus.subscribe_project(sub_id, project_slug);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = rx.recv() => {
                        match received {
                            Some(event) if event.session_id() == Some(session_id) => mirror.apply(&event),
                            Some(_) => {}
                            None => break,
                        }
                    }
                }
            }
            bus.unsubscribe(sub_id);
        })
    }
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;
