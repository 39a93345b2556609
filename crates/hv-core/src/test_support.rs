// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::agent::{Agent, AgentId, AgentStatus};
use crate::config::ModelTier;
use crate::event::Event;
use crate::plan::Plan;
use crate::project::{Project, ProjectSlug};
use crate::session::{Session, SessionId};
use crate::task::{Task, TaskId, TaskStatus};
use std::path::PathBuf;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_task_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Pending),
            Just(TaskStatus::Ready),
            Just(TaskStatus::Running),
            Just(TaskStatus::Done),
            Just(TaskStatus::Failed),
            Just(TaskStatus::Skipped),
        ]
    }

    pub fn arb_agent_status() -> impl Strategy<Value = AgentStatus> {
        prop_oneof![
            Just(AgentStatus::Pending),
            Just(AgentStatus::Running),
            Just(AgentStatus::Success),
            Just(AgentStatus::Failed),
            Just(AgentStatus::Killed),
            Just(AgentStatus::Timeout),
        ]
    }

    pub fn arb_model_tier() -> impl Strategy<Value = ModelTier> {
        prop_oneof![
            Just(ModelTier::T0),
            Just(ModelTier::T1),
            Just(ModelTier::T2),
            Just(ModelTier::T3),
        ]
    }

    /// A small DAG: a linear chain `task-0 -> task-1 -> ... -> task-(n-1)`.
    pub fn arb_linear_plan(max_len: usize) -> impl Strategy<Value = Plan> {
        (1..=max_len.max(1)).prop_map(|n| {
            let tasks = (0..n)
                .map(|i| {
                    let deps = if i == 0 { vec![] } else { vec![task_id(&format!("task-{}", i - 1))] };
                    Task::new(task_id(&format!("task-{i}")), format!("task {i}"), deps)
                })
                .collect();
            Plan::from_tasks(tasks)
        })
    }
}

// ── Factory functions ───────────────────────────────────────────────────

pub fn task_id(s: &str) -> TaskId {
    TaskId::new(s)
}

pub fn project_slug(s: &str) -> ProjectSlug {
    ProjectSlug::new(s).expect("valid test slug")
}

pub fn project(slug: &str) -> Project {
    Project::new(project_slug(slug), slug, 1_000_000)
}

pub fn task(id: &str, deps: &[&str]) -> Task {
    Task::new(task_id(id), id, deps.iter().map(|d| task_id(d)).collect())
}

pub fn session(slug: &str, prompt: &str) -> Session {
    Session::new(project_slug(slug), prompt, PathBuf::from("/test/workspace"), 1_000_000, 100)
}

pub fn agent(task: &str, model: &str, tier: ModelTier, multiplier: u32) -> Agent {
    Agent::new(task_id(task), model, tier, multiplier, 0, 1_000_000)
}

pub fn session_start_event(session_id: SessionId, slug: &str, prompt: &str) -> Event {
    Event::SessionStart { session_id, project_slug: project_slug(slug), prompt: prompt.to_string() }
}

pub fn task_status_event(task: &str, session_id: SessionId, status: TaskStatus) -> Event {
    Event::TaskStatus { task_id: task_id(task), session_id, status, retries: None, model_tier: None }
}

pub fn agent_status_event(agent_id: AgentId, task: &str, session_id: SessionId, status: AgentStatus) -> Event {
    Event::AgentStatus {
        agent_id,
        task_id: task_id(task),
        session_id,
        status,
        model: "test-model".to_string(),
        model_tier: ModelTier::T1,
        multiplier: 1,
        reason: None,
    }
}
