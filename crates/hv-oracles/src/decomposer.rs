// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decomposer oracle: converts a prompt into a task plan (§1, §4.5
//! step 5). A pure function from the core's point of view — it runs
//! as a subprocess with its own `orchestratorTimeoutMs`, enforced by
//! the caller, not by this trait.

use crate::error::OracleError;
use async_trait::async_trait;
use hv_core::plan::Plan;
use hv_core::project::ProjectSkills;
use hv_core::task::{Task, TaskId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Decomposer: Send + Sync + 'static {
    /// Decompose `prompt` into a plan. `existing` is `Some` for the
    /// chat/iteration re-entry path (§4.5 "Chat / iteration"): an
    /// incremental plan whose new tasks have no edges to prior tasks
    /// unless explicitly supplied.
    async fn decompose(
        &self,
        prompt: &str,
        skills: &ProjectSkills,
        existing: Option<&Plan>,
    ) -> Result<Plan, OracleError>;
}

/// Deterministic fake: returns a scripted plan for an exact prompt
/// match, or a single-task fallback plan otherwise. Mirrors the
/// backend's `MockBackend` test-double shape.
#[derive(Clone, Default)]
pub struct MockDecomposer {
    scripts: Arc<Mutex<HashMap<String, Plan>>>,
}

impl MockDecomposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, prompt: impl Into<String>, plan: Plan) {
        self.scripts.lock().insert(prompt.into(), plan);
    }

    /// Build a linear chain `task-0 -> task-1 -> ... -> task-(n-1)`,
    /// the shape used by the happy-path end-to-end scenario (§8).
    pub fn linear_chain(labels: &[&str]) -> Plan {
        let tasks = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let deps = if i == 0 { vec![] } else { vec![TaskId::new(format!("task-{}", i - 1))] };
                Task::new(TaskId::new(format!("task-{i}")), *label, deps)
            })
            .collect();
        Plan::from_tasks(tasks)
    }
}

#[async_trait]
impl Decomposer for MockDecomposer {
    async fn decompose(
        &self,
        prompt: &str,
        _skills: &ProjectSkills,
        existing: Option<&Plan>,
    ) -> Result<Plan, OracleError> {
        if let Some(scripted) = self.scripts.lock().get(prompt).cloned() {
            return Ok(scripted);
        }
        match existing {
            // Incremental plan: append with no edges to prior tasks,
            // numbered past the end of the prior plan so ids never
            // collide (§4.5 "Chat / iteration").
            Some(prior) => {
                let mut plan = prior.clone();
                let next = prior.tasks.len();
                plan.tasks.push(Task::new(
                    TaskId::new(format!("task-{next}")),
                    "implement the follow-up request",
                    vec![],
                ));
                Ok(plan)
            }
            None => Ok(Self::linear_chain(&["implement the request"])),
        }
    }
}

#[cfg(test)]
#[path = "decomposer_tests.rs"]
mod tests;
