// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan: `{ tasks, edges }`, derived from each task's `dependencies`
//! and stored both ways to simplify traversal (§3). Cycle detection
//! and descendant lookup are pure graph algorithms over this shape, so
//! they live here rather than in the scheduler that consumes them.

use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A directed edge `(source, target)`: `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: TaskId,
    pub target: TaskId,
}

/// `{ tasks: [...], edges: [(source, target), ...] }` (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub tasks: Vec<Task>,
    pub edges: Vec<Edge>,
}

impl Plan {
    /// Build a plan from tasks alone, deriving `edges` from each
    /// task's `dependencies` (dependency -> dependent).
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut edges = Vec::new();
        for task in &tasks {
            for dep in &task.dependencies {
                edges.push(Edge { source: dep.clone(), target: task.id.clone() });
            }
        }
        Self { tasks, edges }
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Tasks with no dependencies, in plan (insertion) order — the
    /// initial `ready` set and the tie-break order for simultaneously
    /// ready tasks (§4.3).
    pub fn initial_ready(&self) -> Vec<TaskId> {
        self.tasks.iter().filter(|t| t.dependencies.is_empty()).map(|t| t.id.clone()).collect()
    }

    /// Direct dependents of `id`, in plan order.
    pub fn dependents_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.edges.iter().filter(|e| &e.source == id).map(|e| e.target.clone()).collect()
    }

    /// Every dependency of `id` is `done` (vacuously true if none).
    pub fn all_deps_done(&self, id: &TaskId, done: &HashSet<TaskId>) -> bool {
        self.task(id).is_some_and(|t| t.dependencies.iter().all(|d| done.contains(d)))
    }

    /// DFS cycle detection over `edges`. Returns the first cycle found
    /// as a `Vec<TaskId>` naming the loop, or `None` if the plan is
    /// acyclic (§9 Design Notes, §8 boundary: "Cyclic plan -> detected
    /// and rejected before any agent spawns").
    pub fn find_cycle(&self) -> Option<Vec<TaskId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut adjacency: HashMap<&TaskId, Vec<&TaskId>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(&edge.source).or_default().push(&edge.target);
        }

        let mut marks: HashMap<&TaskId, Mark> =
            self.tasks.iter().map(|t| (&t.id, Mark::Unvisited)).collect();
        let mut stack: Vec<&TaskId> = Vec::new();

        fn visit<'a>(
            node: &'a TaskId,
            adjacency: &HashMap<&'a TaskId, Vec<&'a TaskId>>,
            marks: &mut HashMap<&'a TaskId, Mark>,
            stack: &mut Vec<&'a TaskId>,
        ) -> Option<Vec<TaskId>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::InProgress) => {
                    let start = stack.iter().position(|n| *n == node).unwrap_or(0);
                    let mut cycle: Vec<TaskId> = stack[start..].iter().map(|n| (*n).clone()).collect();
                    cycle.push(node.clone());
                    return Some(cycle);
                }
                _ => {}
            }
            marks.insert(node, Mark::InProgress);
            stack.push(node);
            if let Some(children) = adjacency.get(node) {
                for child in children {
                    if let Some(cycle) = visit(child, adjacency, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        for task in &self.tasks {
            if let Some(cycle) = visit(&task.id, &adjacency, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }

    /// All descendants of `id` (transitive closure over `edges`),
    /// used to propagate `failed` to `skipped` (§4.3).
    pub fn descendants_of(&self, id: &TaskId) -> Vec<TaskId> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<TaskId> = self.dependents_of(id).into();
        let mut result = Vec::new();
        while let Some(next) = queue.pop_front() {
            if seen.insert(next.clone()) {
                result.push(next.clone());
                queue.extend(self.dependents_of(&next));
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
