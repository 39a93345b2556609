// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide configuration: the model-tier escalation table,
//! timeouts, admission limits, and paths. A subset is overridable
//! per-project via `ProjectSettings` (persisted at
//! `projects/<slug>/settings.json`, see the REST surface).

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cost/capability class of a model. Escalation moves toward more
/// capable, more expensive tiers, ceiling T3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelTier {
    T0,
    T1,
    T2,
    T3,
}

impl ModelTier {
    pub const ALL: [ModelTier; 4] = [ModelTier::T0, ModelTier::T1, ModelTier::T2, ModelTier::T3];

    /// Default starting tier for a task absent a plan-assigned tier.
    pub const DEFAULT: ModelTier = ModelTier::T1;

    /// One step up the escalation ladder, saturating at T3.
    pub fn escalate(self) -> Self {
        match self {
            ModelTier::T0 => ModelTier::T1,
            ModelTier::T1 => ModelTier::T2,
            ModelTier::T2 | ModelTier::T3 => ModelTier::T3,
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ModelTier::T0 => "T0",
            ModelTier::T1 => "T1",
            ModelTier::T2 => "T2",
            ModelTier::T3 => "T3",
        })
    }
}

/// One entry in the `models[tier][retryIndex]` escalation table: the
/// model name to invoke and its cost `multiplier` added to
/// `totalPremiumRequests` on completion (0 for free-tier models).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelChoice {
    pub model: String,
    pub multiplier: u32,
}

impl ModelChoice {
    pub fn new(model: impl Into<String>, multiplier: u32) -> Self {
        Self { model: model.into(), multiplier }
    }
}

/// The escalation table: for each tier, an ordered list of model
/// choices indexed by retry count within that tier. Once a tier's
/// list is exhausted the tier rises (see `ModelTier::escalate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationTable {
    pub t0: Vec<ModelChoice>,
    pub t1: Vec<ModelChoice>,
    pub t2: Vec<ModelChoice>,
    pub t3: Vec<ModelChoice>,
}

impl EscalationTable {
    pub fn tier(&self, tier: ModelTier) -> &[ModelChoice] {
        match tier {
            ModelTier::T0 => &self.t0,
            ModelTier::T1 => &self.t1,
            ModelTier::T2 => &self.t2,
            ModelTier::T3 => &self.t3,
        }
    }
}

impl Default for EscalationTable {
    fn default() -> Self {
        Self {
            t0: vec![ModelChoice::new("backend-fast", 0)],
            t1: vec![ModelChoice::new("backend-standard-a", 1), ModelChoice::new("backend-standard-b", 1)],
            t2: vec![ModelChoice::new("backend-capable-a", 3), ModelChoice::new("backend-capable-b", 3)],
            t3: vec![ModelChoice::new("backend-frontier", 10)],
        }
    }
}

/// Per-project overrides, persisted at `projects/<slug>/settings.json`
/// and exposed via `GET/PUT /api/projects/:slug/settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Premium-request ceiling; `None` = unlimited.
    #[serde(default)]
    pub cost_ceiling: Option<u64>,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub escalation: Option<EscalationTable>,
    #[serde(default = "default_max_retries_total")]
    pub max_retries_total: u32,
}

fn default_max_concurrency() -> usize {
    3
}

fn default_max_retries_total() -> u32 {
    3
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            cost_ceiling: None,
            max_concurrency: default_max_concurrency(),
            escalation: None,
            max_retries_total: default_max_retries_total(),
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub escalation: EscalationTable,
    pub agent_timeout_ms: u64,
    pub orchestrator_timeout_ms: u64,
    pub checkpoint_interval_ms: u64,
    pub max_concurrency: usize,
    pub cost_ceiling: Option<u64>,
    pub max_retries_total: u32,
    pub workspace_root: PathBuf,
    pub timeline_cap: usize,
    pub agent_output_cap_bytes: usize,
    /// Grace window between SIGTERM and SIGKILL for killed agents, ms.
    pub kill_grace_ms: u64,
    /// Verify-fix loop round cap.
    pub verify_max_rounds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escalation: EscalationTable::default(),
            agent_timeout_ms: 300_000,
            orchestrator_timeout_ms: 300_000,
            checkpoint_interval_ms: 10_000,
            max_concurrency: 3,
            cost_ceiling: None,
            max_retries_total: 3,
            workspace_root: PathBuf::from(".haivemind-workspace"),
            timeline_cap: 5_000,
            agent_output_cap_bytes: 1 << 20,
            kill_grace_ms: 5_000,
            verify_max_rounds: 3,
        }
    }
}

impl Config {
    /// Parse a config from TOML text, falling back to defaults for
    /// any field left unspecified.
    pub fn from_toml(text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    /// Apply a project's settings overrides on top of this config.
    pub fn with_project_overrides(&self, settings: &ProjectSettings) -> Self {
        Self {
            escalation: settings.escalation.clone().unwrap_or_else(|| self.escalation.clone()),
            max_concurrency: settings.max_concurrency.max(1),
            cost_ceiling: settings.cost_ceiling,
            max_retries_total: settings.max_retries_total,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
