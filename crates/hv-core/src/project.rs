// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project identity and the persistent project record.
//!
//! A Project is created and destroyed by the user; destruction
//! cascades to its sessions (enforced by the workspace store, not
//! here — this module only carries the data).

use crate::config::ProjectSettings;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// URL-safe identifier for a project: lowercase ascii alphanumerics and
/// `-`/`_`, non-empty. Chosen by the user at creation time (unlike the
/// random [`crate::SessionId`]/[`crate::AgentId`]), so slugs are
/// validated rather than generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectSlug(String);

impl ProjectSlug {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        let valid = !s.is_empty()
            && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if valid {
            Ok(Self(s))
        } else {
            Err(CoreError::InvalidSlug(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for ProjectSlug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Project skills sub-record: accumulated hints fed to the Decomposer
/// and Verifier oracles (`{plan, workDir, {skills}}` in the spec).
/// Populated by the out-of-scope reflection/skill-extraction
/// collaborator; the core only carries and persists it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSkills {
    pub entries: Vec<String>,
}

/// Persistent project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub slug: ProjectSlug,
    pub name: String,
    pub directory: Option<PathBuf>,
    pub created_at_epoch_ms: u64,
    pub settings: ProjectSettings,
    pub skills: ProjectSkills,
}

impl Project {
    pub fn new(slug: ProjectSlug, name: impl Into<String>, created_at_epoch_ms: u64) -> Self {
        Self {
            slug,
            name: name.into(),
            directory: None,
            created_at_epoch_ms,
            settings: ProjectSettings::default(),
            skills: ProjectSkills::default(),
        }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
