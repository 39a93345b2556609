// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace store: durable project/session record keeper (§1 out-of-
//! scope collaborators — "the core consumes CRUD operations and
//! persistence of finalized sessions"). The filesystem implementation
//! follows the persisted layout in §6:
//!
//! ```text
//! projects/<slug>/project.json
//! projects/<slug>/sessions/<sessionId>.json
//! projects/<slug>/skills.json
//! projects/<slug>/settings.json
//! ```
//!
//! Writes are atomic (temp file + rename), matching the checkpoint
//! directory's discipline (§5 "Shared resources").

use crate::error::OracleError;
use async_trait::async_trait;
use hv_core::project::{Project, ProjectSkills, ProjectSlug};
use hv_core::session::{Session, SessionId};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[async_trait]
pub trait WorkspaceStore: Send + Sync + 'static {
    async fn create_project(&self, project: Project) -> Result<(), OracleError>;
    async fn get_project(&self, slug: &ProjectSlug) -> Result<Option<Project>, OracleError>;
    async fn list_projects(&self) -> Result<Vec<Project>, OracleError>;
    /// Cascades to every session under the project (§3 Project lifecycle).
    async fn delete_project(&self, slug: &ProjectSlug) -> Result<(), OracleError>;

    async fn put_skills(&self, slug: &ProjectSlug, skills: &ProjectSkills) -> Result<(), OracleError>;
    async fn get_skills(&self, slug: &ProjectSlug) -> Result<ProjectSkills, OracleError>;

    /// Persist a finalized session. Non-finalized sessions live only
    /// in memory plus the checkpoint subsystem (§4.6).
    async fn save_session(&self, session: &Session) -> Result<(), OracleError>;
    async fn get_session(
        &self,
        slug: &ProjectSlug,
        session_id: &SessionId,
    ) -> Result<Option<Session>, OracleError>;
    async fn list_sessions(&self, slug: &ProjectSlug) -> Result<Vec<Session>, OracleError>;
}

/// Atomically write `bytes` to `path`: write to a sibling `.tmp` file,
/// then rename over the destination.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), OracleError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| OracleError::Io { path: parent.to_path_buf(), source: e })?;
    }
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| OracleError::Io { path: tmp.clone(), source: e })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| OracleError::Io { path: path.to_path_buf(), source: e })
}

/// Filesystem-backed [`WorkspaceStore`] under the configured
/// `workspace_root`. Single-writer per file, guarded by an in-process
/// mutex per the concurrency model's "single-writer; updates are
/// atomic file renames" (§5).
pub struct FsWorkspaceStore {
    root: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FsWorkspaceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), lock: Arc::new(Mutex::new(())) }
    }

    fn project_dir(&self, slug: &ProjectSlug) -> PathBuf {
        self.root.join("projects").join(slug.as_str())
    }

    fn project_file(&self, slug: &ProjectSlug) -> PathBuf {
        self.project_dir(slug).join("project.json")
    }

    fn skills_file(&self, slug: &ProjectSlug) -> PathBuf {
        self.project_dir(slug).join("skills.json")
    }

    fn session_file(&self, slug: &ProjectSlug, session_id: &SessionId) -> PathBuf {
        self.project_dir(slug).join("sessions").join(format!("{session_id}.json"))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Option<T>, OracleError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(OracleError::Io { path: path.to_path_buf(), source: e }),
        }
    }
}

#[async_trait]
impl WorkspaceStore for FsWorkspaceStore {
    async fn create_project(&self, project: Project) -> Result<(), OracleError> {
        let _guard = self.lock.lock();
        let bytes = serde_json::to_vec_pretty(&project)?;
        write_atomic(&self.project_file(&project.slug), &bytes).await
    }

    async fn get_project(&self, slug: &ProjectSlug) -> Result<Option<Project>, OracleError> {
        self.read_json(&self.project_file(slug)).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, OracleError> {
        let projects_dir = self.root.join("projects");
        let mut entries = match tokio::fs::read_dir(&projects_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(OracleError::Io { path: projects_dir, source: e }),
        };

        let mut projects = Vec::new();
        while let Some(entry) =
            entries.next_entry().await.map_err(|e| OracleError::Io { path: projects_dir.clone(), source: e })?
        {
            let project_file = entry.path().join("project.json");
            if let Some(project) = self.read_json::<Project>(&project_file).await? {
                projects.push(project);
            }
        }
        projects.sort_by(|a, b| a.slug.as_str().cmp(b.slug.as_str()));
        Ok(projects)
    }

    async fn delete_project(&self, slug: &ProjectSlug) -> Result<(), OracleError> {
        let _guard = self.lock.lock();
        match tokio::fs::remove_dir_all(self.project_dir(slug)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OracleError::Io { path: self.project_dir(slug), source: e }),
        }
    }

    async fn put_skills(&self, slug: &ProjectSlug, skills: &ProjectSkills) -> Result<(), OracleError> {
        let _guard = self.lock.lock();
        let bytes = serde_json::to_vec_pretty(skills)?;
        write_atomic(&self.skills_file(slug), &bytes).await
    }

    async fn get_skills(&self, slug: &ProjectSlug) -> Result<ProjectSkills, OracleError> {
        Ok(self.read_json(&self.skills_file(slug)).await?.unwrap_or_default())
    }

    async fn save_session(&self, session: &Session) -> Result<(), OracleError> {
        let _guard = self.lock.lock();
        let bytes = serde_json::to_vec_pretty(session)?;
        write_atomic(&self.session_file(&session.project_slug, &session.id), &bytes).await
    }

    async fn get_session(
        &self,
        slug: &ProjectSlug,
        session_id: &SessionId,
    ) -> Result<Option<Session>, OracleError> {
        self.read_json(&self.session_file(slug, session_id)).await
    }

    async fn list_sessions(&self, slug: &ProjectSlug) -> Result<Vec<Session>, OracleError> {
        let sessions_dir = self.project_dir(slug).join("sessions");
        let mut entries = match tokio::fs::read_dir(&sessions_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(OracleError::Io { path: sessions_dir, source: e }),
        };

        let mut sessions = Vec::new();
        while let Some(entry) =
            entries.next_entry().await.map_err(|e| OracleError::Io { path: sessions_dir.clone(), source: e })?
        {
            if let Some(session) = self.read_json::<Session>(&entry.path()).await? {
                sessions.push(session);
            }
        }
        sessions.sort_by_key(|s| s.started_at_epoch_ms);
        Ok(sessions)
    }
}

#[cfg(test)]
#[path = "workspace_store_tests.rs"]
mod tests;
