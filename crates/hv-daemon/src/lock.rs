// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two process-wide lock registries named in §9 Design Notes
//! ("the only process-wide state is the workspace index, the per-
//! workDir lock map, the event-bus subscriber set, and the checkpoint
//! timer handle"): one mutex per workspace directory (§5 "Workspace
//! directory... serialized by a per-workDir mutex"), and a per-project
//! session-start lock rejecting concurrent session starts (§4.5 step 1,
//! §6 "409 if a session is running and policy forbids concurrency").

use hv_core::project::ProjectSlug;
use hv_core::session::SessionId;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;

/// Lazily-created mutex per workspace directory. Entries are never
/// removed — the number of distinct `workDir`s a process touches over
/// its lifetime is small and bounded by the number of projects.
#[derive(Clone, Default)]
pub struct WorkDirLocks {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>>,
}

impl WorkDirLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold exclusive access to `work_dir` for the duration of the
    /// returned guard.
    pub async fn acquire(&self, work_dir: &Path) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock();
            locks.entry(work_dir.to_path_buf()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
        };
        mutex.lock_owned().await
    }
}

struct StartLocksInner {
    running: Mutex<HashSet<ProjectSlug>>,
}

/// Rejects a second concurrent session start for the same project
/// (§4.5 step 1). Not a queue — a project with one already running
/// simply refuses the second start; the caller surfaces that as a 409
/// / CLI exit 1.
#[derive(Clone)]
pub struct SessionStartLocks {
    inner: Arc<StartLocksInner>,
}

impl SessionStartLocks {
    pub fn new() -> Self {
        Self { inner: Arc::new(StartLocksInner { running: Mutex::new(HashSet::new()) }) }
    }

    /// `None` if `slug` already has a session starting or running.
    pub fn try_acquire(&self, slug: &ProjectSlug) -> Option<SessionStartGuard> {
        let mut running = self.inner.running.lock();
        if running.contains(slug) {
            return None;
        }
        running.insert(slug.clone());
        Some(SessionStartGuard { slug: slug.clone(), inner: Arc::clone(&self.inner) })
    }
}

impl Default for SessionStartLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the project's start lock when dropped (§4.5 step 12:
/// "Always: release session start lock").
pub struct SessionStartGuard {
    slug: ProjectSlug,
    inner: Arc<StartLocksInner>,
}

impl Drop for SessionStartGuard {
    fn drop(&mut self) {
        self.inner.running.lock().remove(&self.slug);
    }
}

/// Registry of currently-running sessions' cancellation tokens, used by
/// [`crate::shutdown`] to reach every live session without a shared
/// borrow of its `Plan` (§5 "each session carries a cancellation
/// token"). Entries are removed once the session's `run()` returns.
#[derive(Clone, Default)]
pub struct LiveSessions {
    sessions: Arc<Mutex<HashMap<SessionId, CancellationToken>>>,
}

impl LiveSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, session_id: SessionId, cancel: CancellationToken) {
        self.sessions.lock().insert(session_id, cancel);
    }

    pub fn unregister(&self, session_id: SessionId) {
        self.sessions.lock().remove(&session_id);
    }

    /// Every live session's cancellation token, as of the call. Used to
    /// broadcast cancellation to a point-in-time snapshot — sessions
    /// that start after the snapshot is taken are not included, matching
    /// a shutdown sequence that does not accept new work anyway.
    pub fn snapshot(&self) -> Vec<(SessionId, CancellationToken)> {
        self.sessions.lock().iter().map(|(id, token)| (*id, token.clone())).collect()
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
