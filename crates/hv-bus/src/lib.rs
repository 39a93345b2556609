// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hv-bus: the publish/subscribe event bus (§4.1).
//!
//! One-to-many delivery of [`Event`]s to transport subscribers, scoped
//! by project subscription. A subscriber is a bounded channel; a slow
//! subscriber drops events rather than blocking producers, and the
//! drop count is observable via [`EventBus::dropped_count`].
//!
//! The bus has no notion of sessions or projects beyond a weak
//! `sessionId -> projectSlug` index it's handed (§3 Ownership:
//! "back-refs are weak indices for broadcast routing, not ownership").
//! The Session Service registers/forgets that mapping as sessions
//! start and finalize.

use hv_core::event::Event;
use hv_core::project::ProjectSlug;
use hv_core::session::SessionId;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default bounded channel capacity for a new subscriber.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 256;

/// Opaque handle for a bus subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    projects: HashSet<ProjectSlug>,
    sender: mpsc::Sender<Event>,
}

struct Inner {
    subscribers: Mutex<HashMap<SubscriberId, Subscriber>>,
    session_index: Mutex<HashMap<SessionId, ProjectSlug>>,
    next_id: AtomicU64,
    dropped: AtomicU64,
}

/// The project-scoped publish/subscribe event bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: Mutex::new(HashMap::new()),
                session_index: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    /// Register the project a session belongs to, so events carrying
    /// only a `sessionId` (no explicit `projectSlug`) can still be
    /// routed. Call on session start.
    pub fn register_session(&self, session_id: SessionId, project_slug: ProjectSlug) {
        self.inner.session_index.lock().insert(session_id, project_slug);
    }

    /// Drop the weak index entry for a session. Call on finalize —
    /// the index is for routing only, not storage.
    pub fn forget_session(&self, session_id: &SessionId) {
        self.inner.session_index.lock().remove(session_id);
    }

    /// Register a new subscriber with the default channel capacity.
    pub fn subscribe(&self) -> (SubscriberId, mpsc::Receiver<Event>) {
        self.subscribe_with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    pub fn subscribe_with_capacity(&self, capacity: usize) -> (SubscriberId, mpsc::Receiver<Event>) {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        self.inner.subscribers.lock().insert(id, Subscriber { projects: HashSet::new(), sender });
        (id, receiver)
    }

    /// Remove a subscriber entirely. Idempotent.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.subscribers.lock().remove(&id);
    }

    /// Add `slug` to a subscriber's project set (`ws:subscribe`).
    pub fn subscribe_project(&self, id: SubscriberId, slug: ProjectSlug) {
        if let Some(sub) = self.inner.subscribers.lock().get_mut(&id) {
            sub.projects.insert(slug);
        }
    }

    /// Remove `slug` from a subscriber's project set (`ws:unsubscribe`).
    /// A subscriber unknown to the bus, or a slug the subscriber never
    /// subscribed to, is a silent no-op (§4.1).
    pub fn unsubscribe_project(&self, id: SubscriberId, slug: &ProjectSlug) {
        if let Some(sub) = self.inner.subscribers.lock().get_mut(&id) {
            sub.projects.remove(slug);
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// Total events dropped so far due to a full subscriber channel.
    pub fn dropped_count(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    /// Deliver `event` to every subscriber whose project set contains
    /// its resolved project slug. Global events go to every subscriber
    /// regardless of subscription (§4.1).
    pub fn broadcast(&self, event: Event) {
        if event.is_global() {
            self.broadcast_global(event);
            return;
        }
        let Some(slug) = self.resolve_project(&event) else {
            warn!(kind = ?event.kind(), "dropping event: no resolvable project");
            return;
        };
        let subscribers = self.inner.subscribers.lock();
        for (id, sub) in subscribers.iter() {
            if sub.projects.contains(&slug) {
                self.try_send(*id, sub, event.clone());
            }
        }
    }

    /// Deliver `event` to every subscriber, ignoring project scope.
    pub fn broadcast_global(&self, event: Event) {
        let subscribers = self.inner.subscribers.lock();
        for (id, sub) in subscribers.iter() {
            self.try_send(*id, sub, event.clone());
        }
    }

    fn resolve_project(&self, event: &Event) -> Option<ProjectSlug> {
        if let Some(slug) = event.project_slug() {
            return Some(slug.clone());
        }
        let session_id = event.session_id()?;
        self.inner.session_index.lock().get(&session_id).cloned()
    }

    fn try_send(&self, id: SubscriberId, sub: &Subscriber, event: Event) {
        match sub.sender.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(subscriber = id.0, "dropping event: subscriber backpressure");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(subscriber = id.0, "dropping event: subscriber closed");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
