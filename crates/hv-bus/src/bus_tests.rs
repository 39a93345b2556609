// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hv_core::event::Event;
use hv_core::project::ProjectSlug;
use hv_core::session::SessionId;

fn slug(s: &str) -> ProjectSlug {
    ProjectSlug::new(s).unwrap()
}

fn session_start(session_id: SessionId, slug: ProjectSlug) -> Event {
    Event::SessionStart { session_id, project_slug: slug, prompt: "build something".into() }
}

#[tokio::test]
async fn subscriber_receives_events_for_its_subscribed_project() {
    let bus = EventBus::new();
    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo"));

    bus.broadcast(session_start(SessionId::new(), slug("demo")));

    let received = rx.recv().await.expect("event delivered");
    assert!(matches!(received, Event::SessionStart { .. }));
}

#[tokio::test]
async fn subscriber_does_not_receive_events_for_other_projects() {
    let bus = EventBus::new();
    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo"));

    bus.broadcast(session_start(SessionId::new(), slug("other")));

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn subscribe_then_unsubscribe_then_broadcast_yields_no_delivery() {
    let bus = EventBus::new();
    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo"));
    bus.unsubscribe_project(id, &slug("demo"));

    bus.broadcast(session_start(SessionId::new(), slug("demo")));

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribing_an_unknown_slug_is_a_silent_no_op() {
    let bus = EventBus::new();
    let (id, _rx) = bus.subscribe();
    bus.unsubscribe_project(id, &slug("never-subscribed"));
    assert_eq!(bus.subscriber_count(), 1);
}

#[tokio::test]
async fn session_scoped_events_resolve_project_via_the_weak_index() {
    let bus = EventBus::new();
    let session_id = SessionId::new();
    bus.register_session(session_id, slug("demo"));

    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo"));

    bus.broadcast(Event::SessionInterrupted { session_id });

    assert!(rx.recv().await.is_some());
}

#[tokio::test]
async fn forgetting_a_session_drops_its_routing_index() {
    let bus = EventBus::new();
    let session_id = SessionId::new();
    bus.register_session(session_id, slug("demo"));
    bus.forget_session(&session_id);

    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo"));

    bus.broadcast(Event::SessionInterrupted { session_id });

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn global_events_reach_every_subscriber_regardless_of_subscription() {
    let bus = EventBus::new();
    let (_id_a, mut rx_a) = bus.subscribe();
    let (id_b, mut rx_b) = bus.subscribe();
    bus.subscribe_project(id_b, slug("demo"));

    bus.broadcast_global(Event::ShutdownWarning { message: "restarting".into() });

    assert!(rx_a.recv().await.is_some());
    assert!(rx_b.recv().await.is_some());
}

#[tokio::test]
async fn broadcast_of_shutdown_warning_is_global_without_explicit_call() {
    let bus = EventBus::new();
    let (_id, mut rx) = bus.subscribe();

    bus.broadcast(Event::ShutdownWarning { message: "bye".into() });

    assert!(rx.recv().await.is_some());
}

#[tokio::test]
async fn unresolvable_project_drops_the_event_without_panicking() {
    let bus = EventBus::new();
    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo"));

    // TaskStatus carries a sessionId the bus has never seen registered.
    bus.broadcast(hv_core::test_support::task_status_event(
        "task-a",
        SessionId::new(),
        hv_core::task::TaskStatus::Running,
    ));

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn full_subscriber_channel_drops_and_increments_observable_counter() {
    let bus = EventBus::new();
    let (id, _rx) = bus.subscribe_with_capacity(1);
    bus.subscribe_project(id, slug("demo"));

    bus.broadcast(session_start(SessionId::new(), slug("demo")));
    bus.broadcast(session_start(SessionId::new(), slug("demo")));

    assert_eq!(bus.dropped_count(), 1);
}

#[tokio::test]
async fn unsubscribe_removes_the_subscriber_entirely() {
    let bus = EventBus::new();
    let (id, _rx) = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);
    bus.unsubscribe(id);
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn a_subscriber_can_follow_multiple_projects() {
    let bus = EventBus::new();
    let (id, mut rx) = bus.subscribe();
    bus.subscribe_project(id, slug("demo-a"));
    bus.subscribe_project(id, slug("demo-b"));

    bus.broadcast(session_start(SessionId::new(), slug("demo-a")));
    bus.broadcast(session_start(SessionId::new(), slug("demo-b")));

    assert!(rx.recv().await.is_some());
    assert!(rx.recv().await.is_some());
}
