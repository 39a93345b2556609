// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::project::ProjectSlug;
use crate::session::SessionId;
use crate::task::TaskId;

fn slug() -> ProjectSlug {
    ProjectSlug::new("demo-project").unwrap()
}

#[test]
fn session_start_serializes_with_type_tag() {
    let event = Event::SessionStart {
        session_id: SessionId::new(),
        project_slug: slug(),
        prompt: "add a health check endpoint".into(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "session:start");
    assert_eq!(json["prompt"], "add a health check endpoint");
}

#[test]
fn task_status_round_trips() {
    let event = Event::TaskStatus {
        task_id: TaskId::new("write-tests"),
        session_id: SessionId::new(),
        status: TaskStatus::Running,
        retries: Some(1),
        model_tier: Some(ModelTier::T2),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn agent_output_is_timeline_exempt() {
    let event = Event::AgentOutput {
        agent_id: crate::agent::AgentId::new(),
        session_id: SessionId::new(),
        chunk: "compiling...".into(),
    };
    assert!(event.is_timeline_exempt());
    assert_eq!(event.kind(), EventKind::AgentOutput);
}

#[test]
fn non_output_events_are_not_timeline_exempt() {
    let event = Event::SessionInterrupted { session_id: SessionId::new() };
    assert!(!event.is_timeline_exempt());
}

#[test]
fn shutdown_warning_is_global_and_has_no_project() {
    let event = Event::ShutdownWarning { message: "restarting in 30s".into() };
    assert!(event.is_global());
    assert!(event.project_slug().is_none());
    assert!(event.session_id().is_none());
}

#[test]
fn events_carrying_project_slug_resolve_it_directly() {
    let event = Event::AutopilotStarted { project_slug: slug() };
    assert_eq!(event.project_slug(), Some(&slug()));
}

#[test]
fn session_scoped_events_resolve_session_id() {
    let session_id = SessionId::new();
    let event = Event::SessionResumed { session_id };
    assert_eq!(event.session_id(), Some(session_id));
    assert!(event.project_slug().is_none());
}

#[test]
fn plugin_events_carry_opaque_payload_and_optional_routing_fields() {
    let event = Event::Plugin {
        kind: PluginEventKind::GateRequest,
        project_slug: Some(slug()),
        task_id: Some(TaskId::new("deploy")),
        payload: serde_json::json!({"question": "allow network access?"}),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"], "gate_request");
    assert_eq!(json["payload"]["question"], "allow network access?");
    assert_eq!(event.project_slug(), Some(&slug()));
    assert_eq!(event.kind(), EventKind::Plugin(PluginEventKind::GateRequest));
}

#[test]
fn plugin_event_kind_display_matches_wire_tags() {
    assert_eq!(PluginEventKind::DagRewrite.to_string(), "dag:rewrite");
    assert_eq!(PluginEventKind::SettingsUpdate.to_string(), "settings:update");
}

#[test]
fn plan_created_carries_task_and_edge_summaries() {
    let event = Event::PlanCreated {
        session_id: SessionId::new(),
        tasks: vec![PlanTaskSummary {
            id: TaskId::new("a"),
            label: "scaffold".into(),
            dependencies: vec![],
        }],
        edges: vec![],
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["tasks"][0]["id"], "a");
}
