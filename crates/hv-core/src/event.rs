// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types delivered by the Event Bus (§4.1, §6).
//!
//! Serializes with `{"type": "event:name", ...fields}` framing, the
//! same shape the wire protocol uses for IPC. Events whose payload the
//! spec leaves to a pluggable collaborator (the plugin host, gates,
//! chat, reflection/skill-extraction, swarm rewrites, settings editor)
//! carry an opaque JSON payload under [`Event::Plugin`] rather than a
//! typed variant — the core only needs to route and timeline them, not
//! interpret their contents.

use crate::agent::{AgentId, AgentStatus};
use crate::config::ModelTier;
use crate::project::ProjectSlug;
use crate::session::SessionId;
use crate::task::{TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

/// `plan:created` task summary: `{id, label, dependencies}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTaskSummary {
    pub id: TaskId,
    pub label: String,
    pub dependencies: Vec<TaskId>,
}

/// `plan:created` edge summary: `{source, target}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEdgeSummary {
    pub source: TaskId,
    pub target: TaskId,
}

/// Kind of a pluggable-hook event, carried opaquely (see module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginEventKind {
    PluginEvent,
    GateRequest,
    GateResponse,
    ChatResponse,
    SelfdevDiff,
    DagRewrite,
    SkillsUpdate,
    SettingsUpdate,
}

crate::simple_display! {
    PluginEventKind {
        PluginEvent => "plugin:event",
        GateRequest => "gate:request",
        GateResponse => "gate:response",
        ChatResponse => "chat:response",
        SelfdevDiff => "selfdev:diff",
        DagRewrite => "dag:rewrite",
        SkillsUpdate => "skills:update",
        SettingsUpdate => "settings:update",
    }
}

/// Events that flow through the Event Bus (§4.1). The full enumerated
/// kind set from the spec is: `session:start, plan:created,
/// task:status, agent:status, agent:output, verify:status,
/// session:complete, session:error, session:warning,
/// session:interrupted, session:resumed, shutdown:warning,
/// autopilot:started, autopilot:cycle, autopilot:stopped, plugin:event,
/// ws:subscribe, ws:unsubscribe, gate:request, gate:response,
/// chat:response, selfdev:diff, dag:rewrite, skills:update,
/// settings:update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "session:start")]
    SessionStart { session_id: SessionId, project_slug: ProjectSlug, prompt: String },

    #[serde(rename = "plan:created")]
    PlanCreated { session_id: SessionId, tasks: Vec<PlanTaskSummary>, edges: Vec<PlanEdgeSummary> },

    #[serde(rename = "task:status")]
    TaskStatus {
        task_id: TaskId,
        session_id: SessionId,
        status: TaskStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retries: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model_tier: Option<ModelTier>,
    },

    #[serde(rename = "agent:status")]
    AgentStatus {
        agent_id: AgentId,
        task_id: TaskId,
        session_id: SessionId,
        status: AgentStatus,
        model: String,
        model_tier: ModelTier,
        multiplier: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    #[serde(rename = "agent:output")]
    AgentOutput {
        agent_id: AgentId,
        session_id: SessionId,
        /// UTF-8 best-effort decoding of the raw chunk.
        chunk: String,
    },

    #[serde(rename = "verify:status")]
    VerifyStatus {
        session_id: SessionId,
        status: VerifyPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        issues: Vec<String>,
    },

    #[serde(rename = "session:complete")]
    SessionComplete { session_id: SessionId, cost_summary: crate::cost::CostSummary },

    #[serde(rename = "session:error")]
    SessionError { session_id: SessionId, error: String },

    #[serde(rename = "session:warning")]
    SessionWarning { session_id: SessionId, warning_type: SessionWarningType, message: String },

    #[serde(rename = "session:interrupted")]
    SessionInterrupted { session_id: SessionId },

    #[serde(rename = "session:resumed")]
    SessionResumed { session_id: SessionId },

    #[serde(rename = "shutdown:warning")]
    ShutdownWarning { message: String },

    #[serde(rename = "autopilot:started")]
    AutopilotStarted { project_slug: ProjectSlug },

    #[serde(rename = "autopilot:cycle")]
    AutopilotCycle {
        project_slug: ProjectSlug,
        cycle: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<SessionId>,
        decision: String,
    },

    #[serde(rename = "autopilot:stopped")]
    AutopilotStopped { project_slug: ProjectSlug, reason: String },

    #[serde(rename = "ws:subscribe")]
    WsSubscribe { project_slug: ProjectSlug },

    #[serde(rename = "ws:unsubscribe")]
    WsUnsubscribe { project_slug: ProjectSlug },

    /// Catch-all for the pluggable-hook kinds (see module docs).
    Plugin {
        kind: PluginEventKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project_slug: Option<ProjectSlug>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<TaskId>,
        payload: serde_json::Value,
    },
}

/// Phase reported in `verify:status` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyPhase {
    Running,
    Fixing,
    Passed,
    Failed,
}

/// `session:warning` sub-types (admission rejection, non-fatal
/// degradation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionWarningType {
    CostCeiling,
    BusBackpressure,
    VerifyExhausted,
}

/// The bare event kind tag, independent of payload — used for
/// project-scoped routing decisions and metrics without deserializing
/// the whole event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SessionStart,
    PlanCreated,
    TaskStatus,
    AgentStatus,
    AgentOutput,
    VerifyStatus,
    SessionComplete,
    SessionError,
    SessionWarning,
    SessionInterrupted,
    SessionResumed,
    ShutdownWarning,
    AutopilotStarted,
    AutopilotCycle,
    AutopilotStopped,
    WsSubscribe,
    WsUnsubscribe,
    Plugin(PluginEventKind),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SessionStart { .. } => EventKind::SessionStart,
            Event::PlanCreated { .. } => EventKind::PlanCreated,
            Event::TaskStatus { .. } => EventKind::TaskStatus,
            Event::AgentStatus { .. } => EventKind::AgentStatus,
            Event::AgentOutput { .. } => EventKind::AgentOutput,
            Event::VerifyStatus { .. } => EventKind::VerifyStatus,
            Event::SessionComplete { .. } => EventKind::SessionComplete,
            Event::SessionError { .. } => EventKind::SessionError,
            Event::SessionWarning { .. } => EventKind::SessionWarning,
            Event::SessionInterrupted { .. } => EventKind::SessionInterrupted,
            Event::SessionResumed { .. } => EventKind::SessionResumed,
            Event::ShutdownWarning { .. } => EventKind::ShutdownWarning,
            Event::AutopilotStarted { .. } => EventKind::AutopilotStarted,
            Event::AutopilotCycle { .. } => EventKind::AutopilotCycle,
            Event::AutopilotStopped { .. } => EventKind::AutopilotStopped,
            Event::WsSubscribe { .. } => EventKind::WsSubscribe,
            Event::WsUnsubscribe { .. } => EventKind::WsUnsubscribe,
            Event::Plugin { kind, .. } => EventKind::Plugin(*kind),
        }
    }

    /// Explicit project slug carried by this event, if any.
    pub fn project_slug(&self) -> Option<&ProjectSlug> {
        match self {
            Event::SessionStart { project_slug, .. }
            | Event::AutopilotStarted { project_slug }
            | Event::AutopilotCycle { project_slug, .. }
            | Event::AutopilotStopped { project_slug, .. }
            | Event::WsSubscribe { project_slug }
            | Event::WsUnsubscribe { project_slug } => Some(project_slug),
            Event::Plugin { project_slug, .. } => project_slug.as_ref(),
            _ => None,
        }
    }

    /// Session this event belongs to, if any — used to resolve a
    /// project slug via the task/session index when the event itself
    /// doesn't carry one (§4.1 broadcast contract).
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            Event::SessionStart { session_id, .. }
            | Event::PlanCreated { session_id, .. }
            | Event::TaskStatus { session_id, .. }
            | Event::AgentStatus { session_id, .. }
            | Event::AgentOutput { session_id, .. }
            | Event::VerifyStatus { session_id, .. }
            | Event::SessionComplete { session_id, .. }
            | Event::SessionError { session_id, .. }
            | Event::SessionWarning { session_id, .. }
            | Event::SessionInterrupted { session_id }
            | Event::SessionResumed { session_id } => Some(*session_id),
            _ => None,
        }
    }

    /// `true` for events the spec excludes from the timeline (raw
    /// output chunks — §4.1 Timeline recording).
    pub fn is_timeline_exempt(&self) -> bool {
        matches!(self, Event::AgentOutput { .. })
    }

    /// `true` for events with no resolvable project — delivered to
    /// every subscriber via `broadcastGlobal` (§4.1).
    pub fn is_global(&self) -> bool {
        matches!(self, Event::ShutdownWarning { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
