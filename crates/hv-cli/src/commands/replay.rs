// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hv replay <slug> <sid>` — print a finalized session's plan,
//! agents, cost summary, and timeline.

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::render;
use hv_core::project::ProjectSlug;
use hv_core::session::SessionId;

pub async fn handle(ctx: &Context, slug: &str, sid: &str, json: bool) -> anyhow::Result<()> {
    let slug = ProjectSlug::new(slug).map_err(|e| ExitError::usage(e.to_string()))?;
    let session_id = SessionId::from_string(sid).map_err(|e| ExitError::usage(e.to_string()))?;

    let session = ctx
        .workspace
        .get_session(&slug, &session_id)
        .await?
        .ok_or_else(|| ExitError::usage(format!("no session {session_id} for project {slug}")))?;

    render(json, &session, || {
        println!("session {}  {}  prompt={:?}", session.id, session.status, session.prompt);
        println!("plan:");
        for task in &session.plan.tasks {
            println!(
                "  {:<20} {:<8} retries={} tier={} deps={:?}",
                task.id, task.status, task.retries, task.tier, task.dependencies
            );
        }
        println!("agents:");
        for agent in session.agents.values() {
            println!("  {} task={} model={} status={}", agent.id, agent.task_id, agent.model, agent.status);
        }
        println!(
            "costSummary: totalAgents={} totalPremiumRequests={}",
            session.cost_summary.total_agents, session.cost_summary.total_premium_requests
        );
        println!("timeline: {} entries", session.timeline.len());
    })
}
