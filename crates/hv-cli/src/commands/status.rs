// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hv status <slug>` — a project's session history.

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_time_ago, render};
use hv_core::project::ProjectSlug;

pub async fn handle(ctx: &Context, slug: &str, json: bool) -> anyhow::Result<()> {
    let slug = ProjectSlug::new(slug).map_err(|e| ExitError::usage(e.to_string()))?;
    if ctx.workspace.get_project(&slug).await?.is_none() {
        return Err(ExitError::usage(format!("unknown project {slug}")).into());
    }

    let sessions = ctx.workspace.list_sessions(&slug).await?;

    render(json, &sessions, || {
        if sessions.is_empty() {
            println!("No sessions yet for {slug}");
            return;
        }
        for session in &sessions {
            println!(
                "{}  {:<11}  {}  tasks={} agents={}",
                session.id,
                session.status,
                format_time_ago(session.started_at_epoch_ms),
                session.plan.tasks.len(),
                session.cost_summary.total_agents,
            );
        }
    })
}
