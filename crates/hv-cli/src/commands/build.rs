// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hv build <slug> "<prompt>"` — start a new session and run it to
//! completion (§4.5). A Ctrl-C while the session is in flight drives
//! the same graceful-shutdown path a process-level SIGTERM would
//! (§5), rather than abandoning the subprocesses.

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::render;
use hv_core::project::ProjectSlug;
use hv_core::session::{Session, SessionStatus};
use hv_core::task::TaskStatus;

pub async fn handle(ctx: &Context, slug: &str, prompt: &str, json: bool) -> anyhow::Result<()> {
    let slug = ProjectSlug::new(slug).map_err(|e| ExitError::usage(e.to_string()))?;
    ctx.get_or_create_project(&slug).await?;

    // Run the session as its own task so a Ctrl-C below drives it
    // through the normal interrupted-cleanup path (Step 12) instead of
    // dropping it mid-flight.
    let service = std::sync::Arc::clone(&ctx.service);
    let prompt = prompt.to_string();
    let mut run_handle = {
        let slug = slug.clone();
        tokio::spawn(async move { service.start(&slug, prompt).await })
    };

    let outcome = tokio::select! {
        result = &mut run_handle => result,
        _ = tokio::signal::ctrl_c() => {
            hv_daemon::shutdown(&ctx.bus, &ctx.service.live_sessions(), "hv: interrupted by Ctrl-C", hv_daemon::DEFAULT_GRACE).await;
            run_handle.await
        }
    };

    let session = outcome.map_err(|e| ExitError::failure(e.to_string()))?.map_err(ExitError::from)?;

    print_session(&session, json)?;
    exit_for(&session)
}

pub fn print_session(session: &Session, json: bool) -> anyhow::Result<()> {
    render(json, session, || {
        println!("session {}  {}", session.id, session.status);
        for task in &session.plan.tasks {
            println!("  {:<20} {:<8} retries={}", task.id, task.status, task.retries);
        }
        println!(
            "costSummary: totalAgents={} totalPremiumRequests={}",
            session.cost_summary.total_agents, session.cost_summary.total_premium_requests
        );
    })
}

/// Exit code per §6: 0 success, 1 any failed task or error.
pub fn exit_for(session: &Session) -> anyhow::Result<()> {
    let any_failed_task = session.plan.tasks.iter().any(|t| t.status == TaskStatus::Failed);
    if session.status == SessionStatus::Failed || any_failed_task {
        return Err(ExitError::failure(format!("session {} did not complete cleanly", session.id)).into());
    }
    Ok(())
}
