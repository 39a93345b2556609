// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hv autopilot <slug> [--cycles=N]` — chain sessions via a follow-up
//! planner until one of the stop conditions in §4.7 fires. Ctrl-C
//! drives the same graceful-shutdown path as `build` (§5): the
//! in-flight session is cancelled and checkpointed, and the loop's own
//! external-stop token keeps it from starting another cycle.

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::render;
use hv_core::project::ProjectSlug;
use hv_daemon::{Autopilot, AutopilotConfig, AutopilotStopReason};
use hv_oracles::FallbackPlanner;
use tokio_util::sync::CancellationToken;

pub async fn handle(ctx: &Context, slug: &str, cycles: u32, json: bool) -> anyhow::Result<()> {
    let slug = ProjectSlug::new(slug).map_err(|e| ExitError::usage(e.to_string()))?;
    ctx.get_or_create_project(&slug).await?;

    let autopilot = std::sync::Arc::new(Autopilot::new(
        std::sync::Arc::clone(&ctx.service),
        std::sync::Arc::clone(&ctx.workspace),
        std::sync::Arc::new(FallbackPlanner),
        ctx.bus.clone(),
    ));
    let config = AutopilotConfig { max_cycles: cycles, ..AutopilotConfig::default() };
    let stop_token = CancellationToken::new();

    let mut run_handle = {
        let autopilot = std::sync::Arc::clone(&autopilot);
        let slug = slug.clone();
        let stop_token = stop_token.clone();
        tokio::spawn(async move { autopilot.run(&slug, config, stop_token).await })
    };

    let outcome = tokio::select! {
        result = &mut run_handle => result,
        _ = tokio::signal::ctrl_c() => {
            stop_token.cancel();
            hv_daemon::shutdown(&ctx.bus, &ctx.service.live_sessions(), "hv: interrupted by Ctrl-C", hv_daemon::DEFAULT_GRACE).await;
            run_handle.await
        }
    };

    let reason = outcome.map_err(|e| ExitError::failure(e.to_string()))?.map_err(ExitError::from)?;

    render(json, &reason.to_string(), || {
        println!("autopilot stopped: {reason}");
    })?;

    match reason {
        AutopilotStopReason::MaxCycles | AutopilotStopReason::ExternalStop | AutopilotStopReason::NoFollowUp => Ok(()),
        AutopilotStopReason::CostCeiling | AutopilotStopReason::FailingTests | AutopilotStopReason::SessionFailed => {
            Err(ExitError::failure(format!("autopilot stopped: {reason}")).into())
        }
    }
}
