// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful shutdown (§5 "Cancellation... Graceful shutdown"): warn
//! every subscriber, cancel every live session, then wait out a grace
//! window for their agents to exit before returning control to the
//! caller (`hv-cli`'s signal handler, which exits the process).

use crate::lock::LiveSessions;
use hv_bus::EventBus;
use hv_core::event::Event;
use std::time::Duration;
use tracing::{info, warn};

/// Default grace window for in-flight agents to exit before the
/// caller escalates to SIGKILL (§5 step 3: "wait up to 30 s").
pub const DEFAULT_GRACE: Duration = Duration::from_secs(30);

/// Drive steps 1-3 of the graceful shutdown sequence. Step 4 (process
/// exit) is left to the caller — this crate never calls
/// `std::process::exit` itself.
///
/// Each cancelled session's own `run()` cleanup (see
/// `session_service::run`) is what actually marks it `interrupted`,
/// flushes its checkpoint, and broadcasts `session:interrupted` — this
/// function only triggers that by cancelling the token and then waits
/// for every session to actually finish within `grace`.
pub async fn shutdown(bus: &EventBus, live_sessions: &LiveSessions, message: impl Into<String>, grace: Duration) {
    bus.broadcast_global(Event::ShutdownWarning { message: message.into() });

    let sessions = live_sessions.snapshot();
    info!(count = sessions.len(), "shutdown: cancelling live sessions");
    for (_, cancel) in &sessions {
        cancel.cancel();
    }

    let deadline = tokio::time::Instant::now() + grace;
    loop {
        if live_sessions.snapshot().is_empty() {
            info!("shutdown: all sessions finalized");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            let remaining = live_sessions.snapshot().len();
            warn!(remaining, "shutdown: grace window elapsed with sessions still live");
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
