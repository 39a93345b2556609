// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic checkpoint writer (§4.6): every `checkpointIntervalMs`,
//! snapshot every live session and write it to the checkpoint
//! directory. The snapshot itself is supplied by the caller — the
//! Session Service owns the live sessions, this just drives the clock.

use crate::checkpoint_store::CheckpointStore;
use hv_core::checkpoint::Checkpoint;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub struct CheckpointTimer {
    store: CheckpointStore,
    interval: Duration,
    cancel: CancellationToken,
}

impl CheckpointTimer {
    pub fn new(store: CheckpointStore, interval_ms: u64, cancel: CancellationToken) -> Self {
        Self { store, interval: Duration::from_millis(interval_ms.max(1)), cancel }
    }

    /// Spawn the background tick loop. `snapshot` is called once per
    /// tick to get the current set of live-session checkpoints; it
    /// runs until `cancel` fires, at which point the task exits
    /// without a final write (the caller performs the shutdown flush
    /// itself via [`Self::flush`] once sessions are quiesced).
    pub fn spawn<F>(self, snapshot: F) -> JoinHandle<()>
    where
        F: Fn() -> Vec<Checkpoint> + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.tick().await; // first tick fires immediately; nothing to checkpoint yet.
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.write_all(snapshot()).await;
                    }
                    _ = self.cancel.cancelled() => break,
                }
            }
        })
    }

    /// Synchronous final flush (§5 shutdown sequence step 2: "flush
    /// checkpoints" before the 30s grace window).
    pub async fn flush(&self, checkpoints: Vec<Checkpoint>) {
        self.write_all(checkpoints).await;
    }

    async fn write_all(&self, checkpoints: Vec<Checkpoint>) {
        for checkpoint in checkpoints {
            let session_id = checkpoint.session_id;
            if let Err(e) = self.store.write(&checkpoint).await {
                warn!(session_id = %session_id, error = %e, "checkpoint write failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
