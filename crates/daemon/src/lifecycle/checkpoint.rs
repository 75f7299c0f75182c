// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background snapshot writer.
//!
//! One task owns every snapshot write, so writes never interleave. A burst
//! of board updates produces one write; a failed write is retried on the
//! next periodic tick.

use std::time::Duration;

use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::Clock;
use andon_engine::Desk;
use andon_storage::{CheckpointResult, Checkpointer, SnapshotError};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long to wait for more updates before writing.
const COALESCE: Duration = Duration::from_millis(200);

/// Snapshot the desk's board together with the log position it reflects.
pub(crate) fn write_checkpoint<M, N, C>(
    desk: &Desk<M, N, C>,
    checkpointer: &Checkpointer,
) -> Result<CheckpointResult, SnapshotError>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let (seq, board) = desk.checkpoint_view();
    checkpointer.checkpoint_sync(seq, &board)
}

pub(crate) fn spawn_checkpoint_loop<M, N, C>(
    desk: Desk<M, N, C>,
    checkpointer: Checkpointer,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let mut updates = desk.subscribe();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut dirty = false;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                update = updates.recv() => {
                    if matches!(update, Err(RecvError::Closed)) {
                        break;
                    }
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(COALESCE) => {}
                    }
                    loop {
                        match updates.try_recv() {
                            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                        }
                    }
                    dirty = !checkpoint_in_background(&desk, &checkpointer).await;
                }
                _ = tick.tick() => {
                    if dirty {
                        dirty = !checkpoint_in_background(&desk, &checkpointer).await;
                    }
                }
            }
        }
        debug!("checkpoint loop stopped");
    })
}

/// Returns whether the snapshot was written.
async fn checkpoint_in_background<M, N, C>(desk: &Desk<M, N, C>, checkpointer: &Checkpointer) -> bool
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let (seq, board) = desk.checkpoint_view();
    let checkpointer = checkpointer.clone();
    let result = tokio::task::spawn_blocking(move || checkpointer.checkpoint_sync(seq, &board)).await;
    match result {
        Ok(Ok(written)) => {
            debug!(seq = written.seq, size_bytes = written.size_bytes, "snapshot written");
            true
        }
        Ok(Err(e)) => {
            warn!(seq, error = %e, "snapshot write failed");
            false
        }
        Err(e) => {
            warn!(seq, error = %e, "snapshot task failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
