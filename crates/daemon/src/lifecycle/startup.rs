// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and recovery.

use std::io::Write;
use std::time::Instant;

use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::{Catalog, Clock};
use andon_engine::{Desk, DeskDeps};
use andon_storage::{load_snapshot, BoardState, Checkpointer, Wal};
use fs2::FileExt;
use tracing::{info, warn};

use super::{DaemonState, LifecycleError, Paths};

/// Take the daemon lock and rebuild the board: snapshot first, then the
/// log entries written after it.
pub fn startup<M, N, C>(
    paths: &Paths,
    catalog: Catalog,
    deps: DeskDeps<M, N>,
    clock: C,
) -> Result<DaemonState<M, N, C>, LifecycleError>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    match startup_inner(paths, catalog, deps, clock) {
        Ok(state) => Ok(state),
        Err(e) => {
            // The PID file belongs to the running daemon when the lock was taken
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(paths);
            }
            Err(e)
        }
    }
}

fn startup_inner<M, N, C>(
    paths: &Paths,
    catalog: Catalog,
    deps: DeskDeps<M, N>,
    clock: C,
) -> Result<DaemonState<M, N, C>, LifecycleError>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    std::fs::create_dir_all(&paths.state_dir)?;

    // Open without truncating so a running daemon's PID survives a failed lock
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&paths.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    let (mut board, snapshot_seq) = match load_snapshot(&paths.snapshot_path)? {
        Some(snapshot) => {
            info!(
                seq = snapshot.seq,
                cells_with_tickets = snapshot.state.tickets.len(),
                "loaded snapshot"
            );
            (snapshot.state, snapshot.seq)
        }
        None => {
            info!("no snapshot found, starting from an empty board");
            (BoardState::default(), 0)
        }
    };

    let wal = Wal::open(&paths.wal_path)?;
    if wal.write_seq() < snapshot_seq {
        warn!(
            snapshot_seq,
            log_seq = wal.write_seq(),
            "log is behind the snapshot; entries written after it may be lost"
        );
    }
    let replay = wal.entries_after(snapshot_seq)?;
    for record in &replay {
        board.apply_entry(&record.entry);
    }
    if !replay.is_empty() {
        info!(count = replay.len(), after = snapshot_seq, "replayed log entries");
    }

    let open_tickets: usize = board.tickets.values().flatten().filter(|t| t.is_open()).count();
    let waiting_calls: usize =
        board.slots.values().flat_map(|cells| cells.values()).filter(|s| s.is_waiting()).count();
    info!(waiting_calls, open_tickets, log_seq = wal.write_seq(), "recovered board");

    let desk = Desk::new(catalog, board, wal, deps, clock);
    Ok(DaemonState {
        paths: paths.clone(),
        lock_file,
        desk,
        checkpointer: Checkpointer::new(paths.snapshot_path.clone()),
        start_time: Instant::now(),
    })
}

fn cleanup_on_failure(paths: &Paths) {
    if paths.lock_path.exists() {
        let _ = std::fs::remove_file(&paths.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
