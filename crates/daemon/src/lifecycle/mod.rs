// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, recovery, checkpoints, shutdown.

mod checkpoint;
mod startup;
pub(crate) use checkpoint::{spawn_checkpoint_loop, write_checkpoint};
pub use startup::startup;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::Clock;
use andon_engine::Desk;
use andon_storage::Checkpointer;
use thiserror::Error;
use tracing::{info, warn};

/// Files under the state directory
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root state directory (e.g. ~/.local/state/andon)
    pub state_dir: PathBuf,
    /// Lock/PID file
    pub lock_path: PathBuf,
    /// Durable log
    pub wal_path: PathBuf,
    /// Board snapshot
    pub snapshot_path: PathBuf,
    /// Directory for the rolling daemon log
    pub log_dir: PathBuf,
    /// Default config file location
    pub config_path: PathBuf,
}

impl Paths {
    /// Paths for the user-level daemon, honouring `ANDON_STATE_DIR`.
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::under(&crate::env::state_dir()?))
    }

    pub fn under(state_dir: &Path) -> Self {
        Self {
            lock_path: state_dir.join("andond.pid"),
            wal_path: state_dir.join("wal").join("events.wal"),
            snapshot_path: state_dir.join("snapshot.zst"),
            log_dir: state_dir.join("logs"),
            config_path: state_dir.join("andon.toml"),
            state_dir: state_dir.to_path_buf(),
        }
    }
}

/// A running daemon's recovered state.
pub struct DaemonState<M, N, C: Clock> {
    pub paths: Paths,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub desk: Desk<M, N, C>,
    pub checkpointer: Checkpointer,
    pub start_time: Instant,
}

impl<M, N, C> DaemonState<M, N, C>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    /// Shut down gracefully: wait for in-flight CMMS and notification work,
    /// write a final snapshot, remove the PID file.
    pub async fn shutdown(&self, drain_timeout: Duration) {
        info!("shutting down daemon");

        if !self.desk.drain(drain_timeout).await {
            warn!(timeout_ms = drain_timeout.as_millis() as u64, "background work still running at shutdown");
        }

        match write_checkpoint(&self.desk, &self.checkpointer) {
            Ok(result) => info!(seq = result.seq, size_bytes = result.size_bytes, "saved final snapshot"),
            Err(e) => warn!(error = %e, "failed to save shutdown snapshot"),
        }

        if self.paths.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.paths.lock_path) {
                warn!(error = %e, "failed to remove PID file");
            }
        }
        info!("daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind {0}: {1}")]
    BindFailed(String, std::io::Error),

    #[error("WAL error: {0}")]
    Wal(#[from] andon_storage::WalError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] andon_storage::SnapshotError),

    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
