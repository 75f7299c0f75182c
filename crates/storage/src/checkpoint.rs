// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot writing and loading.

use crate::migration::MigrationRegistry;
use crate::snapshot::{rotate_bak_path, Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
use crate::state::BoardState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointResult {
    pub seq: u64,
    pub size_bytes: u64,
}

/// Writes board snapshots to a single file.
///
/// Each write goes to a temp file that is synced and renamed over the
/// previous snapshot, so a crash mid-write leaves the old one intact.
#[derive(Debug, Clone)]
pub struct Checkpointer {
    path: PathBuf,
}

/// Borrowing twin of [`Snapshot`] so a checkpoint does not clone the board.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    v: u32,
    seq: u64,
    state: &'a BoardState,
    created_at: DateTime<Utc>,
}

impl Checkpointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn checkpoint_sync(
        &self,
        seq: u64,
        state: &BoardState,
    ) -> Result<CheckpointResult, SnapshotError> {
        let json = serde_json::to_vec(&SnapshotRef {
            v: CURRENT_SNAPSHOT_VERSION,
            seq,
            state,
            created_at: Utc::now(),
        })?;
        let compressed = zstd::encode_all(json.as_slice(), ZSTD_LEVEL)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&compressed)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        Ok(CheckpointResult { seq, size_bytes: compressed.len() as u64 })
    }
}

/// Load the snapshot at `path`, migrating it to the current version.
///
/// Returns `Ok(None)` when there is no snapshot, or when the file cannot be
/// decoded; an undecodable file is moved aside to `.bak` so recovery falls
/// back to a full log replay. A snapshot from a newer build is an error.
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let raw = match decode(&bytes) {
        Ok(raw) => raw,
        Err(reason) => {
            let bak = rotate_bak_path(path);
            warn!(path = %path.display(), bak = %bak.display(), %reason, "unreadable snapshot, moving aside");
            fs::rename(path, &bak)?;
            return Ok(None);
        }
    };

    let migrated = MigrationRegistry::new().migrate_to(raw, CURRENT_SNAPSHOT_VERSION)?;
    let snapshot: Snapshot = serde_json::from_value(migrated)?;
    info!(seq = snapshot.seq, version = snapshot.version, "loaded snapshot");
    Ok(Some(snapshot))
}

fn decode(bytes: &[u8]) -> Result<serde_json::Value, String> {
    if bytes.starts_with(&ZSTD_MAGIC) {
        let json = zstd::decode_all(bytes).map_err(|e| e.to_string())?;
        serde_json::from_slice(&json).map_err(|e| e.to_string())
    } else {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
