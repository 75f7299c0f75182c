// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Board snapshots for fast recovery.
//!
//! A snapshot holds the full board at one log position. Recovery loads it
//! and replays log entries with a higher sequence number.

use crate::migration::MigrationError;
use crate::state::BoardState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Snapshot schema version written by this build.
///
/// Version 1 kept maintenance calls in the department slot table; version 2
/// moved them into per-cell ticket lists.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    /// Log sequence number the state reflects
    pub seq: u64,
    pub state: BoardState,
    pub created_at: DateTime<Utc>,
}

const MAX_BAK_FILES: u32 = 3;

/// Free up `.bak` for a new backup, shifting older ones to `.bak.2` and
/// `.bak.3`. The oldest falls off once all three exist.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| match n {
        1 => path.with_extension("bak"),
        n => path.with_extension(format!("bak.{n}")),
    };

    let _ = fs::remove_file(bak(MAX_BAK_FILES));
    for n in (1..MAX_BAK_FILES).rev() {
        let from = bak(n);
        if from.exists() {
            let _ = fs::rename(&from, bak(n + 1));
        }
    }
    bak(1)
}
