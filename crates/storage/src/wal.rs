// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only durable log of lifecycle entries.
//!
//! One JSON record per line: `{"seq": N, "entry": {...}}`. Sequence numbers
//! are strictly increasing and survive history rewrites unchanged, so a
//! snapshot's `seq` always identifies the same position in the log.

use crate::snapshot::rotate_bak_path;
use andon_core::LogEntry;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A log record with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub entry: LogEntry,
}

pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
}

impl Wal {
    /// Open (or create) the log at `path`.
    ///
    /// A corrupt tail is cut off: the original file is rotated to `.bak`
    /// and the valid prefix is rewritten in its place.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut write_seq = 0;
        if path.exists() {
            let scan = scan(path)?;
            write_seq = scan.valid.last().map(|e| e.seq).unwrap_or(0);
            if scan.corrupt {
                let bak = rotate_bak_path(path);
                warn!(
                    path = %path.display(),
                    bak = %bak.display(),
                    kept = scan.valid.len(),
                    "corrupt log tail, rotating original to backup"
                );
                fs::rename(path, &bak)?;
                write_entries(path, &scan.valid)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), writer: BufWriter::new(file), write_seq })
    }

    /// Buffer an entry and return its sequence number.
    pub fn append(&mut self, entry: &LogEntry) -> Result<u64, WalError> {
        let record = WalEntry { seq: self.write_seq + 1, entry: entry.clone() };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.write_seq = record.seq;
        Ok(record.seq)
    }

    /// Write buffered entries through to disk.
    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    /// Sequence number of the last appended entry (0 when empty).
    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Flushed entries with `seq > after`, oldest first.
    ///
    /// Reading stops at the first corrupt record.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>, WalError> {
        Ok(read_valid(&self.path)?.into_iter().filter(|e| e.seq > after).collect())
    }

    /// The newest `n` flushed entries, oldest first.
    pub fn read_last(&self, n: usize) -> Result<Vec<WalEntry>, WalError> {
        let mut entries = read_valid(&self.path)?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.split_off(skip))
    }

    /// Rewrite the log without the records `exclude` selects.
    ///
    /// Returns the number of records removed. The rewrite goes to a temp
    /// file that replaces the log atomically.
    pub fn rewrite_excluding<F>(&mut self, exclude: F) -> Result<usize, WalError>
    where
        F: Fn(&WalEntry) -> bool,
    {
        self.flush()?;
        let entries = read_valid(&self.path)?;
        let total = entries.len();
        let kept: Vec<WalEntry> = entries.into_iter().filter(|e| !exclude(e)).collect();
        let removed = total - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let tmp = self.path.with_extension("wal.tmp");
        write_entries(&tmp, &kept)?;
        fs::rename(&tmp, &self.path)?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        Ok(removed)
    }
}

struct Scan {
    valid: Vec<WalEntry>,
    corrupt: bool,
}

fn scan(path: &Path) -> Result<Scan, WalError> {
    let bytes = fs::read(path)?;
    let mut valid = Vec::new();
    for line in bytes.split(|b| *b == b'\n') {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<WalEntry>(line) {
            Ok(entry) => valid.push(entry),
            Err(_) => return Ok(Scan { valid, corrupt: true }),
        }
    }
    Ok(Scan { valid, corrupt: false })
}

fn read_valid(path: &Path) -> Result<Vec<WalEntry>, WalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let scan = scan(path)?;
    if scan.corrupt {
        warn!(path = %path.display(), read = scan.valid.len(), "stopped reading log at corrupt record");
    }
    Ok(scan.valid)
}

fn write_entries(path: &Path, entries: &[WalEntry]) -> Result<(), WalError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
