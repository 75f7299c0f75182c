// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity intervals reconstructed from the durable log.
//!
//! Each correlation id becomes at most one interval: from its earliest
//! request to its earliest terminal entry, or to "now" while still open.
//! Cancelled items produce no interval. Results are clipped to the query
//! window.

use andon_core::{format_elapsed_ms, EntryKind, LogEntry, Subject};
use std::collections::BTreeMap;

/// How far outside the window to look for the ends of an interval.
pub const LOOKAROUND_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Query range `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Window {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    fn padded_contains(&self, ts: u64) -> bool {
        ts >= self.start_ms.saturating_sub(LOOKAROUND_MS) && ts < self.end_ms.saturating_add(LOOKAROUND_MS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalStatus {
    Open,
    Completed,
}

andon_core::simple_display! {
    IntervalStatus {
        Open => "OPEN",
        Completed => "COMPLETED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub dept: String,
    pub cell_id: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub status: IntervalStatus,
    pub label: String,
    pub detail: String,
}

impl Interval {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

#[derive(Default)]
struct Group<'a> {
    /// Earliest timestamped request
    request: Option<(u64, &'a LogEntry)>,
    terminals: Vec<&'a LogEntry>,
}

/// Rebuild intervals for `window` from `entries`.
///
/// `depts` limits the departments considered; empty means all. Entries
/// without a timestamp are kept so a completion can still be placed from
/// its elapsed time.
pub fn reconstruct<'a>(
    entries: impl IntoIterator<Item = &'a LogEntry>,
    window: Window,
    depts: &[String],
    now_ms: u64,
) -> Vec<Interval> {
    let mut groups: BTreeMap<&'a Subject, Group<'a>> = BTreeMap::new();
    for entry in entries {
        if !depts.is_empty() && !depts.iter().any(|d| d == entry.dept()) {
            continue;
        }
        if entry.recorded_at().is_some_and(|ts| !window.padded_contains(ts)) {
            continue;
        }
        let group = groups.entry(entry.subject()).or_default();
        match (entry.kind(), entry.recorded_at()) {
            (EntryKind::Request, Some(ts)) => {
                if group.request.map_or(true, |(earliest, _)| ts < earliest) {
                    group.request = Some((ts, entry));
                }
            }
            (EntryKind::Request, None) => {}
            _ => group.terminals.push(entry),
        }
    }

    let mut intervals: Vec<Interval> =
        groups.into_values().filter_map(|group| build(group, window, now_ms)).collect();
    intervals.sort_by(|a, b| {
        a.start_ms.cmp(&b.start_ms).then_with(|| b.duration_ms().cmp(&a.duration_ms()))
    });
    intervals
}

fn build(group: Group<'_>, window: Window, now_ms: u64) -> Option<Interval> {
    let (start, request) = group.request?;

    // Earliest terminal at or after the start. A completion written without
    // a timestamp is placed at start + elapsed.
    let terminal = group
        .terminals
        .iter()
        .filter_map(|entry| {
            let end = match entry {
                LogEntry::Complete { elapsed_ms, .. } => {
                    entry.recorded_at().or_else(|| elapsed_ms.map(|e| start.saturating_add(e)))
                }
                _ => entry.recorded_at(),
            }?;
            Some((end, *entry))
        })
        .filter(|(end, _)| *end >= start)
        .min_by_key(|(end, _)| *end);

    let (raw_end, status, terminal_entry) = match terminal {
        Some((_, LogEntry::Cancel { .. })) => return None,
        Some((end, entry)) => (end, IntervalStatus::Completed, Some(entry)),
        None if !group.terminals.is_empty() => return None,
        None => (now_ms.min(window.end_ms), IntervalStatus::Open, None),
    };

    let start_ms = start.max(window.start_ms);
    let end_ms = raw_end.min(window.end_ms);
    if end_ms <= start_ms {
        return None;
    }

    Some(Interval {
        dept: request.dept().to_string(),
        cell_id: request.cell_id().to_string(),
        start_ms,
        end_ms,
        status,
        label: label(request),
        detail: detail(terminal_entry, raw_end.saturating_sub(start)),
    })
}

fn label(request: &LogEntry) -> String {
    match request {
        LogEntry::Request { ticket: Some(details), .. } if !details.issue.is_empty() => {
            details.issue.clone()
        }
        _ => request.dept().to_string(),
    }
}

fn detail(terminal: Option<&LogEntry>, elapsed_ms: u64) -> String {
    let elapsed = format_elapsed_ms(elapsed_ms);
    match terminal {
        Some(LogEntry::Complete { completion, .. }) => {
            format!("{} by {} after {elapsed}", completion.result, completion.responder)
        }
        _ => format!("open for {elapsed}"),
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
