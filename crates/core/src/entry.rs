// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle log entries.
//!
//! Entries are facts: once appended to the log they are never modified.
//! The live board is derived by applying them; historical reporting reads
//! them back directly.

use crate::id::{CallId, TicketId};
use crate::ticket::Priority;
use crate::work_order::WorkOrderLink;
use serde::{Deserialize, Serialize};

/// What an entry is about: a department call or a maintenance ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Call(CallId),
    Ticket(TicketId),
}

impl Subject {
    pub fn id(&self) -> &str {
        match self {
            Subject::Call(id) => id.as_str(),
            Subject::Ticket(id) => id.as_str(),
        }
    }
}

/// Details captured when a ticket is raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub asset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order: Option<WorkOrderLink>,
}

/// Responder-supplied completion payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub responder: String,
    pub result: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
}

/// One lifecycle transition.
///
/// Serializes with `{"type": "request" | "cancel" | "complete", ...fields}`.
/// `ts` defaults to zero when absent from a record; see [`LogEntry::recorded_at`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    Request {
        #[serde(default)]
        ts: u64,
        dept: String,
        cell_id: String,
        subject: Subject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ticket: Option<TicketDetails>,
    },
    Cancel {
        #[serde(default)]
        ts: u64,
        dept: String,
        cell_id: String,
        subject: Subject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        work_order: Option<WorkOrderLink>,
    },
    Complete {
        #[serde(default)]
        ts: u64,
        dept: String,
        cell_id: String,
        subject: Subject,
        completion: Completion,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elapsed_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        work_order: Option<WorkOrderLink>,
    },
}

/// Tag-only view of [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Request,
    Cancel,
    Complete,
}

crate::simple_display! {
    EntryKind {
        Request => "request",
        Cancel => "cancel",
        Complete => "complete",
    }
}

impl LogEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            LogEntry::Request { .. } => EntryKind::Request,
            LogEntry::Cancel { .. } => EntryKind::Cancel,
            LogEntry::Complete { .. } => EntryKind::Complete,
        }
    }

    fn raw_ts(&self) -> u64 {
        match self {
            LogEntry::Request { ts, .. }
            | LogEntry::Cancel { ts, .. }
            | LogEntry::Complete { ts, .. } => *ts,
        }
    }

    /// The entry timestamp, or `None` for records written without one.
    pub fn recorded_at(&self) -> Option<u64> {
        Some(self.raw_ts()).filter(|ts| *ts > 0)
    }

    pub fn dept(&self) -> &str {
        match self {
            LogEntry::Request { dept, .. }
            | LogEntry::Cancel { dept, .. }
            | LogEntry::Complete { dept, .. } => dept,
        }
    }

    pub fn cell_id(&self) -> &str {
        match self {
            LogEntry::Request { cell_id, .. }
            | LogEntry::Cancel { cell_id, .. }
            | LogEntry::Complete { cell_id, .. } => cell_id,
        }
    }

    pub fn subject(&self) -> &Subject {
        match self {
            LogEntry::Request { subject, .. }
            | LogEntry::Cancel { subject, .. }
            | LogEntry::Complete { subject, .. } => subject,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LogEntry::Request { .. })
    }
}

/// Selects log records for administrative history clearing.
///
/// Unset fields match everything; an empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    #[serde(default)]
    pub dept: Option<String>,
    #[serde(default)]
    pub cell_id: Option<String>,
    #[serde(default)]
    pub before_ms: Option<u64>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.matches_parts(entry.dept(), entry.cell_id(), entry.recorded_at())
    }

    pub fn matches_parts(&self, dept: &str, cell_id: &str, at_ms: Option<u64>) -> bool {
        if self.dept.as_deref().is_some_and(|d| d != dept) {
            return false;
        }
        if self.cell_id.as_deref().is_some_and(|c| c != cell_id) {
            return false;
        }
        match (self.before_ms, at_ms) {
            (Some(before), Some(at)) => at < before,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
