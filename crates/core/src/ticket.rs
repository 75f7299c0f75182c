// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance tickets: many may be open per cell at once.

use crate::id::TicketId;
use crate::work_order::WorkOrderLink;
use serde::{Deserialize, Serialize};

/// Longest progress note kept on a ticket, in characters.
pub const PROGRESS_NOTE_MAX: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    Cancelled,
    Completed,
}

impl TicketStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TicketStatus::Open)
    }
}

crate::simple_display! {
    TicketStatus {
        Open => "OPEN",
        Cancelled => "CANCELLED",
        Completed => "COMPLETED",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

crate::simple_display! {
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub status: TicketStatus,
    pub created_at_ms: u64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub issue: String,
    /// Operator's asset selection as entered (may be empty).
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub progress_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order: Option<WorkOrderLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl Ticket {
    pub fn open(ticket_id: TicketId, created_at_ms: u64, priority: Priority) -> Self {
        Self {
            ticket_id,
            status: TicketStatus::Open,
            created_at_ms,
            priority,
            issue: String::new(),
            asset: String::new(),
            progress_note: String::new(),
            work_order: None,
            completed_at_ms: None,
            cancelled_at_ms: None,
            completed_by: None,
            result: None,
            solution_note: None,
            cancel_reason: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open
    }

    /// When the ticket reached its terminal state, if it has.
    pub fn closed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms.or(self.cancelled_at_ms)
    }
}

/// Clamp a progress note to [`PROGRESS_NOTE_MAX`] characters.
pub fn clamp_progress_note(note: &str) -> String {
    note.trim().chars().take(PROGRESS_NOTE_MAX).collect()
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
