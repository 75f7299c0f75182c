// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{CallId, Completion, LogEntry, Priority, Subject, TicketDetails, TicketId};

/// Department id the entry factories use for tickets.
pub const MAINTENANCE: &str = "maintenance";

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::ticket::Priority;
    use proptest::prelude::*;

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
    }
}

// ── Entry factory functions ─────────────────────────────────────────────

pub fn completion(responder: &str, result: &str) -> Completion {
    Completion {
        responder: responder.to_string(),
        result: result.to_string(),
        note: String::new(),
        part_number: None,
    }
}

pub fn call_request(dept: &str, cell: &str, call_id: &str, ts: u64) -> LogEntry {
    LogEntry::Request {
        ts,
        dept: dept.to_string(),
        cell_id: cell.to_string(),
        subject: Subject::Call(CallId::from_string(call_id)),
        ticket: None,
    }
}

pub fn call_cancel(dept: &str, cell: &str, call_id: &str, ts: u64) -> LogEntry {
    LogEntry::Cancel {
        ts,
        dept: dept.to_string(),
        cell_id: cell.to_string(),
        subject: Subject::Call(CallId::from_string(call_id)),
        reason: None,
        work_order: None,
    }
}

pub fn call_complete(
    dept: &str,
    cell: &str,
    call_id: &str,
    ts: u64,
    elapsed_ms: Option<u64>,
) -> LogEntry {
    LogEntry::Complete {
        ts,
        dept: dept.to_string(),
        cell_id: cell.to_string(),
        subject: Subject::Call(CallId::from_string(call_id)),
        completion: completion("Alice", "Fixed"),
        elapsed_ms,
        work_order: None,
    }
}

pub fn ticket_request(cell: &str, ticket_id: &str, ts: u64) -> LogEntry {
    LogEntry::Request {
        ts,
        dept: MAINTENANCE.to_string(),
        cell_id: cell.to_string(),
        subject: Subject::Ticket(TicketId::from_string(ticket_id)),
        ticket: Some(TicketDetails {
            priority: Priority::Medium,
            issue: "Spindle alarm".to_string(),
            asset: String::new(),
            work_order: None,
        }),
    }
}

pub fn ticket_cancel(cell: &str, ticket_id: &str, ts: u64) -> LogEntry {
    LogEntry::Cancel {
        ts,
        dept: MAINTENANCE.to_string(),
        cell_id: cell.to_string(),
        subject: Subject::Ticket(TicketId::from_string(ticket_id)),
        reason: None,
        work_order: None,
    }
}

pub fn ticket_complete(cell: &str, ticket_id: &str, ts: u64, elapsed_ms: Option<u64>) -> LogEntry {
    LogEntry::Complete {
        ts,
        dept: MAINTENANCE.to_string(),
        cell_id: cell.to_string(),
        subject: Subject::Ticket(TicketId::from_string(ticket_id)),
        completion: completion("Bob", "Replaced sensor"),
        elapsed_ms,
        work_order: None,
    }
}
