// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance ticket entry handlers.

use andon_core::{LogEntry, Subject, Ticket, TicketStatus};

use super::BoardState;

pub(crate) fn apply(state: &mut BoardState, entry: &LogEntry) {
    let Subject::Ticket(ticket_id) = entry.subject() else {
        return;
    };
    let cell = entry.cell_id();

    match entry {
        LogEntry::Request { ts, ticket, .. } => {
            if state.ticket(cell, ticket_id.as_str()).is_some() {
                return;
            }
            let details = ticket.clone().unwrap_or_default();
            let mut record = Ticket::open(ticket_id.clone(), *ts, details.priority);
            record.issue = details.issue;
            record.asset = details.asset;
            record.work_order = details.work_order;
            state.tickets.entry(cell.to_string()).or_default().push(record);
        }

        LogEntry::Cancel { ts, reason, work_order, .. } => {
            let Some(record) = state.ticket_mut(cell, ticket_id.as_str()) else {
                return;
            };
            if record.status.is_terminal() {
                return;
            }
            record.status = TicketStatus::Cancelled;
            record.cancelled_at_ms = Some(*ts);
            record.cancel_reason = reason.clone();
            if work_order.is_some() {
                record.work_order = work_order.clone();
            }
        }

        LogEntry::Complete { ts, completion, work_order, .. } => {
            let Some(record) = state.ticket_mut(cell, ticket_id.as_str()) else {
                return;
            };
            if record.status.is_terminal() {
                return;
            }
            record.status = TicketStatus::Completed;
            record.completed_at_ms = Some(*ts);
            record.completed_by = Some(completion.responder.clone());
            record.result = Some(completion.result.clone());
            record.solution_note = Some(completion.note.clone()).filter(|n| !n.is_empty());
            record.progress_note.clear();
            if work_order.is_some() {
                record.work_order = work_order.clone();
            }
        }
    }
}
