// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The live board: what is open right now, per department and cell.

mod calls;
mod tickets;

use andon_core::{Catalog, CallSlot, HistoryFilter, LogEntry, Subject, Ticket, TicketId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// dept id → cell id → slot, for single-slot departments
    #[serde(default)]
    pub slots: BTreeMap<String, BTreeMap<String, CallSlot>>,
    /// cell id → tickets in creation order
    #[serde(default)]
    pub tickets: BTreeMap<String, Vec<Ticket>>,
}

impl BoardState {
    /// Give every single-slot department a READY slot at every cell.
    ///
    /// Existing slots are left alone, including slots for departments or
    /// cells the catalog no longer lists.
    pub fn ensure_slots(&mut self, catalog: &Catalog) {
        for dept in catalog.slot_departments() {
            let cells = self.slots.entry(dept.id.clone()).or_default();
            for cell in catalog.cells() {
                cells.entry(cell.id.clone()).or_default();
            }
        }
    }

    pub fn slot(&self, dept: &str, cell: &str) -> Option<&CallSlot> {
        self.slots.get(dept).and_then(|cells| cells.get(cell))
    }

    pub(crate) fn slot_entry(&mut self, dept: &str, cell: &str) -> &mut CallSlot {
        self.slots.entry(dept.to_string()).or_default().entry(cell.to_string()).or_default()
    }

    /// Tickets for a cell, oldest first. Empty when the cell has none.
    pub fn tickets(&self, cell: &str) -> &[Ticket] {
        self.tickets.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn open_tickets<'a>(&'a self, cell: &str) -> impl Iterator<Item = &'a Ticket> + 'a {
        self.tickets(cell).iter().filter(|t| t.is_open())
    }

    pub fn ticket(&self, cell: &str, id: &str) -> Option<&Ticket> {
        self.tickets(cell).iter().find(|t| t.ticket_id == id)
    }

    pub fn ticket_mut(&mut self, cell: &str, id: &str) -> Option<&mut Ticket> {
        self.tickets.get_mut(cell)?.iter_mut().find(|t| t.ticket_id == id)
    }

    /// Most recently created open ticket. Later position wins on equal
    /// timestamps.
    pub fn newest_open_ticket(&self, cell: &str) -> Option<&Ticket> {
        self.open_tickets(cell).max_by_key(|t| t.created_at_ms)
    }

    /// Longest-waiting open ticket. Earlier position wins on equal
    /// timestamps.
    pub fn oldest_open_ticket(&self, cell: &str) -> Option<&Ticket> {
        self.open_tickets(cell).min_by_key(|t| t.created_at_ms)
    }

    /// Whether `subject` is still open on the board.
    pub fn is_open(&self, dept: &str, cell: &str, subject: &Subject) -> bool {
        match subject {
            Subject::Call(id) => self.slot(dept, cell).and_then(CallSlot::open_call) == Some(id),
            Subject::Ticket(id) => self.ticket(cell, id.as_str()).is_some_and(Ticket::is_open),
        }
    }

    /// Apply one log entry.
    ///
    /// Handlers are idempotent: applying the same entry twice leaves the
    /// board as applying it once. Recovery replays entries written after
    /// the snapshot, and the engine applies each entry as it commits.
    pub fn apply_entry(&mut self, entry: &LogEntry) {
        match entry.subject() {
            Subject::Call(_) => calls::apply(self, entry),
            Subject::Ticket(_) => tickets::apply(self, entry),
        }
    }

    /// Record a failed CMMS close/cancel on a ticket that is already
    /// terminal.
    pub fn annotate_close_error(&mut self, cell: &str, id: &TicketId, error: String) -> bool {
        let Some(ticket) = self.ticket_mut(cell, id.as_str()) else {
            return false;
        };
        ticket.work_order.get_or_insert_with(Default::default).close_error = Some(error);
        true
    }

    /// Drop terminal tickets selected by `filter`, matching the filter's
    /// age bound against when each ticket closed. Open tickets always stay.
    ///
    /// Returns the number of tickets removed.
    pub fn prune_closed_tickets(&mut self, ticket_dept: &str, filter: &HistoryFilter) -> usize {
        let mut removed = 0;
        for (cell, list) in self.tickets.iter_mut() {
            let before = list.len();
            list.retain(|t| t.is_open() || !filter.matches_parts(ticket_dept, cell, t.closed_at_ms()));
            removed += before - list.len();
        }
        self.tickets.retain(|_, list| !list.is_empty());
        removed
    }
}

#[cfg(test)]
#[path = "../state_tests.rs"]
mod tests;
