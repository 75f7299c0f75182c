// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Board projections as the dashboards render them.

use andon_core::{
    CallSlot, CallStatus, Cell, Department, DepartmentKind, Priority, Ticket, TicketStatus,
    WorkOrderLink,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_error: Option<String>,
}

impl From<&WorkOrderLink> for WorkOrderView {
    fn from(link: &WorkOrderLink) -> Self {
        Self {
            external_id: link.external_id.clone(),
            display_number: link.display_number.clone(),
            url: link.url.clone(),
            error: link.error.clone(),
            close_error: link.close_error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waited_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order: Option<WorkOrderView>,
}

impl SlotView {
    pub fn new(slot: &CallSlot, now_ms: u64) -> Self {
        let waiting = slot.is_waiting();
        Self {
            status: slot.status,
            call_id: slot.open_call().map(|id| id.to_string()),
            requested_at_ms: slot.requested_at_ms.filter(|_| waiting),
            waited_ms: slot.waited_ms(now_ms).filter(|_| waiting),
            work_order: slot.work_order.as_ref().map(WorkOrderView::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub ticket_id: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub issue: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asset: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub progress_note: String,
    pub created_at_ms: u64,
    pub waited_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order: Option<WorkOrderView>,
}

impl TicketView {
    pub fn new(ticket: &Ticket, now_ms: u64) -> Self {
        Self {
            ticket_id: ticket.ticket_id.to_string(),
            status: ticket.status,
            priority: ticket.priority,
            issue: ticket.issue.clone(),
            asset: ticket.asset.clone(),
            progress_note: ticket.progress_note.clone(),
            created_at_ms: ticket.created_at_ms,
            waited_ms: now_ms.saturating_sub(ticket.created_at_ms),
            work_order: ticket.work_order.as_ref().map(WorkOrderView::from),
        }
    }
}

/// One department at one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub dept: String,
    pub dept_name: String,
    pub kind: DepartmentKind,
    pub cell_id: String,
    pub cell_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<SlotView>,
    #[serde(default)]
    pub tickets: Vec<TicketView>,
}

impl RowView {
    pub fn new(
        department: &Department,
        cell: &Cell,
        slot: Option<&CallSlot>,
        tickets: &[Ticket],
        now_ms: u64,
    ) -> Self {
        Self {
            dept: department.id.clone(),
            dept_name: department.name.clone(),
            kind: department.kind,
            cell_id: cell.id.clone(),
            cell_name: cell.name.clone(),
            slot: slot.map(|s| SlotView::new(s, now_ms)),
            tickets: tickets.iter().map(|t| TicketView::new(t, now_ms)).collect(),
        }
    }

    /// Something is waiting on this row.
    pub fn is_active(&self) -> bool {
        self.slot.as_ref().is_some_and(|s| s.status == CallStatus::Waiting) || !self.tickets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBoardView {
    pub dept: String,
    pub name: String,
    pub kind: DepartmentKind,
    pub requires_part_number: bool,
    pub now_ms: u64,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBoardView {
    pub cell_id: String,
    pub name: String,
    pub now_ms: u64,
    pub rows: Vec<RowView>,
}

/// Either projection, as pushed to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoardView {
    Department(DepartmentBoardView),
    Cell(CellBoardView),
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
