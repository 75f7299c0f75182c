// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call lifecycle: one READY/WAITING slot per department and cell.
//!
//! READY --open--> WAITING --cancel|complete--> READY. Nothing else.

use crate::desk::Desk;
use crate::error::DeskError;
use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::{CallId, Clock, Completion, Department, DepartmentKind, LogEntry, Subject};
use tracing::info;

/// Responder-supplied fields for completing a call or ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionInput {
    pub responder: String,
    pub result: String,
    pub note: String,
    pub part_number: Option<String>,
}

impl CompletionInput {
    /// Trim the input and check the fields every completion needs.
    pub(crate) fn validate(&self, dept: &Department) -> Result<Completion, DeskError> {
        let responder = self.responder.trim();
        let result = self.result.trim();
        if responder.is_empty() {
            return Err(DeskError::validation("responder is required"));
        }
        if result.is_empty() {
            return Err(DeskError::validation("result is required"));
        }
        let part_number =
            self.part_number.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(str::to_string);
        if dept.requires_part_number && part_number.is_none() {
            return Err(DeskError::validation(format!("{} completions require a part number", dept.name)));
        }
        Ok(Completion {
            responder: responder.to_string(),
            result: result.to_string(),
            note: self.note.trim().to_string(),
            part_number,
        })
    }
}

impl<M, N, C> Desk<M, N, C>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    fn slot_department(&self, dept: &str) -> Result<&Department, DeskError> {
        let department = self.department(dept)?;
        if department.kind != DepartmentKind::SingleSlot {
            return Err(DeskError::validation(format!("{} takes tickets, not calls", department.name)));
        }
        Ok(department)
    }

    /// Open a call, or return the call already open on the slot.
    pub fn open_call(&self, dept: &str, cell_id: &str) -> Result<CallId, DeskError> {
        let department = self.slot_department(dept)?;
        let cell = self.cell(cell_id)?;

        let call_id = {
            let mut board = self.board();
            if let Some(open) = board.slot(dept, cell_id).and_then(|s| s.open_call()) {
                return Ok(open.clone());
            }
            let call_id = CallId::new();
            let entry = LogEntry::Request {
                ts: self.now_ms(),
                dept: dept.to_string(),
                cell_id: cell_id.to_string(),
                subject: Subject::Call(call_id.clone()),
                ticket: None,
            };
            self.commit(&mut board, &entry);
            call_id
        };

        info!(dept, cell = cell_id, %call_id, "call opened");
        self.notify_later(department.name.clone(), format!("{} needs {}", cell.name, department.name));
        self.publish(dept, cell_id);
        Ok(call_id)
    }

    /// Cancel the open call. `expected` guards against cancelling a call
    /// that was already replaced by a newer one.
    pub fn cancel_call(
        &self,
        dept: &str,
        cell_id: &str,
        expected: Option<&str>,
        reason: Option<String>,
    ) -> Result<bool, DeskError> {
        let department = self.slot_department(dept)?;
        let cell = self.cell(cell_id)?;

        let call_id = {
            let mut board = self.board();
            let Some(open) = board.slot(dept, cell_id).and_then(|s| s.open_call()).cloned() else {
                return Ok(false);
            };
            if expected.is_some_and(|id| open != id) {
                return Ok(false);
            }
            let entry = LogEntry::Cancel {
                ts: self.now_ms(),
                dept: dept.to_string(),
                cell_id: cell_id.to_string(),
                subject: Subject::Call(open.clone()),
                reason: reason.filter(|r| !r.trim().is_empty()),
                work_order: None,
            };
            self.commit(&mut board, &entry);
            open
        };

        info!(dept, cell = cell_id, %call_id, "call cancelled");
        self.notify_later(department.name.clone(), format!("{} call cancelled at {}", department.name, cell.name));
        self.publish(dept, cell_id);
        Ok(true)
    }

    /// Complete the open call.
    pub fn complete_call(&self, dept: &str, cell_id: &str, input: CompletionInput) -> Result<(), DeskError> {
        let department = self.slot_department(dept)?;
        let cell = self.cell(cell_id)?;

        let (call_id, elapsed_ms) = {
            let mut board = self.board();
            let Some(slot) = board.slot(dept, cell_id).filter(|s| s.is_waiting()) else {
                return Err(DeskError::validation(format!("no open {} call at {}", department.name, cell.name)));
            };
            let completion = input.validate(department)?;
            let now = self.now_ms();
            let elapsed_ms = slot.waited_ms(now);
            let Some(call_id) = slot.call_id.clone() else {
                return Err(DeskError::validation("slot has no call id"));
            };
            let entry = LogEntry::Complete {
                ts: now,
                dept: dept.to_string(),
                cell_id: cell_id.to_string(),
                subject: Subject::Call(call_id.clone()),
                completion,
                elapsed_ms,
                work_order: slot.work_order.clone(),
            };
            self.commit(&mut board, &entry);
            (call_id, elapsed_ms)
        };

        info!(dept, cell = cell_id, %call_id, elapsed_ms, "call completed");
        self.notify_later(
            department.name.clone(),
            format!("{} call completed at {} by {}", department.name, cell.name, input.responder.trim()),
        );
        self.publish(dept, cell_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "calls_tests.rs"]
mod tests;
