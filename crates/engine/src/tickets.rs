// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket lifecycle: any number of maintenance tickets per cell.
//!
//! OPEN --cancel--> CANCELLED, OPEN --complete--> COMPLETED. The CMMS is
//! consulted when a ticket is raised and told about the outcome after the
//! transition commits; its failures only annotate the ticket.

use crate::calls::CompletionInput;
use crate::desk::Desk;
use crate::error::DeskError;
use andon_adapters::{CmmsAdapter, CmmsError, NotifyAdapter, WorkOrderRequest};
use andon_core::{
    clamp_progress_note, Clock, LogEntry, Priority, Subject, Ticket, TicketDetails, TicketId,
    WorkOrderLink,
};
use tracing::{info, warn};

/// Operator-supplied fields for a new ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketInput {
    pub priority: Priority,
    pub issue: String,
    /// Asset id or lookup code; may be empty
    pub asset: String,
}

/// Who the CMMS is told cancelled a work order.
const CANCEL_ACTOR: &str = "Andon board";

enum Followup {
    Close { responder: String, notes: String },
    Cancel { reason: String },
}

impl<M, N, C> Desk<M, N, C>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    /// Raise a ticket. Always creates a new one; a CMMS failure leaves the
    /// ticket with an error on its work order link.
    pub async fn open_ticket(&self, cell_id: &str, input: TicketInput) -> Result<TicketId, DeskError> {
        let dept = self.ticket_department()?.clone();
        let cell = self.cell(cell_id)?.clone();
        let issue = input.issue.trim().to_string();
        if issue.is_empty() {
            return Err(DeskError::validation("describe the problem"));
        }
        let asset = input.asset.trim().to_string();
        let ticket_id = TicketId::new();
        // The ticket is raised now, not when the CMMS answers
        let requested_at = self.now_ms();

        let request = WorkOrderRequest {
            cell_id: cell.id.clone(),
            cell_name: cell.name.clone(),
            priority: input.priority,
            issue: issue.clone(),
            asset: asset.clone(),
        };
        let work_order = match self.cmms.create_work_order(&request).await {
            Ok(link) => Some(link),
            Err(CmmsError::Disabled) => None,
            Err(e) => {
                warn!(cell = cell_id, %ticket_id, error = %e, "work order creation failed");
                Some(WorkOrderLink::failed(e.to_string()))
            }
        };

        {
            let mut board = self.board();
            let entry = LogEntry::Request {
                ts: requested_at,
                dept: dept.id.clone(),
                cell_id: cell_id.to_string(),
                subject: Subject::Ticket(ticket_id.clone()),
                ticket: Some(TicketDetails { priority: input.priority, issue: issue.clone(), asset, work_order }),
            };
            self.commit(&mut board, &entry);
        }

        info!(cell = cell_id, %ticket_id, priority = %input.priority, "ticket opened");
        self.notify_later(dept.name.clone(), format!("{} ({}): {}", cell.name, input.priority, issue));
        self.publish(&dept.id, cell_id);
        Ok(ticket_id)
    }

    /// Cancel a ticket: the one named, or the newest open ticket on the
    /// cell. Returns the cancelled ticket, or `None` if nothing matched.
    pub fn cancel_ticket(
        &self,
        cell_id: &str,
        ticket_id: Option<&str>,
        reason: Option<String>,
    ) -> Result<Option<Ticket>, DeskError> {
        let dept = self.ticket_department()?;
        let cell = self.cell(cell_id)?;
        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());

        let ticket = {
            let mut board = self.board();
            let target = match ticket_id {
                Some(id) => board.ticket(cell_id, id).filter(|t| t.is_open()),
                None => board.newest_open_ticket(cell_id),
            };
            let Some(target) = target.map(|t| t.ticket_id.clone()) else {
                return Ok(None);
            };
            let work_order = board.ticket(cell_id, target.as_str()).and_then(|t| t.work_order.clone());
            let entry = LogEntry::Cancel {
                ts: self.now_ms(),
                dept: dept.id.clone(),
                cell_id: cell_id.to_string(),
                subject: Subject::Ticket(target.clone()),
                reason: reason.clone(),
                work_order,
            };
            self.commit(&mut board, &entry);
            board.ticket(cell_id, target.as_str()).cloned()
        };
        let Some(ticket) = ticket else {
            return Ok(None);
        };

        info!(cell = cell_id, ticket_id = %ticket.ticket_id, "ticket cancelled");
        self.follow_up(cell_id, &ticket, Followup::Cancel { reason: reason.unwrap_or_default() });
        self.notify_later(dept.name.clone(), format!("{} ticket cancelled at {}", dept.name, cell.name));
        self.publish(&dept.id, cell_id);
        Ok(Some(ticket))
    }

    /// Complete a ticket: the one named, or the longest-waiting open ticket
    /// on the cell. Returns the completed ticket, or `None` if nothing
    /// matched.
    pub fn complete_ticket(
        &self,
        cell_id: &str,
        ticket_id: Option<&str>,
        input: CompletionInput,
    ) -> Result<Option<Ticket>, DeskError> {
        let dept = self.ticket_department()?;
        let cell = self.cell(cell_id)?;
        let completion = input.validate(dept)?;

        let ticket = {
            let mut board = self.board();
            let target = match ticket_id {
                Some(id) => board.ticket(cell_id, id).filter(|t| t.is_open()),
                None => board.oldest_open_ticket(cell_id),
            };
            let Some((target, created_at_ms, work_order)) =
                target.map(|t| (t.ticket_id.clone(), t.created_at_ms, t.work_order.clone()))
            else {
                return Ok(None);
            };
            let now = self.now_ms();
            let entry = LogEntry::Complete {
                ts: now,
                dept: dept.id.clone(),
                cell_id: cell_id.to_string(),
                subject: Subject::Ticket(target.clone()),
                completion: completion.clone(),
                elapsed_ms: Some(now.saturating_sub(created_at_ms)),
                work_order,
            };
            self.commit(&mut board, &entry);
            board.ticket(cell_id, target.as_str()).cloned()
        };
        let Some(ticket) = ticket else {
            return Ok(None);
        };

        info!(cell = cell_id, ticket_id = %ticket.ticket_id, responder = %completion.responder, "ticket completed");
        let notes = completion_notes(&completion.result, &completion.note);
        self.follow_up(cell_id, &ticket, Followup::Close { responder: completion.responder.clone(), notes });
        self.notify_later(
            dept.name.clone(),
            format!("{} ticket completed at {} by {}", dept.name, cell.name, completion.responder),
        );
        self.publish(&dept.id, cell_id);
        Ok(Some(ticket))
    }

    /// Replace the progress note on an open ticket.
    pub fn set_ticket_progress(&self, cell_id: &str, ticket_id: &str, note: &str) -> Result<(), DeskError> {
        let dept = self.ticket_department()?.id.clone();
        self.cell(cell_id)?;
        {
            let mut board = self.board();
            let Some(ticket) = board.ticket_mut(cell_id, ticket_id) else {
                return Err(DeskError::not_found(format!("unknown ticket: {ticket_id}")));
            };
            if !ticket.is_open() {
                return Err(DeskError::validation(format!("ticket {ticket_id} is {}", ticket.status)));
            }
            ticket.progress_note = clamp_progress_note(note);
        }
        self.publish(&dept, cell_id);
        Ok(())
    }

    /// Tell the CMMS how a ticket ended, in the background. A failure is
    /// written to the ticket's work order link.
    fn follow_up(&self, cell_id: &str, ticket: &Ticket, followup: Followup) {
        let Some(external_id) = ticket.work_order.as_ref().and_then(|w| w.external_id()).map(str::to_string)
        else {
            return;
        };
        let desk = self.clone();
        let cell_id = cell_id.to_string();
        let ticket_id = ticket.ticket_id.clone();
        self.tasks.spawn(async move {
            let result = match &followup {
                Followup::Close { responder, notes } => {
                    desk.cmms.close_work_order(&external_id, responder, notes).await
                }
                Followup::Cancel { reason } => {
                    desk.cmms.cancel_work_order(&external_id, CANCEL_ACTOR, reason).await
                }
            };
            match result {
                Ok(()) | Err(CmmsError::Disabled) => {}
                Err(e) => {
                    warn!(cell = %cell_id, %ticket_id, work_order = %external_id, error = %e, "work order update failed");
                    let annotated = desk.board().annotate_close_error(&cell_id, &ticket_id, e.to_string());
                    if annotated {
                        if let Ok(dept) = desk.ticket_department() {
                            desk.publish(&dept.id, &cell_id);
                        }
                    }
                }
            }
        });
    }
}

fn completion_notes(result: &str, note: &str) -> String {
    if note.is_empty() {
        result.to_string()
    } else {
        format!("{result}\n\n{note}")
    }
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
