// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The desk: one writer in front of the board and the durable log.

use crate::calls::CompletionInput;
use crate::error::DeskError;
use crate::timeline::{self, Interval, Window};
use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::{
    Catalog, Cell, Clock, Department, DepartmentKind, HistoryFilter, LogEntry, Subject,
};
use andon_storage::{BoardState, Wal, WalEntry, WalError};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

const UPDATE_BUFFER: usize = 256;

/// External collaborators the desk drives after a transition commits.
pub struct DeskDeps<M, N> {
    pub cmms: M,
    pub notifier: N,
}

/// Published after every change to a (department, cell) on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    pub dept: String,
    pub cell_id: String,
}

/// Which open item a cancel request is aimed at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelTarget {
    /// Guard for calls: only cancel if this is still the open call
    pub call_id: Option<String>,
    /// Ticket to cancel; the newest open ticket when absent
    pub ticket_id: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearSummary {
    pub log_entries_removed: usize,
    pub tickets_removed: usize,
}

/// Single authority over the live board.
///
/// Check-and-commit for every transition happens under the board lock, so
/// transitions on the same slot or ticket list never interleave. The lock
/// is never held across an await. Each commit syncs the log before the lock
/// is released, so transitions are serialized on disk latency; with one
/// plant floor of callers that cost is accepted. Callers on an async runtime
/// should run [`Desk::timeline`] on a blocking thread, as it scans the whole
/// log.
#[derive(Clone)]
pub struct Desk<M, N, C: Clock> {
    catalog: Arc<Catalog>,
    board: Arc<Mutex<BoardState>>,
    wal: Arc<Mutex<Wal>>,
    pub(crate) cmms: M,
    notifier: N,
    clock: C,
    updates: broadcast::Sender<BoardUpdate>,
    pub(crate) tasks: TaskTracker,
}

impl<M, N, C> Desk<M, N, C>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    /// Build a desk over a recovered board. Missing catalog slots are
    /// filled in as READY.
    pub fn new(
        catalog: Catalog,
        mut board: BoardState,
        wal: Wal,
        deps: DeskDeps<M, N>,
        clock: C,
    ) -> Self {
        board.ensure_slots(&catalog);
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            catalog: Arc::new(catalog),
            board: Arc::new(Mutex::new(board)),
            wal: Arc::new(Mutex::new(wal)),
            cmms: deps.cmms,
            notifier: deps.notifier,
            clock,
            updates,
            tasks: TaskTracker::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    pub(crate) fn department(&self, id: &str) -> Result<&Department, DeskError> {
        self.catalog.department(id).ok_or_else(|| DeskError::not_found(format!("unknown department: {id}")))
    }

    pub(crate) fn cell(&self, id: &str) -> Result<&Cell, DeskError> {
        self.catalog.cell(id).ok_or_else(|| DeskError::not_found(format!("unknown cell: {id}")))
    }

    pub(crate) fn ticket_department(&self) -> Result<&Department, DeskError> {
        self.catalog
            .ticket_department()
            .ok_or_else(|| DeskError::validation("no department takes maintenance tickets"))
    }

    pub(crate) fn board(&self) -> parking_lot::MutexGuard<'_, BoardState> {
        self.board.lock()
    }

    /// Apply `entry` to the board and append it to the log.
    ///
    /// A log write failure is logged and the board keeps the change; the
    /// in-memory board stays authoritative for this process.
    pub(crate) fn commit(&self, board: &mut BoardState, entry: &LogEntry) -> Option<u64> {
        board.apply_entry(entry);
        let mut wal = self.wal.lock();
        match persist(&mut wal, entry) {
            Ok(seq) => Some(seq),
            Err(e) => {
                warn!(
                    dept = entry.dept(),
                    cell = entry.cell_id(),
                    id = entry.subject().id(),
                    error = %e,
                    "failed to persist log entry"
                );
                None
            }
        }
    }

    pub(crate) fn publish(&self, dept: &str, cell_id: &str) {
        // No subscribers is fine
        let _ = self.updates.send(BoardUpdate { dept: dept.to_string(), cell_id: cell_id.to_string() });
    }

    /// Send a notification in the background.
    pub(crate) fn notify_later(&self, title: String, message: String) {
        let notifier = self.notifier.clone();
        self.tasks.spawn(async move {
            if let Err(e) = notifier.notify(&title, &message).await {
                warn!(%title, error = %e, "notification failed");
            }
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardUpdate> {
        self.updates.subscribe()
    }

    /// Run `f` against the current board.
    pub fn read<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        f(&self.board.lock())
    }

    /// Sequence number of the last log entry written.
    pub fn log_seq(&self) -> u64 {
        self.wal.lock().write_seq()
    }

    /// The board together with the log position it reflects.
    pub fn checkpoint_view(&self) -> (u64, BoardState) {
        let board = self.board.lock();
        let seq = self.wal.lock().write_seq();
        (seq, board.clone())
    }

    /// Cancel the open item for `dept` at `cell_id`.
    ///
    /// Returns false when nothing matched: no open call, a call guard that
    /// no longer matches, or no such open ticket.
    pub fn cancel(&self, dept: &str, cell_id: &str, target: CancelTarget) -> Result<bool, DeskError> {
        match self.department(dept)?.kind {
            DepartmentKind::SingleSlot => {
                self.cancel_call(dept, cell_id, target.call_id.as_deref(), target.reason)
            }
            DepartmentKind::MultiTicket => Ok(self
                .cancel_ticket(cell_id, target.ticket_id.as_deref(), target.reason)?
                .is_some()),
        }
    }

    /// Complete the open item for `dept` at `cell_id`.
    pub fn complete(
        &self,
        dept: &str,
        cell_id: &str,
        ticket_id: Option<&str>,
        input: CompletionInput,
    ) -> Result<(), DeskError> {
        match self.department(dept)?.kind {
            DepartmentKind::SingleSlot => self.complete_call(dept, cell_id, input),
            DepartmentKind::MultiTicket => match self.complete_ticket(cell_id, ticket_id, input)? {
                Some(_) => Ok(()),
                None => Err(DeskError::not_found(format!("no open ticket at {cell_id}"))),
            },
        }
    }

    /// The newest `limit` log entries, oldest first.
    pub fn recent_history(&self, limit: usize) -> Result<Vec<WalEntry>, DeskError> {
        Ok(self.wal.lock().read_last(limit)?)
    }

    /// Reconstruct activity intervals for `window` from the full log.
    pub fn timeline(&self, window: Window, depts: &[String]) -> Result<Vec<Interval>, DeskError> {
        let entries = self.wal.lock().entries_after(0)?;
        Ok(timeline::reconstruct(entries.iter().map(|e| &e.entry), window, depts, self.now_ms()))
    }

    /// Remove history matching `filter` from the log and closed tickets from
    /// the board. Records of items still open are always kept.
    ///
    /// Each call or ticket is cleared as a whole: all of its records go, or
    /// none do. The age bound is matched against when the item closed, the
    /// same rule the board uses for tickets.
    pub fn clear_history(&self, filter: &HistoryFilter) -> Result<ClearSummary, DeskError> {
        let mut board = self.board.lock();
        let mut wal = self.wal.lock();
        let cleared = cleared_subjects(&wal.entries_after(0)?, filter, &board);
        let log_entries_removed = if cleared.is_empty() {
            0
        } else {
            wal.rewrite_excluding(|e| cleared.contains(&subject_key(&e.entry)))?
        };
        drop(wal);

        let mut tickets_removed = 0;
        if let Some(dept) = self.catalog.ticket_department() {
            tickets_removed = board.prune_closed_tickets(&dept.id, filter);
            if tickets_removed > 0 {
                for cell in self.catalog.cells() {
                    self.publish(&dept.id, &cell.id);
                }
            }
        }
        info!(log_entries_removed, tickets_removed, "cleared history");
        Ok(ClearSummary { log_entries_removed, tickets_removed })
    }

    /// Stop accepting background work and wait for what is in flight.
    ///
    /// Returns false if `timeout` passed first.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tasks.close();
        tokio::time::timeout(timeout, self.tasks.wait()).await.is_ok()
    }
}

type SubjectKey = (String, String, Subject);

fn subject_key(entry: &LogEntry) -> SubjectKey {
    (entry.dept().to_string(), entry.cell_id().to_string(), entry.subject().clone())
}

/// Items whose records `filter` clears. An item with a terminal record is
/// dated by its last one; an item without one (never closed) is dated by its
/// first record and only cleared when nothing on the board still holds it.
fn cleared_subjects(
    entries: &[WalEntry],
    filter: &HistoryFilter,
    board: &BoardState,
) -> HashSet<SubjectKey> {
    let mut items: HashMap<SubjectKey, (Option<u64>, Option<Option<u64>>)> = HashMap::new();
    for e in entries {
        let (first_at, closed_at) = items.entry(subject_key(&e.entry)).or_default();
        if first_at.is_none() {
            *first_at = e.entry.recorded_at();
        }
        if e.entry.is_terminal() {
            *closed_at = Some(e.entry.recorded_at());
        }
    }

    items
        .into_iter()
        .filter(|((dept, cell, subject), (first_at, closed_at))| {
            !board.is_open(dept, cell, subject)
                && filter.matches_parts(dept, cell, closed_at.unwrap_or(*first_at))
        })
        .map(|(key, _)| key)
        .collect()
}

fn persist(wal: &mut Wal, entry: &LogEntry) -> Result<u64, WalError> {
    let seq = wal.append(entry)?;
    wal.flush()?;
    Ok(seq)
}

#[cfg(test)]
#[path = "desk_tests.rs"]
mod tests;
