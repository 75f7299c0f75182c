// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only projections of the board for dashboards.

use crate::desk::Desk;
use crate::error::DeskError;
use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::{CallSlot, Cell, Clock, Department, DepartmentKind, Ticket};
use andon_storage::BoardState;

/// One department at one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub department: Department,
    pub cell: Cell,
    /// Set for single-slot departments
    pub slot: Option<CallSlot>,
    /// Open tickets, oldest first; empty for single-slot departments
    pub open_tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentBoard {
    pub department: Department,
    pub rows: Vec<BoardRow>,
    pub now_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBoard {
    pub cell: Cell,
    pub rows: Vec<BoardRow>,
    pub now_ms: u64,
}

fn row(board: &BoardState, department: &Department, cell: &Cell) -> BoardRow {
    let (slot, open_tickets) = match department.kind {
        DepartmentKind::SingleSlot => {
            (Some(board.slot(&department.id, &cell.id).cloned().unwrap_or_default()), Vec::new())
        }
        DepartmentKind::MultiTicket => (None, board.open_tickets(&cell.id).cloned().collect()),
    };
    BoardRow { department: department.clone(), cell: cell.clone(), slot, open_tickets }
}

impl<M, N, C> Desk<M, N, C>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    /// Every cell's state for one department, in catalog order.
    pub fn board_for_department(&self, dept: &str) -> Result<DepartmentBoard, DeskError> {
        let department = self.department(dept)?.clone();
        let rows = self.read(|board| {
            self.catalog().cells().iter().map(|cell| row(board, &department, cell)).collect()
        });
        Ok(DepartmentBoard { department, rows, now_ms: self.now_ms() })
    }

    /// Every department's state at one cell, in catalog order.
    pub fn board_for_cell(&self, cell_id: &str) -> Result<CellBoard, DeskError> {
        let cell = self.cell(cell_id)?.clone();
        let rows = self.read(|board| {
            self.catalog().departments().iter().map(|dept| row(board, dept, &cell)).collect()
        });
        Ok(CellBoard { cell, rows, now_ms: self.now_ms() })
    }
}
