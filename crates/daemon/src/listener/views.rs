// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine projections to wire DTOs.

use andon_engine::{BoardRow, CellBoard, DepartmentBoard, Interval};
use andon_wire::{CellBoardView, DepartmentBoardView, IntervalView, RowView};

fn row(row: &BoardRow, now_ms: u64) -> RowView {
    RowView::new(&row.department, &row.cell, row.slot.as_ref(), &row.open_tickets, now_ms)
}

pub(crate) fn department(board: &DepartmentBoard) -> DepartmentBoardView {
    DepartmentBoardView {
        dept: board.department.id.clone(),
        name: board.department.name.clone(),
        kind: board.department.kind,
        requires_part_number: board.department.requires_part_number,
        now_ms: board.now_ms,
        rows: board.rows.iter().map(|r| row(r, board.now_ms)).collect(),
    }
}

pub(crate) fn cell(board: &CellBoard) -> CellBoardView {
    CellBoardView {
        cell_id: board.cell.id.clone(),
        name: board.cell.name.clone(),
        now_ms: board.now_ms,
        rows: board.rows.iter().map(|r| row(r, board.now_ms)).collect(),
    }
}

pub(crate) fn interval(interval: &Interval) -> IntervalView {
    IntervalView {
        dept: interval.dept.clone(),
        cell_id: interval.cell_id.clone(),
        start_ms: interval.start_ms,
        end_ms: interval.end_ms,
        duration_ms: interval.duration_ms(),
        status: interval.status.to_string(),
        label: interval.label.clone(),
        detail: interval.detail.clone(),
    }
}
