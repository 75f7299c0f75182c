// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed catalog of departments and production cells.
//!
//! The catalog is loaded once at startup and never changes for the life of
//! the process. Each department declares which lifecycle it follows, so call
//! sites select behaviour by [`DepartmentKind`] instead of comparing ids.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which lifecycle engine serves a department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentKind {
    /// One READY/WAITING call slot per cell.
    #[default]
    SingleSlot,
    /// Any number of concurrently open tickets per cell.
    MultiTicket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: DepartmentKind,
    /// Completions must name the part they dispositioned.
    #[serde(default)]
    pub requires_part_number: bool,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: DepartmentKind) -> Self {
        Self { id: id.into(), name: name.into(), kind, requires_part_number: false }
    }

    pub fn with_part_number(mut self) -> Self {
        self.requires_part_number = true;
        self
    }
}

/// A production location operators call help to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub name: String,
}

impl Cell {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no departments")]
    NoDepartments,
    #[error("catalog has no cells")]
    NoCells,
    #[error("duplicate department id: {0}")]
    DuplicateDepartment(String),
    #[error("duplicate cell id: {0}")]
    DuplicateCell(String),
    #[error("only one multi-ticket department is supported, found {0}")]
    MultipleTicketDepartments(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    departments: Vec<Department>,
    cells: Vec<Cell>,
}

impl Catalog {
    pub fn new(departments: Vec<Department>, cells: Vec<Cell>) -> Result<Self, CatalogError> {
        if departments.is_empty() {
            return Err(CatalogError::NoDepartments);
        }
        if cells.is_empty() {
            return Err(CatalogError::NoCells);
        }
        for (i, dept) in departments.iter().enumerate() {
            if departments[..i].iter().any(|d| d.id == dept.id) {
                return Err(CatalogError::DuplicateDepartment(dept.id.clone()));
            }
        }
        for (i, cell) in cells.iter().enumerate() {
            if cells[..i].iter().any(|c| c.id == cell.id) {
                return Err(CatalogError::DuplicateCell(cell.id.clone()));
            }
        }
        let ticket_depts =
            departments.iter().filter(|d| d.kind == DepartmentKind::MultiTicket).count();
        if ticket_depts > 1 {
            return Err(CatalogError::MultipleTicketDepartments(ticket_depts));
        }
        Ok(Self { departments, cells })
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Departments served by the call-slot engine.
    pub fn slot_departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.iter().filter(|d| d.kind == DepartmentKind::SingleSlot)
    }

    /// The department served by the ticket engine, if the floor has one.
    pub fn ticket_department(&self) -> Option<&Department> {
        self.departments.iter().find(|d| d.kind == DepartmentKind::MultiTicket)
    }
}

impl Default for Catalog {
    /// The stock floor layout used when no configuration file is present.
    fn default() -> Self {
        let departments = vec![
            Department::new("quality", "Quality", DepartmentKind::SingleSlot).with_part_number(),
            Department::new("maintenance", "Maintenance", DepartmentKind::MultiTicket),
            Department::new("mfg_eng", "Manufacturing Engineering", DepartmentKind::SingleSlot),
            Department::new("materials", "Materials", DepartmentKind::SingleSlot),
            Department::new("supervisor", "Supervisor", DepartmentKind::SingleSlot),
        ];
        let cells = (1..=8).map(|n| Cell::new(format!("cell-{n}"), format!("Cell {n}"))).collect();
        Self { departments, cells }
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
