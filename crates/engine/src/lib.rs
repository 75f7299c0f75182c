// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Call and ticket lifecycle engines for the call board.
//!
//! [`Desk`] is the single writer: every transition applies a log entry to
//! the in-memory board and appends it to the durable log under one lock.
//! External work (CMMS, notifications) runs as tracked tasks afterwards.

mod calls;
mod desk;
mod error;
mod tickets;
pub mod timeline;
mod views;

#[cfg(test)]
mod test_helpers;

pub use calls::CompletionInput;
pub use desk::{BoardUpdate, CancelTarget, ClearSummary, Desk, DeskDeps};
pub use error::DeskError;
pub use tickets::TicketInput;
pub use timeline::{Interval, IntervalStatus, Window};
pub use views::{BoardRow, CellBoard, DepartmentBoard};
