// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! andon-core: domain types for the factory call board

pub mod macros;

pub mod catalog;
pub mod clock;
pub mod entry;
pub mod id;
pub mod slot;
pub mod telemetry;
pub mod ticket;
pub mod time_fmt;
pub mod work_order;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{Catalog, CatalogError, Cell, Department, DepartmentKind};
pub use clock::{Clock, FakeClock, SystemClock};
pub use entry::{Completion, EntryKind, HistoryFilter, LogEntry, Subject, TicketDetails};
pub use id::{CallId, TicketId};
pub use slot::{CallSlot, CallStatus};
pub use telemetry::TelemetrySeries;
pub use ticket::{clamp_progress_note, Priority, Ticket, TicketStatus, PROGRESS_NOTE_MAX};
pub use time_fmt::format_elapsed_ms;
pub use work_order::WorkOrderLink;
