// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON shapes of the call board's HTTP control surface and push channel.
//!
//! Field names are camelCase on the wire. Log entries embedded in history
//! responses keep their on-disk shape.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod board;
mod push;
mod request;
mod response;

pub use board::{
    BoardView, CellBoardView, DepartmentBoardView, RowView, SlotView, TicketView, WorkOrderView,
};
pub use push::{ClientFrame, Room, RoomError, ServerFrame};
pub use request::{
    CancelRequest, ClearRequest, CompleteRequest, HistoryQuery, OpenCallRequest,
    OpenTicketRequest, ProgressRequest, TimelineQuery,
};
pub use response::{
    CallOpened, ClearResponse, ErrorBody, Health, HistoryRecord, HistoryResponse, IntervalView,
    OkResponse, TicketOpened, TimelineResponse,
};
