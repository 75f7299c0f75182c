// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::board::CellBoardView;

#[yare::parameterized(
    dept = { "dept:quality", Room::Dept("quality".into()) },
    cell = { "cell:cell-3", Room::Cell("cell-3".into()) },
)]
fn room_parses_and_displays(text: &str, room: Room) {
    assert_eq!(text.parse::<Room>().unwrap(), room);
    assert_eq!(room.to_string(), text);
}

#[yare::parameterized(
    no_prefix    = { "quality" },
    empty_id     = { "dept:" },
    unknown_kind = { "line:1" },
)]
fn invalid_rooms_are_rejected(text: &str) {
    assert!(text.parse::<Room>().is_err());
}

#[test]
fn room_coverage() {
    let dept = Room::Dept("quality".into());
    assert!(dept.covers("quality", "cell-1"));
    assert!(!dept.covers("materials", "cell-1"));
    let cell = Room::Cell("cell-1".into());
    assert!(cell.covers("materials", "cell-1"));
    assert!(!cell.covers("materials", "cell-2"));
}

#[test]
fn subscribe_frame_parses() {
    let frame: ClientFrame = serde_json::from_str(r#"{"type":"subscribe","room":"cell:cell-2"}"#).unwrap();
    assert_eq!(frame, ClientFrame::Subscribe { room: Room::Cell("cell-2".into()) });
}

#[test]
fn bad_room_in_frame_is_an_error() {
    assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"subscribe","room":"nowhere"}"#).is_err());
}

#[test]
fn board_frame_serializes_room_as_string() {
    let frame = ServerFrame::Board {
        room: Room::Cell("cell-1".into()),
        board: BoardView::Cell(CellBoardView {
            cell_id: "cell-1".into(),
            name: "Cell 1".into(),
            now_ms: 1,
            rows: Vec::new(),
        }),
    };
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "board");
    assert_eq!(json["room"], "cell:cell-1");
    assert_eq!(json["board"]["cellId"], "cell-1");
}
