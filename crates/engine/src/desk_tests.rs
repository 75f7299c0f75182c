// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{completion, setup, ticket};
use andon_core::{CallStatus, EntryKind, TicketStatus};

#[tokio::test]
async fn cancel_dispatches_on_department_kind() {
    let ctx = setup();
    let call = ctx.desk.open_call("materials", "cell-1").unwrap();
    let tkt = ctx.desk.open_ticket("cell-1", ticket("Leak")).await.unwrap();

    let guarded = CancelTarget { call_id: Some("call-other".into()), ..Default::default() };
    assert!(!ctx.desk.cancel("materials", "cell-1", guarded).unwrap());
    let target = CancelTarget { call_id: Some(call.to_string()), ..Default::default() };
    assert!(ctx.desk.cancel("materials", "cell-1", target).unwrap());

    let target = CancelTarget { ticket_id: Some(tkt.to_string()), reason: Some("dup".into()), ..Default::default() };
    assert!(ctx.desk.cancel("maintenance", "cell-1", target).unwrap());
    assert!(!ctx.desk.cancel("maintenance", "cell-1", CancelTarget::default()).unwrap());
}

#[tokio::test]
async fn complete_dispatches_on_department_kind() {
    let ctx = setup();
    ctx.desk.open_call("supervisor", "cell-2").unwrap();
    ctx.desk.open_ticket("cell-2", ticket("Leak")).await.unwrap();

    ctx.desk.complete("supervisor", "cell-2", None, completion("Dee", "Signed off")).unwrap();
    ctx.desk.complete("maintenance", "cell-2", None, completion("Bob", "Fixed")).unwrap();

    let err = ctx.desk.complete("maintenance", "cell-2", None, completion("Bob", "Fixed"));
    assert!(matches!(err, Err(DeskError::NotFound(_))));
}

#[test]
fn unknown_department_is_not_found() {
    let ctx = setup();
    assert!(matches!(
        ctx.desk.cancel("payroll", "cell-1", CancelTarget::default()),
        Err(DeskError::NotFound(_))
    ));
    assert!(matches!(ctx.desk.board_for_department("payroll"), Err(DeskError::NotFound(_))));
    assert!(matches!(ctx.desk.board_for_cell("cell-0"), Err(DeskError::NotFound(_))));
}

#[tokio::test]
async fn department_board_lists_every_cell() {
    let ctx = setup();
    ctx.desk.open_call("quality", "cell-3").unwrap();

    let view = ctx.desk.board_for_department("quality").unwrap();

    assert_eq!(view.rows.len(), 8);
    assert_eq!(view.now_ms, ctx.clock.epoch_ms());
    let waiting: Vec<&str> = view
        .rows
        .iter()
        .filter(|r| r.slot.as_ref().is_some_and(|s| s.status == CallStatus::Waiting))
        .map(|r| r.cell.id.as_str())
        .collect();
    assert_eq!(waiting, vec!["cell-3"]);
}

#[tokio::test]
async fn maintenance_board_shows_open_tickets_oldest_first() {
    let ctx = setup();
    let first = ctx.desk.open_ticket("cell-1", ticket("First")).await.unwrap();
    ctx.advance_ms(10);
    let second = ctx.desk.open_ticket("cell-1", ticket("Second")).await.unwrap();
    ctx.advance_ms(10);
    let third = ctx.desk.open_ticket("cell-1", ticket("Third")).await.unwrap();
    ctx.desk.cancel_ticket("cell-1", Some(second.as_str()), None).unwrap();

    let view = ctx.desk.board_for_department("maintenance").unwrap();
    let row = &view.rows[0];
    assert!(row.slot.is_none());
    let ids: Vec<_> = row.open_tickets.iter().map(|t| t.ticket_id.clone()).collect();
    assert_eq!(ids, vec![first, third]);
}

#[tokio::test]
async fn cell_board_lists_every_department() {
    let ctx = setup();
    ctx.desk.open_call("mfg_eng", "cell-5").unwrap();
    ctx.desk.open_ticket("cell-5", ticket("Leak")).await.unwrap();

    let view = ctx.desk.board_for_cell("cell-5").unwrap();

    let depts: Vec<&str> = view.rows.iter().map(|r| r.department.id.as_str()).collect();
    assert_eq!(depts, vec!["quality", "maintenance", "mfg_eng", "materials", "supervisor"]);
    assert_eq!(view.rows[1].open_tickets.len(), 1);
    assert!(view.rows[2].slot.as_ref().unwrap().is_waiting());
    assert!(!view.rows[0].slot.as_ref().unwrap().is_waiting());
}

#[tokio::test]
async fn recent_history_returns_newest_in_order() {
    let ctx = setup();
    for cell in ["cell-1", "cell-2", "cell-3"] {
        ctx.desk.open_call("quality", cell).unwrap();
    }

    let recent = ctx.desk.recent_history(2).unwrap();

    let cells: Vec<&str> = recent.iter().map(|e| e.entry.cell_id()).collect();
    assert_eq!(cells, vec!["cell-2", "cell-3"]);
    assert_eq!(recent[1].seq, 3);
}

#[tokio::test]
async fn timeline_reads_the_log() {
    let ctx = setup();
    let start = ctx.clock.epoch_ms();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.advance_ms(600_000);
    let input = CompletionInput { part_number: Some("PN-9".into()), ..completion("Alice", "Fixed") };
    ctx.desk.complete_call("quality", "cell-1", input).unwrap();

    let intervals = ctx.desk.timeline(Window::new(start - 1_000, start + 700_000), &[]).unwrap();

    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].start_ms, start);
    assert_eq!(intervals[0].end_ms, start + 600_000);
}

#[tokio::test]
async fn clear_history_keeps_open_items() {
    let ctx = setup();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.desk.open_call("materials", "cell-1").unwrap();
    ctx.desk.cancel_call("materials", "cell-1", None, None).unwrap();
    let open = ctx.desk.open_ticket("cell-1", ticket("Still broken")).await.unwrap();
    let closed = ctx.desk.open_ticket("cell-1", ticket("Fixed already")).await.unwrap();
    ctx.desk.complete_ticket("cell-1", Some(closed.as_str()), completion("Bob", "Fixed")).unwrap();

    let summary = ctx.desk.clear_history(&HistoryFilter::default()).unwrap();

    assert_eq!(summary, ClearSummary { log_entries_removed: 4, tickets_removed: 1 });
    let remaining: Vec<String> = ctx.log().iter().map(|e| e.subject().id().to_string()).collect();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.contains(&open.to_string()));
    assert!(ctx.desk.read(|b| b.slot("quality", "cell-1").unwrap().is_waiting()));
    assert!(ctx.desk.read(|b| b.ticket("cell-1", closed.as_str()).is_none()));
}

#[tokio::test]
async fn clear_history_respects_filter() {
    let ctx = setup();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.desk.cancel_call("quality", "cell-1", None, None).unwrap();
    ctx.desk.open_call("materials", "cell-2").unwrap();
    ctx.desk.cancel_call("materials", "cell-2", None, None).unwrap();

    let filter = HistoryFilter { dept: Some("quality".into()), ..Default::default() };
    let summary = ctx.desk.clear_history(&filter).unwrap();

    assert_eq!(summary.log_entries_removed, 2);
    assert!(ctx.log().iter().all(|e| e.dept() == "materials"));
}

#[tokio::test]
async fn clear_history_age_bound_uses_close_time() {
    let ctx = setup();
    let start = ctx.clock.epoch_ms();
    let hour = 3_600_000;
    let early = ctx.desk.open_ticket("cell-1", ticket("Leak")).await.unwrap();
    ctx.desk.complete_ticket("cell-1", Some(early.as_str()), completion("Bob", "Fixed")).unwrap();
    let late = ctx.desk.open_ticket("cell-1", ticket("Jam")).await.unwrap();
    ctx.advance_ms(2 * hour);
    ctx.desk.complete_ticket("cell-1", Some(late.as_str()), completion("Bob", "Cleared")).unwrap();

    let filter = HistoryFilter { before_ms: Some(start + hour), ..Default::default() };
    let summary = ctx.desk.clear_history(&filter).unwrap();

    assert_eq!(summary, ClearSummary { log_entries_removed: 2, tickets_removed: 1 });
    let log = ctx.log();
    assert_eq!(log.iter().map(LogEntry::kind).collect::<Vec<_>>(), vec![EntryKind::Request, EntryKind::Complete]);
    assert!(log.iter().all(|e| e.subject().id() == late.as_str()));
    assert!(ctx.desk.read(|b| b.ticket("cell-1", late.as_str()).is_some()));
    assert!(ctx.desk.read(|b| b.ticket("cell-1", early.as_str()).is_none()));

    let intervals = ctx.desk.timeline(Window::new(start, start + 3 * hour), &[]).unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].start_ms, start);
    assert_eq!(intervals[0].end_ms, start + 2 * hour);
}

#[tokio::test]
async fn checkpoint_view_matches_log_position() {
    let ctx = setup();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.desk.open_ticket("cell-2", ticket("Leak")).await.unwrap();

    let (seq, board) = ctx.desk.checkpoint_view();

    assert_eq!(seq, 2);
    assert_eq!(board, ctx.desk.read(|b| b.clone()));
}

#[tokio::test]
async fn replaying_the_log_rebuilds_the_board() {
    let ctx = setup();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.desk.open_call("materials", "cell-4").unwrap();
    ctx.desk.cancel_call("materials", "cell-4", None, None).unwrap();
    let a = ctx.desk.open_ticket("cell-1", ticket("Leak")).await.unwrap();
    ctx.desk.open_ticket("cell-1", ticket("Noise")).await.unwrap();
    ctx.desk.complete_ticket("cell-1", Some(a.as_str()), completion("Bob", "Fixed")).unwrap();

    let wal = Wal::open(&ctx.dir.path().join("events.wal")).unwrap();
    let mut replayed = BoardState::default();
    replayed.ensure_slots(ctx.desk.catalog());
    for record in wal.entries_after(0).unwrap() {
        replayed.apply_entry(&record.entry);
    }

    assert_eq!(replayed, ctx.desk.read(|b| b.clone()));
    let statuses: Vec<TicketStatus> = replayed.tickets("cell-1").iter().map(|t| t.status).collect();
    assert_eq!(statuses, vec![TicketStatus::Completed, TicketStatus::Open]);
}

#[tokio::test]
async fn subscribers_see_each_transition() {
    let ctx = setup();
    let mut updates = ctx.desk.subscribe();

    ctx.desk.open_ticket("cell-6", ticket("Leak")).await.unwrap();
    ctx.desk.open_call("quality", "cell-7").unwrap();

    assert_eq!(
        updates.recv().await.unwrap(),
        BoardUpdate { dept: "maintenance".into(), cell_id: "cell-6".into() }
    );
    assert_eq!(
        updates.recv().await.unwrap(),
        BoardUpdate { dept: "quality".into(), cell_id: "cell-7".into() }
    );
}

#[tokio::test]
async fn drain_waits_for_notifications() {
    let ctx = setup();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.desk.cancel_call("quality", "cell-1", None, None).unwrap();

    assert!(ctx.desk.drain(Duration::from_secs(1)).await);
    assert_eq!(ctx.notifier.calls().len(), 2);
}

#[tokio::test]
async fn log_seq_tracks_appends() {
    let ctx = setup();
    assert_eq!(ctx.desk.log_seq(), 0);
    ctx.desk.open_call("quality", "cell-1").unwrap();
    ctx.desk.open_call("quality", "cell-1").unwrap();
    assert_eq!(ctx.desk.log_seq(), 1);
}
