// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use andon_core::test_support::{
    call_cancel, call_complete, call_request, ticket_complete, ticket_request,
};
use proptest::prelude::*;

const T0: u64 = 1_767_225_600_000;
const HOUR: u64 = 3_600_000;

fn all() -> Vec<String> {
    Vec::new()
}

fn depts(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|d| d.to_string()).collect()
}

#[test]
fn completed_call_becomes_one_interval() {
    let log = [
        call_request("quality", "cell-1", "call-1", T0),
        call_complete("quality", "cell-1", "call-1", T0 + 600_000, Some(600_000)),
    ];
    let window = Window::new(T0 - 1_000, T0 + 700_000);

    let intervals = reconstruct(&log, window, &all(), T0 + 800_000);

    assert_eq!(
        intervals,
        vec![Interval {
            dept: "quality".into(),
            cell_id: "cell-1".into(),
            start_ms: T0,
            end_ms: T0 + 600_000,
            status: IntervalStatus::Completed,
            label: "quality".into(),
            detail: "Fixed by Alice after 10m".into(),
        }]
    );
    assert_eq!(intervals[0].duration_ms(), 600_000);
}

#[test]
fn cancelled_call_produces_nothing() {
    let log = [
        call_request("quality", "cell-1", "call-1", T0),
        call_cancel("quality", "cell-1", "call-1", T0 + 1_000),
    ];
    assert!(reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR).is_empty());
}

#[test]
fn earliest_terminal_decides_outcome() {
    let log = [
        call_request("quality", "cell-1", "call-1", T0),
        call_cancel("quality", "cell-1", "call-1", T0 + 1_000),
        call_complete("quality", "cell-1", "call-1", T0 + 2_000, Some(2_000)),
    ];
    assert!(reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR).is_empty());

    let log = [
        call_request("quality", "cell-1", "call-1", T0),
        call_complete("quality", "cell-1", "call-1", T0 + 2_000, Some(2_000)),
        call_cancel("quality", "cell-1", "call-1", T0 + 3_000),
    ];
    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR);
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].end_ms, T0 + 2_000);
}

#[test]
fn duplicate_requests_use_earliest() {
    let log = [
        call_request("quality", "cell-1", "call-1", T0 + 5_000),
        call_request("quality", "cell-1", "call-1", T0),
        call_complete("quality", "cell-1", "call-1", T0 + 9_000, None),
    ];
    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR);
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].start_ms, T0);
}

#[test]
fn open_interval_runs_to_now() {
    let log = [ticket_request("cell-2", "tkt-1", T0)];
    let now = T0 + 30 * 60_000;

    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), now);

    assert_eq!(intervals.len(), 1);
    let open = &intervals[0];
    assert_eq!(open.status, IntervalStatus::Open);
    assert_eq!(open.end_ms, now);
    assert_eq!(open.label, "Spindle alarm");
    assert_eq!(open.detail, "open for 30m");
}

#[test]
fn open_interval_is_clamped_to_window_end() {
    let log = [ticket_request("cell-2", "tkt-1", T0)];
    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + 5 * HOUR);
    assert_eq!(intervals[0].end_ms, T0 + HOUR);
}

#[test]
fn completion_without_timestamp_uses_elapsed() {
    let log = [
        ticket_request("cell-1", "tkt-1", T0),
        ticket_complete("cell-1", "tkt-1", 0, Some(120_000)),
    ];
    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR);
    assert_eq!(intervals[0].end_ms, T0 + 120_000);
    assert_eq!(intervals[0].status, IntervalStatus::Completed);
    assert_eq!(intervals[0].detail, "Replaced sensor by Bob after 2m");
}

#[test]
fn unplaceable_terminal_drops_the_group() {
    let log = [
        ticket_request("cell-1", "tkt-1", T0),
        ticket_complete("cell-1", "tkt-1", 0, None),
    ];
    assert!(reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR).is_empty());
}

#[test]
fn terminal_without_request_is_ignored() {
    let log = [call_complete("quality", "cell-1", "call-9", T0 + 1_000, Some(1_000))];
    assert!(reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR).is_empty());
}

#[test]
fn interval_started_before_window_is_clipped() {
    let log = [
        call_request("materials", "cell-3", "call-1", T0 - 2 * HOUR),
        call_complete("materials", "cell-3", "call-1", T0 + HOUR, Some(3 * HOUR)),
    ];
    let intervals = reconstruct(&log, Window::new(T0, T0 + 2 * HOUR), &all(), T0 + 3 * HOUR);

    assert_eq!(intervals[0].start_ms, T0);
    assert_eq!(intervals[0].end_ms, T0 + HOUR);
    assert_eq!(intervals[0].detail, "Fixed by Alice after 3h 00m");
}

#[test]
fn request_beyond_lookaround_is_not_seen() {
    let log = [
        call_request("materials", "cell-3", "call-1", T0 - LOOKAROUND_MS - 1),
        call_complete("materials", "cell-3", "call-1", T0 + HOUR, None),
    ];
    assert!(reconstruct(&log, Window::new(T0, T0 + 2 * HOUR), &all(), T0 + 3 * HOUR).is_empty());
}

#[test]
fn intervals_entirely_outside_window_are_dropped() {
    let log = [
        call_request("quality", "cell-1", "call-1", T0 - 2 * HOUR),
        call_complete("quality", "cell-1", "call-1", T0 - HOUR, None),
        call_request("quality", "cell-1", "call-2", T0 + 3 * HOUR),
    ];
    assert!(reconstruct(&log, Window::new(T0, T0 + 2 * HOUR), &all(), T0 + 4 * HOUR).is_empty());
}

#[test]
fn sorted_by_start_then_longest_first() {
    let log = [
        call_request("quality", "cell-1", "call-short", T0 + 1_000),
        call_complete("quality", "cell-1", "call-short", T0 + 2_000, None),
        call_request("materials", "cell-1", "call-long", T0 + 1_000),
        call_complete("materials", "cell-1", "call-long", T0 + 9_000, None),
        call_request("supervisor", "cell-1", "call-first", T0),
        call_complete("supervisor", "cell-1", "call-first", T0 + 500, None),
    ];
    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &all(), T0 + HOUR);
    let order: Vec<&str> = intervals.iter().map(|i| i.dept.as_str()).collect();
    assert_eq!(order, vec!["supervisor", "materials", "quality"]);
}

#[yare::parameterized(
    everything   = { &[], 3 },
    one          = { &["quality"], 1 },
    two          = { &["quality", "maintenance"], 2 },
    unknown_only = { &["hr"], 0 },
)]
fn department_filter(filter: &[&str], expected: usize) {
    let log = [
        call_request("quality", "cell-1", "call-1", T0),
        call_request("materials", "cell-1", "call-2", T0),
        ticket_request("cell-1", "tkt-1", T0),
    ];
    let intervals = reconstruct(&log, Window::new(T0, T0 + HOUR), &depts(filter), T0 + HOUR);
    assert_eq!(intervals.len(), expected);
}

fn arb_entry() -> impl Strategy<Value = LogEntry> {
    let id = (0u8..6).prop_map(|n| format!("call-{n}"));
    let ts = prop_oneof![Just(0u64), (T0 - 2 * HOUR)..(T0 + 4 * HOUR)];
    let elapsed = proptest::option::of(0u64..3 * HOUR);
    (0u8..3, id, ts, elapsed).prop_map(|(kind, id, ts, elapsed)| match kind {
        0 => call_request("quality", "cell-1", &id, ts),
        1 => call_cancel("quality", "cell-1", &id, ts),
        _ => call_complete("quality", "cell-1", &id, ts, elapsed),
    })
}

proptest! {
    #[test]
    fn intervals_stay_inside_window_and_sorted(
        log in proptest::collection::vec(arb_entry(), 0..40),
        now_offset in 0u64..(6 * HOUR),
    ) {
        let window = Window::new(T0, T0 + 2 * HOUR);
        let intervals = reconstruct(&log, window, &[], T0 - 2 * HOUR + now_offset);

        for interval in &intervals {
            prop_assert!(interval.start_ms < interval.end_ms);
            prop_assert!(interval.start_ms >= window.start_ms);
            prop_assert!(interval.end_ms <= window.end_ms);
        }
        for pair in intervals.windows(2) {
            prop_assert!(pair[0].start_ms <= pair[1].start_ms);
            if pair[0].start_ms == pair[1].start_ms {
                prop_assert!(pair[0].duration_ms() >= pair[1].duration_ms());
            }
        }
        // At most one interval per call id
        let ids: std::collections::BTreeSet<_> =
            log.iter().map(|e| e.subject().clone()).collect();
        prop_assert!(intervals.len() <= ids.len());
    }

    #[test]
    fn reconstruction_ignores_entry_order(
        mut log in proptest::collection::vec(arb_entry(), 0..30),
    ) {
        let window = Window::new(T0, T0 + 2 * HOUR);
        let forward = reconstruct(&log, window, &[], T0 + 3 * HOUR);
        log.reverse();
        let backward = reconstruct(&log, window, &[], T0 + 3 * HOUR);
        prop_assert_eq!(forward.len(), backward.len());
        let spans = |v: &[Interval]| {
            let mut s: Vec<_> = v.iter().map(|i| (i.start_ms, i.end_ms, i.status)).collect();
            s.sort_by_key(|(a, b, _)| (*a, *b));
            s
        };
        prop_assert_eq!(spans(&forward), spans(&backward));
    }
}
