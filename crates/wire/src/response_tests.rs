// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use andon_core::test_support::call_request;

#[test]
fn ids_serialize_camel_case() {
    let json = serde_json::to_string(&CallOpened { call_id: "call-1".into() }).unwrap();
    assert_eq!(json, r#"{"callId":"call-1"}"#);
    let json = serde_json::to_string(&TicketOpened { ticket_id: "tkt-1".into() }).unwrap();
    assert_eq!(json, r#"{"ticketId":"tkt-1"}"#);
}

#[test]
fn ok_and_error_bodies() {
    assert_eq!(serde_json::to_string(&OkResponse::OK).unwrap(), r#"{"ok":true}"#);
    assert_eq!(serde_json::to_string(&ErrorBody::new("nope")).unwrap(), r#"{"error":"nope"}"#);
}

#[test]
fn history_keeps_log_entry_shape() {
    let response = HistoryResponse {
        entries: vec![HistoryRecord { seq: 7, entry: call_request("quality", "cell-1", "call-1", 10) }],
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["entries"][0]["seq"], 7);
    assert_eq!(json["entries"][0]["entry"]["type"], "request");
    assert_eq!(json["entries"][0]["entry"]["cell_id"], "cell-1");
}

#[test]
fn timeline_includes_telemetry_shape() {
    let response = TimelineResponse {
        start_ms: 0,
        end_ms: 10,
        now_ms: 5,
        intervals: Vec::new(),
        telemetry: TelemetrySeries::default(),
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["telemetry"], serde_json::json!({ "buckets": [], "sizes": [], "series": {} }));
    assert_eq!(json["nowMs"], 5);
}
