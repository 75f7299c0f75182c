// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::super::test_fixtures::{test_app, TestApp};

async fn open_quality_call(app: &TestApp) -> String {
    let (status, body) = app.post("/api/call", json!({"dept": "quality", "cellId": "cell-1"})).await;
    assert_eq!(status, StatusCode::OK);
    body["callId"].as_str().unwrap().to_string()
}

async fn quality_row(app: &TestApp, cell_index: usize) -> Value {
    let (_, board) = app.get("/api/board/dept/quality").await;
    board["rows"][cell_index].clone()
}

#[tokio::test]
async fn open_call_marks_slot_waiting() {
    let app = test_app();

    let call_id = open_quality_call(&app).await;

    let row = quality_row(&app, 0).await;
    assert_eq!(row["slot"]["status"], "WAITING");
    assert_eq!(row["slot"]["callId"], call_id.as_str());
}

#[tokio::test]
async fn repeated_open_returns_same_call() {
    let app = test_app();
    let first = open_quality_call(&app).await;
    let second = open_quality_call(&app).await;
    assert_eq!(first, second);
}

#[yare::parameterized(
    unknown_dept = { r#"{"dept":"paint","cellId":"cell-1"}"#, StatusCode::NOT_FOUND },
    unknown_cell = { r#"{"dept":"quality","cellId":"cell-99"}"#, StatusCode::NOT_FOUND },
    ticket_dept  = { r#"{"dept":"maintenance","cellId":"cell-1"}"#, StatusCode::BAD_REQUEST },
    missing_cell = { r#"{"dept":"quality"}"#, StatusCode::BAD_REQUEST },
    not_json     = { "dept=quality", StatusCode::BAD_REQUEST },
)]
#[test_macro(tokio::test)]
async fn open_call_rejections(body: &str, expected: StatusCode) {
    let app = test_app();
    let (status, json) = app.post_raw("/api/call", body).await;
    assert_eq!(status, expected);
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()), "no error message: {json}");
}

#[tokio::test]
async fn cancel_reports_whether_anything_matched() {
    let app = test_app();
    let cancel = json!({"dept": "quality", "cellId": "cell-1"});

    let (status, body) = app.post("/api/cancel", cancel.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);

    open_quality_call(&app).await;
    let (_, body) = app.post("/api/cancel", cancel).await;
    assert_eq!(body["ok"], true);
    assert_eq!(quality_row(&app, 0).await["slot"]["status"], "READY");
}

#[tokio::test]
async fn cancel_with_stale_call_id_is_ignored() {
    let app = test_app();
    open_quality_call(&app).await;

    let (_, body) = app
        .post("/api/cancel", json!({"dept": "quality", "cellId": "cell-1", "callId": "call-stale"}))
        .await;

    assert_eq!(body["ok"], false);
    assert_eq!(quality_row(&app, 0).await["slot"]["status"], "WAITING");
}

#[tokio::test]
async fn quality_completion_requires_part_number() {
    let app = test_app();
    open_quality_call(&app).await;
    let mut complete = json!({
        "dept": "quality", "cellId": "cell-1",
        "responder": "Alice", "result": "Approved",
    });

    let (status, _) = app.post("/api/complete", complete.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    complete["partNumber"] = json!("PN-778");
    let (status, body) = app.post("/api/complete", complete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(quality_row(&app, 0).await["slot"]["status"], "READY");
}

#[tokio::test]
async fn complete_without_open_call_is_rejected() {
    let app = test_app();
    let (status, _) = app
        .post("/api/complete", json!({"dept": "materials", "cellId": "cell-2", "responder": "Bo", "result": "Done"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn open_ticket_links_work_order() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/api/ticket",
            json!({"cellId": "cell-3", "assetSelection": "PRESS-4", "priority": "High", "description": "Hydraulic leak"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let ticket_id = body["ticketId"].as_str().unwrap();
    let (_, board) = app.get("/api/board/dept/maintenance").await;
    let ticket = &board["rows"][2]["tickets"][0];
    assert_eq!(ticket["ticketId"], ticket_id);
    assert_eq!(ticket["priority"], "High");
    assert_eq!(ticket["workOrder"]["displayNumber"], "WO-1001");
    assert_eq!(app.fakes.cmms.calls().len(), 1);
}

#[tokio::test]
async fn blank_ticket_description_is_rejected() {
    let app = test_app();
    let (status, body) = app.post("/api/ticket", json!({"cellId": "cell-3", "description": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(app.fakes.cmms.calls().is_empty());
}

#[tokio::test]
async fn ticket_progress_shows_on_board() {
    let app = test_app();
    let (_, body) = app.post("/api/ticket", json!({"cellId": "cell-1", "description": "Jammed feeder"})).await;
    let ticket_id = body["ticketId"].as_str().unwrap();

    let (status, _) = app
        .post("/api/ticket/progress", json!({"cellId": "cell-1", "ticketId": ticket_id, "note": "waiting on parts"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    let (_, board) = app.get("/api/board/cell/cell-1").await;
    let maintenance = board["rows"].as_array().unwrap().iter().find(|r| r["dept"] == "maintenance").unwrap();
    assert_eq!(maintenance["tickets"][0]["progressNote"], "waiting on parts");
}

#[tokio::test]
async fn progress_on_unknown_ticket_is_not_found() {
    let app = test_app();
    let (status, _) = app
        .post("/api/ticket/progress", json!({"cellId": "cell-1", "ticketId": "tkt-missing", "note": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complete_ticket_closes_work_order() {
    let app = test_app();
    app.post("/api/ticket", json!({"cellId": "cell-5", "description": "Conveyor stopped"})).await;

    let (status, _) = app
        .post(
            "/api/complete",
            json!({"dept": "maintenance", "cellId": "cell-5", "responder": "Dana", "result": "Replaced belt"}),
        )
        .await;
    app.settle().await;

    assert_eq!(status, StatusCode::OK);
    let (_, board) = app.get("/api/board/dept/maintenance").await;
    assert!(board["rows"][4]["tickets"].as_array().unwrap().is_empty());
    assert_eq!(app.fakes.cmms.calls().len(), 2);
}

#[tokio::test]
async fn admin_clear_removes_closed_history() {
    let app = test_app();
    open_quality_call(&app).await;
    app.post("/api/cancel", json!({"dept": "quality", "cellId": "cell-1"})).await;
    open_quality_call(&app).await;

    let (status, body) = app.post("/api/admin/clear", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logEntriesRemoved"], 2);
    assert_eq!(body["ticketsRemoved"], 0);
    let (_, history) = app.get("/api/history").await;
    assert_eq!(history["entries"].as_array().unwrap().len(), 1);
}
