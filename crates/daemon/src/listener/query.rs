// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only handlers.

use std::sync::Arc;

use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::Clock;
use andon_engine::Window;
use andon_wire::{
    CellBoardView, DepartmentBoardView, Health, HistoryQuery, HistoryRecord, HistoryResponse,
    TimelineQuery, TimelineResponse,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;

use super::{views, ApiError, ApiResult, ListenCtx};
use crate::env::VERSION;

pub(crate) async fn health<M, N, C>(State(ctx): State<Arc<ListenCtx<M, N, C>>>) -> Json<Health>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    Json(Health {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        uptime_secs: ctx.start_time.elapsed().as_secs(),
        log_seq: ctx.desk.log_seq(),
    })
}

pub(crate) async fn department_board<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    Path(dept): Path<String>,
) -> ApiResult<DepartmentBoardView>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let board = ctx.desk.board_for_department(&dept)?;
    Ok(Json(views::department(&board)))
}

pub(crate) async fn cell_board<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    Path(cell): Path<String>,
) -> ApiResult<CellBoardView>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let board = ctx.desk.board_for_cell(&cell)?;
    Ok(Json(views::cell(&board)))
}

pub(crate) async fn timeline<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    query: Result<Query<TimelineQuery>, QueryRejection>,
) -> ApiResult<TimelineResponse>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Query(query) = query?;
    if query.end_ms <= query.start_ms {
        return Err(ApiError::bad_request("endMs must be after startMs"));
    }
    let window = Window::new(query.start_ms, query.end_ms);
    // Reads the whole log; keep it off the async workers
    let desk = ctx.desk.clone();
    let depts = query.dept_list();
    let intervals = tokio::task::spawn_blocking(move || desk.timeline(window, &depts)).await??;
    let telemetry = ctx.telemetry.series(query.start_ms, query.end_ms).await;
    Ok(Json(TimelineResponse {
        start_ms: query.start_ms,
        end_ms: query.end_ms,
        now_ms: ctx.desk.now_ms(),
        intervals: intervals.iter().map(views::interval).collect(),
        telemetry,
    }))
}

pub(crate) async fn history<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<HistoryResponse>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Query(query) = query?;
    let entries = ctx.desk.recent_history(query.limit())?;
    Ok(Json(HistoryResponse {
        entries: entries.into_iter().map(|e| HistoryRecord { seq: e.seq, entry: e.entry }).collect(),
    }))
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
