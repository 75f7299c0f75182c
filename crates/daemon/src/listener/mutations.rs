// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handlers that change the board.

use std::sync::Arc;

use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::{Clock, HistoryFilter};
use andon_engine::{CancelTarget, CompletionInput, TicketInput};
use andon_wire::{
    CallOpened, CancelRequest, ClearRequest, ClearResponse, CompleteRequest, OkResponse,
    OpenCallRequest, OpenTicketRequest, ProgressRequest, TicketOpened,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::{ApiResult, ListenCtx};

pub(crate) async fn open_call<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    payload: Result<Json<OpenCallRequest>, JsonRejection>,
) -> ApiResult<CallOpened>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Json(req) = payload?;
    let call_id = ctx.desk.open_call(&req.dept, &req.cell_id)?;
    Ok(Json(CallOpened { call_id: call_id.to_string() }))
}

/// `ok` is false when nothing open matched.
pub(crate) async fn cancel<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Json(req) = payload?;
    let target = CancelTarget { call_id: req.call_id, ticket_id: req.ticket_id, reason: req.reason };
    let ok = ctx.desk.cancel(&req.dept, &req.cell_id, target)?;
    Ok(Json(OkResponse { ok }))
}

pub(crate) async fn complete<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Json(req) = payload?;
    let input = CompletionInput {
        responder: req.responder,
        result: req.result,
        note: req.note,
        part_number: req.part_number,
    };
    ctx.desk.complete(&req.dept, &req.cell_id, req.ticket_id.as_deref(), input)?;
    Ok(Json(OkResponse::OK))
}

pub(crate) async fn open_ticket<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    payload: Result<Json<OpenTicketRequest>, JsonRejection>,
) -> ApiResult<TicketOpened>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Json(req) = payload?;
    let input = TicketInput { priority: req.priority, issue: req.description, asset: req.asset_selection };
    let ticket_id = ctx.desk.open_ticket(&req.cell_id, input).await?;
    Ok(Json(TicketOpened { ticket_id: ticket_id.to_string() }))
}

pub(crate) async fn ticket_progress<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> ApiResult<OkResponse>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Json(req) = payload?;
    ctx.desk.set_ticket_progress(&req.cell_id, &req.ticket_id, &req.note)?;
    Ok(Json(OkResponse::OK))
}

pub(crate) async fn clear_history<M, N, C>(
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
    payload: Result<Json<ClearRequest>, JsonRejection>,
) -> ApiResult<ClearResponse>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let Json(req) = payload?;
    let summary = ctx.desk.clear_history(&HistoryFilter::from(req))?;
    Ok(Json(ClearResponse {
        log_entries_removed: summary.log_entries_removed,
        tickets_removed: summary.tickets_removed,
    }))
}

#[cfg(test)]
#[path = "mutations_tests.rs"]
mod tests;
