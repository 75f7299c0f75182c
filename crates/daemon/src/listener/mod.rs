// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP and WebSocket listener.
//!
//! Handlers translate wire DTOs into desk operations; the desk owns every
//! state transition. Errors become `{"error": "..."}` bodies.

mod mutations;
mod push;
mod query;
mod views;

use std::sync::Arc;
use std::time::Instant;

use andon_adapters::{CmmsAdapter, NotifyAdapter, TelemetryFeed};
use andon_core::Clock;
use andon_engine::{Desk, DeskError};
use andon_wire::ErrorBody;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared daemon context for all request handlers.
pub(crate) struct ListenCtx<M, N, C: Clock> {
    pub desk: Desk<M, N, C>,
    pub telemetry: Arc<dyn TelemetryFeed>,
    pub start_time: Instant,
    /// Cancelled at shutdown; closes push connections
    pub shutdown: CancellationToken,
}

pub(crate) fn router<M, N, C>(ctx: Arc<ListenCtx<M, N, C>>) -> Router
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    Router::new()
        .route("/health", get(query::health::<M, N, C>))
        .route("/api/call", post(mutations::open_call::<M, N, C>))
        .route("/api/cancel", post(mutations::cancel::<M, N, C>))
        .route("/api/complete", post(mutations::complete::<M, N, C>))
        .route("/api/ticket", post(mutations::open_ticket::<M, N, C>))
        .route("/api/ticket/progress", post(mutations::ticket_progress::<M, N, C>))
        .route("/api/admin/clear", post(mutations::clear_history::<M, N, C>))
        .route("/api/board/dept/{dept}", get(query::department_board::<M, N, C>))
        .route("/api/board/cell/{cell}", get(query::cell_board::<M, N, C>))
        .route("/api/timeline", get(query::timeline::<M, N, C>))
        .route("/api/history", get(query::history::<M, N, C>))
        .route("/ws", get(push::ws_handler::<M, N, C>))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Handler error with its HTTP status.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl From<DeskError> for ApiError {
    fn from(e: DeskError) -> Self {
        let status = match &e {
            DeskError::Validation(_) => StatusCode::BAD_REQUEST,
            DeskError::NotFound(_) => StatusCode::NOT_FOUND,
            DeskError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %e, "request failed");
        }
        Self { status, message: e.to_string() }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        warn!(error = %e, "blocking task failed");
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: e.to_string() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[cfg(test)]
mod test_fixtures;
