// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket push channel.
//!
//! Each connection holds a set of rooms. After every board change the
//! connection re-renders the rooms that cover the changed cell.

use std::collections::BTreeSet;
use std::sync::Arc;

use andon_adapters::{CmmsAdapter, NotifyAdapter};
use andon_core::Clock;
use andon_engine::{BoardUpdate, Desk, DeskError};
use andon_wire::{BoardView, ClientFrame, Room, ServerFrame};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::{views, ListenCtx};

pub(crate) async fn ws_handler<M, N, C>(
    ws: WebSocketUpgrade,
    State(ctx): State<Arc<ListenCtx<M, N, C>>>,
) -> Response
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    ws.on_upgrade(move |socket| serve_socket(socket, ctx))
}

async fn serve_socket<M, N, C>(socket: WebSocket, ctx: Arc<ListenCtx<M, N, C>>)
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let (mut sink, mut stream) = socket.split();
    let mut updates = ctx.desk.subscribe();
    let mut rooms = BTreeSet::new();
    debug!("push client connected");

    loop {
        let frames = tokio::select! {
            _ = ctx.shutdown.cancelled() => break,
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => apply_client_text(&ctx.desk, &mut rooms, text.as_str()),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!(error = %e, "push socket error");
                    break;
                }
            },
            update = updates.recv() => match update {
                Ok(update) => frames_for_update(&ctx.desk, &rooms, &update),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "push client lagged, resending all rooms");
                    rooms.iter().map(|room| board_frame(&ctx.desk, room)).collect()
                }
                Err(RecvError::Closed) => break,
            },
        };
        if !send_all(&mut sink, frames).await {
            break;
        }
    }

    let _ = sink.close().await;
    debug!(rooms = rooms.len(), "push client disconnected");
}

async fn send_all(sink: &mut SplitSink<WebSocket, Message>, frames: Vec<ServerFrame>) -> bool {
    for frame in frames {
        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to encode push frame");
                continue;
            }
        };
        if sink.send(Message::Text(text.into())).await.is_err() {
            return false;
        }
    }
    true
}

/// Handle one client text frame, updating `rooms` and returning the replies.
pub(crate) fn apply_client_text<M, N, C>(
    desk: &Desk<M, N, C>,
    rooms: &mut BTreeSet<Room>,
    text: &str,
) -> Vec<ServerFrame>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => return vec![ServerFrame::Error { message: format!("invalid frame: {e}") }],
    };
    match frame {
        ClientFrame::Subscribe { room } => {
            let reply = board_frame(desk, &room);
            if matches!(reply, ServerFrame::Board { .. }) {
                rooms.insert(room);
            }
            vec![reply]
        }
        ClientFrame::Unsubscribe { room } => {
            rooms.remove(&room);
            vec![ServerFrame::Unsubscribed { room }]
        }
    }
}

/// Fresh boards for every subscribed room that the update touches.
pub(crate) fn frames_for_update<M, N, C>(
    desk: &Desk<M, N, C>,
    rooms: &BTreeSet<Room>,
    update: &BoardUpdate,
) -> Vec<ServerFrame>
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    rooms
        .iter()
        .filter(|room| room.covers(&update.dept, &update.cell_id))
        .map(|room| board_frame(desk, room))
        .collect()
}

/// The current projection for `room`, or an error frame if it names
/// nothing in the catalog.
pub(crate) fn board_frame<M, N, C>(desk: &Desk<M, N, C>, room: &Room) -> ServerFrame
where
    M: CmmsAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let board: Result<BoardView, DeskError> = match room {
        Room::Dept(dept) => desk.board_for_department(dept).map(|b| BoardView::Department(views::department(&b))),
        Room::Cell(cell) => desk.board_for_cell(cell).map(|b| BoardView::Cell(views::cell(&b))),
    };
    match board {
        Ok(board) => ServerFrame::Board { room: room.clone(), board },
        Err(e) => ServerFrame::Error { message: e.to_string() },
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
