// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket frames for the push channel.
//!
//! Clients join rooms named `dept:<id>` or `cell:<id>` and receive the
//! matching board projection after every change that touches it.

use crate::board::BoardView;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Room {
    Dept(String),
    Cell(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid room {0:?}: expected dept:<id> or cell:<id>")]
pub struct RoomError(pub String);

impl Room {
    /// Whether a change to (`dept`, `cell_id`) is visible in this room.
    pub fn covers(&self, dept: &str, cell_id: &str) -> bool {
        match self {
            Room::Dept(id) => id == dept,
            Room::Cell(id) => id == cell_id,
        }
    }
}

impl FromStr for Room {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once(':').ok_or_else(|| RoomError(s.to_string()))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(RoomError(s.to_string()));
        }
        match kind {
            "dept" => Ok(Room::Dept(id.to_string())),
            "cell" => Ok(Room::Cell(id.to_string())),
            _ => Err(RoomError(s.to_string())),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::Dept(id) => write!(f, "dept:{id}"),
            Room::Cell(id) => write!(f, "cell:{id}"),
        }
    }
}

impl Serialize for Room {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Room {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Subscribe { room: Room },
    Unsubscribe { room: Room },
}

/// Server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Current projection for a room, sent on subscribe and on change
    Board { room: Room, board: BoardView },
    Unsubscribed { room: Room },
    Error { message: String },
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
