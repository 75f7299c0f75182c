// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound request bodies and query strings.

use andon_core::{HistoryFilter, Priority};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCallRequest {
    pub dept: String,
    pub cell_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub dept: String,
    pub cell_id: String,
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub dept: String,
    pub cell_id: String,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub responder: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub part_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTicketRequest {
    pub cell_id: String,
    /// Asset id or lookup code
    #[serde(default)]
    pub asset_selection: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub cell_id: String,
    pub ticket_id: String,
    #[serde(default)]
    pub note: String,
}

/// Administrative history clear. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRequest {
    #[serde(default)]
    pub dept: Option<String>,
    #[serde(default)]
    pub cell_id: Option<String>,
    #[serde(default)]
    pub before_ms: Option<u64>,
}

impl From<ClearRequest> for HistoryFilter {
    fn from(req: ClearRequest) -> Self {
        HistoryFilter { dept: req.dept, cell_id: req.cell_id, before_ms: req.before_ms }
    }
}

/// `GET /api/timeline?startMs=..&endMs=..&depts=quality,materials`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQuery {
    pub start_ms: u64,
    pub end_ms: u64,
    /// Comma-separated department ids; empty or absent means all
    #[serde(default)]
    pub depts: Option<String>,
}

impl TimelineQuery {
    pub fn dept_list(&self) -> Vec<String> {
        self.depts
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub const DEFAULT_LIMIT: usize = 100;
    pub const MAX_LIMIT: usize = 1000;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
