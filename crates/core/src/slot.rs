// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-slot department calls.

use crate::id::CallId;
use crate::work_order::WorkOrderLink;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    #[default]
    Ready,
    Waiting,
}

crate::simple_display! {
    CallStatus {
        Ready => "READY",
        Waiting => "WAITING",
    }
}

/// The call state of one department at one cell.
///
/// `status == Waiting` exactly when `requested_at_ms` and `call_id` are set.
/// Construct through [`CallSlot::ready`] and [`CallSlot::waiting`] to keep
/// that true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSlot {
    pub status: CallStatus,
    #[serde(default)]
    pub requested_at_ms: Option<u64>,
    #[serde(default)]
    pub call_id: Option<CallId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order: Option<WorkOrderLink>,
}

impl CallSlot {
    pub fn ready() -> Self {
        Self::default()
    }

    pub fn waiting(call_id: CallId, requested_at_ms: u64) -> Self {
        Self {
            status: CallStatus::Waiting,
            requested_at_ms: Some(requested_at_ms),
            call_id: Some(call_id),
            work_order: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == CallStatus::Waiting
    }

    /// The open call id, if this slot is waiting.
    pub fn open_call(&self) -> Option<&CallId> {
        if self.is_waiting() {
            self.call_id.as_ref()
        } else {
            None
        }
    }

    /// Milliseconds the call has been waiting, saturating at zero.
    pub fn waited_ms(&self, now_ms: u64) -> Option<u64> {
        self.requested_at_ms.map(|at| now_ms.saturating_sub(at))
    }
}
