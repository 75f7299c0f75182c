// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call slot entry handlers.

use andon_core::{CallSlot, LogEntry, Subject};

use super::BoardState;

pub(crate) fn apply(state: &mut BoardState, entry: &LogEntry) {
    let Subject::Call(call_id) = entry.subject() else {
        return;
    };
    let slot = state.slot_entry(entry.dept(), entry.cell_id());

    match entry {
        LogEntry::Request { ts, .. } => {
            if slot.open_call() != Some(call_id) {
                *slot = CallSlot::waiting(call_id.clone(), *ts);
            }
        }
        // Only the call the entry names is closed; a slot already reopened
        // under a newer id is untouched.
        LogEntry::Cancel { .. } | LogEntry::Complete { .. } => {
            if slot.open_call() == Some(call_id) {
                *slot = CallSlot::ready();
            }
        }
    }
}
