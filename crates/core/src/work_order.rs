// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local record linking a call or ticket to an external CMMS work order.

use serde::{Deserialize, Serialize};

/// Correlation to an external work order.
///
/// Created once by the CMMS layer when the ticket is raised. A failed
/// creation still produces a link, carrying only `error`, so the board can
/// show that the work order is missing. Later close/cancel failures are
/// recorded in `close_error` without touching the original fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_error: Option<String>,
}

impl WorkOrderLink {
    pub fn linked(
        external_id: impl Into<String>,
        display_number: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            external_id: Some(external_id.into()),
            display_number: Some(display_number.into()),
            url: Some(url.into()),
            error: None,
            close_error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { error: Some(error.into()), ..Self::default() }
    }

    /// The external id, when creation succeeded.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}
