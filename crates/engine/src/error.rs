// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failures surfaced to callers of the lifecycle engines.
///
/// CMMS and notification failures never appear here; they are logged and
/// recorded on the affected ticket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl DeskError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        DeskError::Validation(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        DeskError::NotFound(msg.into())
    }
}

impl From<andon_storage::WalError> for DeskError {
    fn from(e: andon_storage::WalError) -> Self {
        DeskError::Storage(e.to_string())
    }
}
