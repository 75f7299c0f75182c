// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CMMS correlation: external work orders for maintenance tickets.
//!
//! Every call here may fail. The ticket engine never lets a failure block
//! a local transition; it records the error on the ticket's link instead.

mod fiix;
mod lookup;
mod sign;

pub use fiix::{FiixClient, FiixConfig, PriorityCodes};
pub use lookup::normalize_name;

use andon_core::{Priority, WorkOrderLink};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmmsError {
    #[error("CMMS integration is not configured")]
    Disabled,
    #[error("CMMS request timed out")]
    Timeout,
    #[error("CMMS request failed: {0}")]
    Transport(String),
    #[error("CMMS returned HTTP {0}")]
    Http(u16),
    #[error("CMMS error: {0}")]
    Api(String),
    #[error("unreadable CMMS response: {0}")]
    Decode(String),
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),
    #[error("CMMS config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CmmsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CmmsError::Timeout
        } else {
            CmmsError::Transport(e.to_string())
        }
    }
}

/// What the CMMS needs to raise a work order for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderRequest {
    pub cell_id: String,
    pub cell_name: String,
    pub priority: Priority,
    pub issue: String,
    /// Operator's asset selection: an internal id, a lookup code, or empty
    pub asset: String,
}

#[async_trait]
pub trait CmmsAdapter: Clone + Send + Sync + 'static {
    async fn create_work_order(&self, request: &WorkOrderRequest)
        -> Result<WorkOrderLink, CmmsError>;

    /// Close with completion notes, assigning the responder when they map
    /// to a CMMS user.
    async fn close_work_order(
        &self,
        external_id: &str,
        responder: &str,
        notes: &str,
    ) -> Result<(), CmmsError>;

    async fn cancel_work_order(
        &self,
        external_id: &str,
        actor: &str,
        reason: &str,
    ) -> Result<(), CmmsError>;
}

/// The CMMS the daemon talks to, picked from config at startup.
#[derive(Clone, Debug, Default)]
pub enum CmmsRouter {
    #[default]
    Disabled,
    Fiix(FiixClient),
}

#[async_trait]
impl CmmsAdapter for CmmsRouter {
    async fn create_work_order(
        &self,
        request: &WorkOrderRequest,
    ) -> Result<WorkOrderLink, CmmsError> {
        match self {
            CmmsRouter::Disabled => Err(CmmsError::Disabled),
            CmmsRouter::Fiix(client) => client.create_work_order(request).await,
        }
    }

    async fn close_work_order(
        &self,
        external_id: &str,
        responder: &str,
        notes: &str,
    ) -> Result<(), CmmsError> {
        match self {
            CmmsRouter::Disabled => Err(CmmsError::Disabled),
            CmmsRouter::Fiix(client) => client.close_work_order(external_id, responder, notes).await,
        }
    }

    async fn cancel_work_order(
        &self,
        external_id: &str,
        actor: &str,
        reason: &str,
    ) -> Result<(), CmmsError> {
        match self {
            CmmsRouter::Disabled => Err(CmmsError::Disabled),
            CmmsRouter::Fiix(client) => client.cancel_work_order(external_id, actor, reason).await,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CmmsAdapter, CmmsError, WorkOrderRequest};
    use andon_core::WorkOrderLink;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded CMMS call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CmmsCall {
        Create(WorkOrderRequest),
        Close { external_id: String, responder: String, notes: String },
        Cancel { external_id: String, actor: String, reason: String },
    }

    type Hook = Arc<dyn Fn() + Send + Sync>;

    #[derive(Default)]
    struct FakeCmmsState {
        calls: Vec<CmmsCall>,
        next_id: u64,
        fail_create: Option<CmmsError>,
        fail_close: Option<CmmsError>,
        on_create: Option<Hook>,
    }

    /// Fake CMMS for testing. Work orders are numbered from 1001.
    #[derive(Clone, Default)]
    pub struct FakeCmmsAdapter {
        inner: Arc<Mutex<FakeCmmsState>>,
    }

    impl FakeCmmsAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// A fake that reports the integration as switched off.
        pub fn disabled() -> Self {
            let fake = Self::default();
            fake.fail_create_with(Some(CmmsError::Disabled));
            fake.fail_close_with(Some(CmmsError::Disabled));
            fake
        }

        pub fn fail_create_with(&self, error: Option<CmmsError>) {
            self.inner.lock().fail_create = error;
        }

        /// Applies to both close and cancel.
        pub fn fail_close_with(&self, error: Option<CmmsError>) {
            self.inner.lock().fail_close = error;
        }

        /// Run `hook` at the start of every create, e.g. to move a fake
        /// clock forward the way a slow CMMS would.
        pub fn on_create(&self, hook: impl Fn() + Send + Sync + 'static) {
            self.inner.lock().on_create = Some(Arc::new(hook));
        }

        pub fn calls(&self) -> Vec<CmmsCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl CmmsAdapter for FakeCmmsAdapter {
        async fn create_work_order(
            &self,
            request: &WorkOrderRequest,
        ) -> Result<WorkOrderLink, CmmsError> {
            let hook = self.inner.lock().on_create.clone();
            if let Some(hook) = hook {
                hook();
            }
            let mut inner = self.inner.lock();
            inner.calls.push(CmmsCall::Create(request.clone()));
            if let Some(e) = inner.fail_create.clone() {
                return Err(e);
            }
            inner.next_id += 1;
            let id = 1000 + inner.next_id;
            Ok(WorkOrderLink::linked(
                id.to_string(),
                format!("WO-{id}"),
                format!("https://cmms.test/wo/{id}"),
            ))
        }

        async fn close_work_order(
            &self,
            external_id: &str,
            responder: &str,
            notes: &str,
        ) -> Result<(), CmmsError> {
            let mut inner = self.inner.lock();
            inner.calls.push(CmmsCall::Close {
                external_id: external_id.to_string(),
                responder: responder.to_string(),
                notes: notes.to_string(),
            });
            inner.fail_close.clone().map_or(Ok(()), Err)
        }

        async fn cancel_work_order(
            &self,
            external_id: &str,
            actor: &str,
            reason: &str,
        ) -> Result<(), CmmsError> {
            let mut inner = self.inner.lock();
            inner.calls.push(CmmsCall::Cancel {
                external_id: external_id.to_string(),
                actor: actor.to_string(),
                reason: reason.to_string(),
            });
            inner.fail_close.clone().map_or(Ok(()), Err)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{CmmsCall, FakeCmmsAdapter};
