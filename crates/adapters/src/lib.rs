// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the systems around the call board: the CMMS, outbound
//! notifications, and the telemetry feed.

pub mod cmms;
pub mod notify;
pub mod telemetry;

pub use cmms::{
    normalize_name, CmmsAdapter, CmmsError, CmmsRouter, FiixClient, FiixConfig, PriorityCodes,
    WorkOrderRequest,
};
pub use notify::{
    DesktopNotifyAdapter, NotifyAdapter, NotifyError, NotifyRouter, WebhookNotifyAdapter,
};
pub use telemetry::{EmptyTelemetry, TelemetryFeed};

#[cfg(any(test, feature = "test-support"))]
pub use cmms::{CmmsCall, FakeCmmsAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
