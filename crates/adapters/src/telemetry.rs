// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Oven and mold telemetry shown beside the reconstructed timeline.

use andon_core::TelemetrySeries;
use async_trait::async_trait;

/// Source of per-bucket counts for a time window.
///
/// Feeds report an empty series rather than failing; the timeline is still
/// useful without telemetry.
#[async_trait]
pub trait TelemetryFeed: Send + Sync + 'static {
    async fn series(&self, start_ms: u64, end_ms: u64) -> TelemetrySeries;
}

/// Feed used when no telemetry source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTelemetry;

#[async_trait]
impl TelemetryFeed for EmptyTelemetry {
    async fn series(&self, _start_ms: u64, _end_ms: u64) -> TelemetrySeries {
        TelemetrySeries::default()
    }
}
