// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process router over a fake-backed daemon.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use andon_adapters::{EmptyTelemetry, FakeCmmsAdapter, FakeNotifyAdapter, TelemetryFeed};
use andon_core::{FakeClock, TelemetrySeries};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use super::{router, ListenCtx};
use crate::test_helpers::{start, Fakes, TestDaemon};

pub(crate) type TestCtx = ListenCtx<FakeCmmsAdapter, FakeNotifyAdapter, FakeClock>;

/// Reports the same two buckets for any window.
pub(crate) struct FixedTelemetry;

#[async_trait]
impl TelemetryFeed for FixedTelemetry {
    async fn series(&self, _start_ms: u64, _end_ms: u64) -> TelemetrySeries {
        TelemetrySeries {
            buckets: vec!["08:00".into(), "09:00".into()],
            sizes: vec!["large".into()],
            series: BTreeMap::from([("large".to_string(), vec![3, 5])]),
        }
    }
}

pub(crate) struct TestApp {
    pub app: Router,
    pub ctx: Arc<TestCtx>,
    pub fakes: Fakes,
    // Holds the daemon lock for the duration of the test
    _daemon: TestDaemon,
    _dir: TempDir,
}

pub(crate) fn test_app() -> TestApp {
    test_app_with(Arc::new(EmptyTelemetry))
}

pub(crate) fn test_app_with(telemetry: Arc<dyn TelemetryFeed>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let fakes = Fakes::new();
    let daemon = start(dir.path(), &fakes);
    let ctx = Arc::new(ListenCtx {
        desk: daemon.desk.clone(),
        telemetry,
        start_time: Instant::now(),
        shutdown: CancellationToken::new(),
    });
    TestApp { app: router(Arc::clone(&ctx)), ctx, fakes, _daemon: daemon, _dir: dir }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    pub fn advance_ms(&self, ms: u64) {
        self.fakes.clock.advance(Duration::from_millis(ms));
    }

    pub async fn settle(&self) {
        assert!(self.ctx.desk.drain(Duration::from_secs(5)).await, "background tasks did not finish");
    }
}
