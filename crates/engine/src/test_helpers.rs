// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared desk fixtures for engine tests.

use crate::{CompletionInput, Desk, DeskDeps, TicketInput};
use andon_adapters::{FakeCmmsAdapter, FakeNotifyAdapter};
use andon_core::{Catalog, FakeClock, LogEntry, Priority};
use andon_storage::{BoardState, Wal};
use std::time::Duration;
use tempfile::TempDir;

pub(crate) type TestDesk = Desk<FakeCmmsAdapter, FakeNotifyAdapter, FakeClock>;

pub(crate) struct TestContext {
    pub desk: TestDesk,
    pub cmms: FakeCmmsAdapter,
    pub notifier: FakeNotifyAdapter,
    pub clock: FakeClock,
    pub dir: TempDir,
}

pub(crate) fn setup() -> TestContext {
    setup_with(FakeCmmsAdapter::new())
}

pub(crate) fn setup_with(cmms: FakeCmmsAdapter) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let wal = Wal::open(&dir.path().join("events.wal")).unwrap();
    let notifier = FakeNotifyAdapter::new();
    let clock = FakeClock::new();
    let desk = Desk::new(
        Catalog::default(),
        BoardState::default(),
        wal,
        DeskDeps { cmms: cmms.clone(), notifier: notifier.clone() },
        clock.clone(),
    );
    TestContext { desk, cmms, notifier, clock, dir }
}

impl TestContext {
    /// Every entry in the durable log, oldest first.
    pub fn log(&self) -> Vec<LogEntry> {
        self.desk.recent_history(usize::MAX).unwrap().into_iter().map(|e| e.entry).collect()
    }

    /// Wait for background notifications and CMMS updates.
    pub async fn settle(&self) {
        assert!(self.desk.drain(Duration::from_secs(5)).await, "background tasks did not finish");
    }

    pub fn advance_ms(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
    }
}

pub(crate) fn completion(responder: &str, result: &str) -> CompletionInput {
    CompletionInput { responder: responder.into(), result: result.into(), ..Default::default() }
}

pub(crate) fn ticket(issue: &str) -> TicketInput {
    TicketInput { priority: Priority::Medium, issue: issue.into(), asset: String::new() }
}
