// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon fixtures over fake adapters.

use std::path::Path;

use andon_adapters::{FakeCmmsAdapter, FakeNotifyAdapter};
use andon_core::{Catalog, FakeClock};
use andon_engine::DeskDeps;

use crate::lifecycle::{startup, DaemonState, LifecycleError, Paths};

pub(crate) type TestDaemon = DaemonState<FakeCmmsAdapter, FakeNotifyAdapter, FakeClock>;

pub(crate) struct Fakes {
    pub cmms: FakeCmmsAdapter,
    pub notifier: FakeNotifyAdapter,
    pub clock: FakeClock,
}

impl Fakes {
    pub fn new() -> Self {
        Self { cmms: FakeCmmsAdapter::new(), notifier: FakeNotifyAdapter::new(), clock: FakeClock::new() }
    }
}

/// Start a daemon under `state_dir` with the stock catalog.
pub(crate) fn try_start(state_dir: &Path, fakes: &Fakes) -> Result<TestDaemon, LifecycleError> {
    startup(
        &Paths::under(state_dir),
        Catalog::default(),
        DeskDeps { cmms: fakes.cmms.clone(), notifier: fakes.notifier.clone() },
        fakes.clock.clone(),
    )
}

pub(crate) fn start(state_dir: &Path, fakes: &Fakes) -> TestDaemon {
    try_start(state_dir, fakes).unwrap()
}
