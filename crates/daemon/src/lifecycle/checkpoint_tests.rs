// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{start, Fakes};
use andon_storage::load_snapshot;
use std::path::Path;

async fn wait_for_snapshot_seq(path: &Path, seq: u64) -> bool {
    for _ in 0..100 {
        if let Ok(Some(snapshot)) = load_snapshot(path) {
            if snapshot.seq >= seq {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn updates_trigger_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = start(dir.path(), &Fakes::new());
    let cancel = CancellationToken::new();
    let handle = spawn_checkpoint_loop(
        daemon.desk.clone(),
        daemon.checkpointer.clone(),
        Duration::from_secs(60),
        cancel.clone(),
    );

    daemon.desk.open_call("quality", "cell-1").unwrap();
    daemon.desk.open_call("quality", "cell-2").unwrap();

    assert!(wait_for_snapshot_seq(&daemon.paths.snapshot_path, 2).await);
    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn loop_stops_on_cancel() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = start(dir.path(), &Fakes::new());
    let cancel = CancellationToken::new();
    let handle = spawn_checkpoint_loop(
        daemon.desk.clone(),
        daemon.checkpointer.clone(),
        Duration::from_millis(10),
        cancel.clone(),
    );

    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    assert!(!daemon.paths.snapshot_path.exists());
}

#[test]
fn write_checkpoint_records_log_position() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = start(dir.path(), &Fakes::new());

    let result = write_checkpoint(&daemon.desk, &daemon.checkpointer).unwrap();

    assert_eq!(result.seq, 0);
    assert!(load_snapshot(&daemon.paths.snapshot_path).unwrap().is_some());
}
