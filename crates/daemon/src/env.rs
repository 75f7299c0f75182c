// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Daemon version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: ANDON_STATE_DIR > XDG_STATE_HOME/andon > ~/.local/state/andon
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("ANDON_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("andon"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/andon"))
}

/// Config file override; defaults to `<state_dir>/andon.toml`.
pub fn config_path() -> Option<PathBuf> {
    std::env::var("ANDON_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Listen address override for `[server] bind`.
pub fn bind() -> Option<String> {
    std::env::var("ANDON_BIND").ok().filter(|s| !s.is_empty())
}

/// CMMS signing secret, kept out of the config file when set.
pub fn cmms_secret() -> Option<String> {
    std::env::var("ANDON_CMMS_SECRET").ok().filter(|s| !s.is_empty())
}

/// Periodic snapshot interval (default 30s, configurable via `ANDON_CHECKPOINT_MS`).
pub fn checkpoint_interval() -> Duration {
    std::env::var("ANDON_CHECKPOINT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}

/// Shutdown drain timeout (default 5s, configurable via `ANDON_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("ANDON_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Mirror the log file to stderr when `ANDON_LOG_STDERR=1`.
pub fn log_to_stderr() -> bool {
    std::env::var("ANDON_LOG_STDERR").is_ok_and(|v| v == "1")
}
