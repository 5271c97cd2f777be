// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon (§6).

use std::path::PathBuf;
use std::time::Duration;

/// City workspace root: `GC_CITY` if set, else the process's current
/// working directory (§6).
pub fn city_root() -> PathBuf {
    std::env::var("GC_CITY")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_default())
}

/// Controller tick interval, overridable via `GC_TICK_MS` (default 5s).
pub fn tick_interval() -> Duration {
    std::env::var("GC_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Drain reconciliation interval, overridable via `GC_RECONCILE_MS`
/// (default 10s — coarser than the dispatch tick since drain acks are not
/// time-sensitive).
pub fn reconcile_interval() -> Duration {
    std::env::var("GC_RECONCILE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

/// `GC_SUSPENDED=1` forces city-wide suspension: the controller keeps
/// running (so reconciliation still drains sessions) but skips dispatch
/// ticks (§6).
pub fn city_suspended() -> bool {
    std::env::var("GC_SUSPENDED")
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// Daemon log file path, under the city's `.gc` directory.
pub fn log_path(city_root: &std::path::Path) -> PathBuf {
    city_root.join(".gc").join("daemon.log")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
