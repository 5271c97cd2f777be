// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::PermissionsExt;

fn write_script(dir: &std::path::Path, body: &str) -> PathBuf {
    let path = dir.join("hook.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

#[tokio::test]
async fn acquire_with_no_script_is_a_noop() {
    let guard = ScopedProvider::acquire("beads", None, PathBuf::from("."), Duration::from_secs(1))
        .await
        .expect("acquire");
    guard.release().await.expect("release");
}

#[tokio::test]
async fn acquire_runs_ensure_ready_and_release_runs_shutdown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let script = write_script(
        dir.path(),
        &format!("echo \"$1\" >> {}", log.display()),
    );

    let guard = ScopedProvider::acquire(
        "beads",
        Some(script),
        dir.path().to_path_buf(),
        Duration::from_secs(5),
    )
    .await
    .expect("acquire");
    guard.release().await.expect("release");

    let calls = std::fs::read_to_string(&log).expect("read log");
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(lines, vec!["ensure-ready", "shutdown"]);
}

#[tokio::test]
async fn acquire_propagates_ensure_ready_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(dir.path(), "echo boom >&2\nexit 1");
    let err = ScopedProvider::acquire(
        "beads",
        Some(script),
        dir.path().to_path_buf(),
        Duration::from_secs(5),
    )
    .await
    .expect_err("should fail");
    assert!(err.to_string().contains("ensure-ready"));
}
