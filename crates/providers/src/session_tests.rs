// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn session_name_default_template_joins_with_dash() {
    assert_eq!(session_name("acme", "dog", None), "acme-dog");
}

#[test]
fn session_name_custom_template_with_placeholder() {
    assert_eq!(
        session_name("acme", "dog", Some("sess-{}")),
        "sess-dog"
    );
}

#[test]
fn session_name_custom_template_without_placeholder() {
    assert_eq!(session_name("acme", "dog", Some("sess")), "sess-dog");
}

#[tokio::test]
async fn absent_session_has_absent_drain_state() {
    let fake = FakeSessionAdapter::new();
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Absent);
}

#[tokio::test]
async fn started_session_is_running() {
    let fake = FakeSessionAdapter::new();
    fake.start("dog").await.unwrap();
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Running);
}

#[tokio::test]
async fn drain_then_drain_ack_state_machine() {
    let fake = FakeSessionAdapter::new();
    fake.start("dog").await.unwrap();

    fake.drain("dog", 1000).await.unwrap();
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Draining);
    assert!(fake.drain_check("dog").await.unwrap());

    fake.drain_ack("dog").await.unwrap();
    assert_eq!(
        fake.drain_state("dog").await.unwrap(),
        DrainState::DrainAcked
    );
}

#[tokio::test]
async fn redraining_updates_timestamp_without_duplicating_state() {
    let fake = FakeSessionAdapter::new();
    fake.start("dog").await.unwrap();
    fake.drain("dog", 1000).await.unwrap();
    fake.drain("dog", 2000).await.unwrap();
    assert_eq!(
        fake.get_env("dog", GC_DRAIN).await.unwrap().as_deref(),
        Some("2000")
    );
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Draining);
}

#[tokio::test]
async fn undrain_on_non_draining_session_returns_success() {
    let fake = FakeSessionAdapter::new();
    fake.start("dog").await.unwrap();
    fake.undrain("dog").await.unwrap();
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Running);
}

#[tokio::test]
async fn undrain_removes_drain_flag() {
    let fake = FakeSessionAdapter::new();
    fake.start("dog").await.unwrap();
    fake.drain("dog", 1000).await.unwrap();
    fake.undrain("dog").await.unwrap();
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Running);
}

#[tokio::test]
async fn stop_on_absent_session_returns_success() {
    let fake = FakeSessionAdapter::new();
    fake.stop("nonexistent").await.unwrap();
}

#[tokio::test]
async fn kill_bypasses_drain_and_stops_immediately() {
    let fake = FakeSessionAdapter::new();
    fake.start("dog").await.unwrap();
    fake.drain("dog", 1000).await.unwrap();
    fake.kill("dog").await.unwrap();
    assert_eq!(fake.drain_state("dog").await.unwrap(), DrainState::Absent);
}

#[tokio::test]
async fn fail_adapter_fails_every_operation() {
    let fail = FailSessionAdapter;
    assert!(fail.start("dog").await.is_err());
    assert!(fail.is_running("dog").await.is_err());
    assert!(fail.get_env("dog", GC_DRAIN).await.is_err());
}
