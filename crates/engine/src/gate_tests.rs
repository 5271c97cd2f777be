// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration as ChronoDuration, TimeZone};
use gc_core::{seq_label, Bead, BeadId, GateKind, RunTarget, TriggerKind};
use gc_providers::FakeBeadStore;
use std::path::PathBuf;

fn base_trigger(gate: GateKind) -> Trigger {
    Trigger {
        kind: TriggerKind::Automation,
        name: "digest".to_string(),
        rig: "".to_string(),
        run: RunTarget::Formula("mol-digest".to_string()),
        gate,
        interval: None,
        schedule: None,
        check: None,
        on: None,
        pool: None,
        description: None,
        source: PathBuf::from("digest.automation.toml"),
        timeout: None,
        skip: false,
    }
}

fn run_bead(label: &str, created_at: chrono::DateTime<Utc>) -> Bead {
    Bead {
        id: BeadId::new("wisp-1"),
        title: "run".to_string(),
        status: "closed".to_string(),
        kind: "task".to_string(),
        assignee: None,
        labels: vec![label.to_string()],
        created_at,
    }
}

#[tokio::test]
async fn manual_gate_is_never_due() {
    let trigger = base_trigger(GateKind::Manual);
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, Utc::now(), &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(!outcome.due);
}

#[tokio::test]
async fn cooldown_gate_due_with_no_previous_run() {
    let mut trigger = base_trigger(GateKind::Cooldown);
    trigger.interval = Some("1h".to_string());
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, Utc::now(), &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(outcome.due);
}

#[tokio::test]
async fn cooldown_gate_not_due_before_interval_elapses() {
    let mut trigger = base_trigger(GateKind::Cooldown);
    trigger.interval = Some("1h".to_string());
    let beads = FakeBeadStore::new();
    let now = Utc::now();
    beads.insert(run_bead(
        &run_label(TriggerKind::Automation, &trigger.scoped_name()),
        now - ChronoDuration::minutes(10),
    ));
    let outcome = check_gate(&trigger, now, &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(!outcome.due);
}

#[tokio::test]
async fn cooldown_gate_due_once_interval_elapses() {
    let mut trigger = base_trigger(GateKind::Cooldown);
    trigger.interval = Some("1h".to_string());
    let beads = FakeBeadStore::new();
    let now = Utc::now();
    beads.insert(run_bead(
        &run_label(TriggerKind::Automation, &trigger.scoped_name()),
        now - ChronoDuration::hours(2),
    ));
    let outcome = check_gate(&trigger, now, &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(outcome.due);
}

#[tokio::test]
async fn cron_gate_due_on_matching_minute_without_a_prior_run_this_minute() {
    let mut trigger = base_trigger(GateKind::Cron);
    trigger.schedule = Some("30 9 * * *".to_string());
    let now = chrono::Utc.with_ymd_and_hms(2026, 7, 26, 9, 30, 0).unwrap();
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, now, &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(outcome.due);
}

#[tokio::test]
async fn cron_gate_not_due_twice_in_the_same_minute() {
    let mut trigger = base_trigger(GateKind::Cron);
    trigger.schedule = Some("30 9 * * *".to_string());
    let now = chrono::Utc.with_ymd_and_hms(2026, 7, 26, 9, 30, 0).unwrap();
    let beads = FakeBeadStore::new();
    beads.insert(run_bead(
        &run_label(TriggerKind::Automation, &trigger.scoped_name()),
        now,
    ));
    let outcome = check_gate(&trigger, now, &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(!outcome.due);
}

#[tokio::test]
async fn check_gate_due_when_command_exits_zero() {
    let mut trigger = base_trigger(GateKind::Check);
    trigger.check = Some("true".to_string());
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, Utc::now(), &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(outcome.due);
}

#[tokio::test]
async fn check_gate_not_due_when_command_exits_nonzero() {
    let mut trigger = base_trigger(GateKind::Check);
    trigger.check = Some("false".to_string());
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, Utc::now(), &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(!outcome.due);
}

#[tokio::test]
async fn event_gate_due_when_latest_seq_exceeds_cursor() {
    let trigger = base_trigger(GateKind::Event);
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, Utc::now(), &beads, 7, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(outcome.due);
}

#[tokio::test]
async fn event_gate_not_due_when_cursor_already_caught_up() {
    let trigger = base_trigger(GateKind::Event);
    let beads = FakeBeadStore::new();
    beads.insert(run_bead(
        &trigger_label(TriggerKind::Automation, &trigger.scoped_name()),
        Utc::now(),
    ));
    let tracked = beads
        .list_by_label(&trigger_label(TriggerKind::Automation, &trigger.scoped_name()), 1)
        .await
        .expect("list")
        .pop()
        .expect("one bead");
    beads
        .update(&tracked.id, &[seq_label(7)])
        .await
        .expect("tag cursor");
    let outcome = check_gate(&trigger, Utc::now(), &beads, 7, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(!outcome.due);
}

#[tokio::test]
async fn event_gate_not_due_when_latest_seq_is_zero() {
    let trigger = base_trigger(GateKind::Event);
    let beads = FakeBeadStore::new();
    let outcome = check_gate(&trigger, Utc::now(), &beads, 0, Path::new("."))
        .await
        .expect("gate evaluates");
    assert!(!outcome.due);
}
