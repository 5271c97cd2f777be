// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn base(gate: GateKind) -> Trigger {
    Trigger {
        kind: TriggerKind::Automation,
        name: "digest".to_string(),
        rig: String::new(),
        run: RunTarget::Formula("mol-digest".to_string()),
        gate,
        interval: None,
        schedule: None,
        check: None,
        on: None,
        pool: None,
        description: None,
        source: PathBuf::from("city/digest.automation.toml"),
        timeout: None,
        skip: false,
    }
}

#[test]
fn scoped_name_no_rig() {
    let t = base(GateKind::Manual);
    assert_eq!(t.scoped_name(), "digest");
}

#[test]
fn scoped_name_with_rig() {
    let mut t = base(GateKind::Manual);
    t.name = "db-health".to_string();
    t.rig = "demo-repo".to_string();
    assert_eq!(t.scoped_name(), "db-health:rig:demo-repo");
}

#[test]
fn timeout_or_default_falls_back_to_60s() {
    let t = base(GateKind::Check);
    assert_eq!(t.timeout_or_default(), DEFAULT_TIMEOUT);
}

#[test]
fn timeout_or_default_honors_override() {
    let mut t = base(GateKind::Check);
    t.timeout = Some(Duration::from_secs(5));
    assert_eq!(t.timeout_or_default(), Duration::from_secs(5));
}

#[test]
fn manual_gate_with_no_timing_field_is_valid() {
    let t = base(GateKind::Manual);
    assert!(t.validate().is_ok());
}

#[test]
fn manual_gate_with_timing_field_is_invalid() {
    let mut t = base(GateKind::Manual);
    t.interval = Some("24h".to_string());
    assert!(t.validate().is_err());
}

#[test]
fn cooldown_gate_requires_interval() {
    let t = base(GateKind::Cooldown);
    assert!(t.validate().is_err());
    let mut t = base(GateKind::Cooldown);
    t.interval = Some("24h".to_string());
    assert!(t.validate().is_ok());
}

#[test]
fn cron_gate_requires_schedule() {
    let mut t = base(GateKind::Cron);
    t.schedule = Some("0 9 * * *".to_string());
    assert!(t.validate().is_ok());
}

#[test]
fn check_gate_requires_check() {
    let mut t = base(GateKind::Check);
    t.check = Some("test -f ready".to_string());
    assert!(t.validate().is_ok());
}

#[test]
fn event_gate_requires_on() {
    let mut t = base(GateKind::Event);
    t.on = Some("bead:closed".to_string());
    assert!(t.validate().is_ok());
}

#[test]
fn timing_field_honors_tie_break_order() {
    let mut t = base(GateKind::Manual);
    t.schedule = Some("schedule".to_string());
    t.check = Some("check".to_string());
    assert_eq!(t.timing_field(), Some("schedule"));
}
