// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gc_core::{GateKind, PoolSpec, RunTarget, TriggerKind};
use std::path::PathBuf;

fn city_agent(name: &str) -> Agent {
    Agent::new("", name)
}

fn rig_agent(dir: &str, name: &str) -> Agent {
    Agent::new(dir, name)
}

fn pool_agent(dir: &str, name: &str, max: u32) -> Agent {
    let mut a = Agent::new(dir, name);
    a.pool = Some(PoolSpec { min: 1, max });
    a
}

#[test]
fn resolves_bare_city_agent() {
    let agents = vec![city_agent("dog")];
    let resolved = resolve_agent(&agents, "dog", None).expect("resolved");
    assert_eq!(resolved.agent.name, "dog");
    assert!(resolved.instance.is_none());
}

#[test]
fn resolves_qualified_dir_name() {
    let agents = vec![rig_agent("demo-repo", "dog")];
    let resolved = resolve_agent(&agents, "demo-repo/dog", None).expect("resolved");
    assert_eq!(resolved.agent.dir, "demo-repo");
}

#[test]
fn bare_name_prefers_city_level_over_rig_context() {
    let agents = vec![city_agent("dog"), rig_agent("demo-repo", "dog")];
    let resolved = resolve_agent(&agents, "dog", Some("demo-repo")).expect("resolved");
    assert_eq!(resolved.agent.dir, "");
}

#[test]
fn bare_name_falls_back_to_rig_context() {
    let agents = vec![rig_agent("demo-repo", "dog")];
    let resolved = resolve_agent(&agents, "dog", Some("demo-repo")).expect("resolved");
    assert_eq!(resolved.agent.dir, "demo-repo");
}

#[test]
fn bare_name_with_no_rig_context_and_no_city_match_fails() {
    let agents = vec![rig_agent("demo-repo", "dog")];
    assert!(resolve_agent(&agents, "dog", None).is_none());
}

#[test]
fn pool_instance_suffix_resolves_to_synthetic_single_instance() {
    let agents = vec![pool_agent("", "polecat", 3)];
    let resolved = resolve_agent(&agents, "polecat-2", None).expect("resolved");
    assert_eq!(resolved.instance, Some(2));
    assert_eq!(resolved.instance_qualified_name(), "polecat-2");
}

#[test]
fn pool_instance_suffix_out_of_range_does_not_resolve() {
    let agents = vec![pool_agent("", "polecat", 2)];
    assert!(resolve_agent(&agents, "polecat-3", None).is_none());
}

#[test]
fn non_pool_agent_never_matches_a_dashed_suffix() {
    let agents = vec![city_agent("polecat")];
    assert!(resolve_agent(&agents, "polecat-1", None).is_none());
}

#[test]
fn resolution_is_pure_over_the_same_inputs() {
    let agents = vec![city_agent("dog"), rig_agent("demo-repo", "dog")];
    let a = resolve_agent(&agents, "demo-repo/dog", None);
    let b = resolve_agent(&agents, "demo-repo/dog", None);
    assert_eq!(a.map(|r| r.instance_qualified_name()), b.map(|r| r.instance_qualified_name()));
}

fn trigger(name: &str, rig: &str) -> Trigger {
    Trigger {
        kind: TriggerKind::Automation,
        name: name.to_string(),
        rig: rig.to_string(),
        run: RunTarget::Formula("mol-digest".to_string()),
        gate: GateKind::Manual,
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

#[test]
fn resolves_city_trigger_by_bare_name() {
    let triggers = vec![trigger("digest", "")];
    assert!(resolve_trigger(&triggers, "digest", None).is_some());
}

#[test]
fn resolves_rig_trigger_via_context() {
    let triggers = vec![trigger("db-health", "demo-repo")];
    let resolved =
        resolve_trigger(&triggers, "db-health", Some("demo-repo")).expect("resolved");
    assert_eq!(resolved.rig, "demo-repo");
}

#[test]
fn resolves_rig_trigger_via_explicit_qualification() {
    let triggers = vec![trigger("db-health", "demo-repo")];
    let resolved = resolve_trigger(&triggers, "demo-repo/db-health", None).expect("resolved");
    assert_eq!(resolved.rig, "demo-repo");
}

#[test]
fn rig_context_matches_gc_dir_exact_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let rigs = vec![Rig::new("demo-repo", dir.path())];
    let found = resolve_rig_context(&rigs, Some(dir.path().to_str().unwrap()), Path::new("/"));
    assert_eq!(found.map(|r| r.name.as_str()), Some("demo-repo"));
}

#[test]
fn rig_context_walks_up_from_cwd() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("sub").join("deeper");
    std::fs::create_dir_all(&nested).expect("mkdir");
    let rigs = vec![Rig::new("demo-repo", dir.path())];
    let found = resolve_rig_context(&rigs, None, &nested);
    assert_eq!(found.map(|r| r.name.as_str()), Some("demo-repo"));
}

#[test]
fn rig_context_none_when_no_enclosing_rig() {
    let dir = tempfile::tempdir().expect("tempdir");
    let rigs: Vec<Rig> = vec![];
    assert!(resolve_rig_context(&rigs, None, dir.path()).is_none());
}
