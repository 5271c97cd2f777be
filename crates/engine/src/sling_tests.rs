// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gc_core::{Bead, PoolSpec};
use gc_providers::{FakeBeadStore, FakeSessionAdapter};

fn open_bead(id: &str, kind: &str) -> Bead {
    Bead {
        id: BeadId::new(id),
        title: id.to_string(),
        status: "open".to_string(),
        kind: kind.to_string(),
        assignee: None,
        labels: Vec::new(),
        created_at: chrono::Utc::now(),
    }
}

fn closed_bead(id: &str, kind: &str) -> Bead {
    let mut b = open_bead(id, kind);
    b.status = "closed".to_string();
    b
}

fn agent_with_query(name: &str, query: &str) -> Agent {
    let mut a = Agent::new("", name);
    a.sling_query = Some(query.to_string());
    a
}

#[tokio::test]
async fn slings_a_single_bead_successfully() {
    let beads = FakeBeadStore::new();
    beads.insert(open_bead("wisp-1", "task"));
    let session = FakeSessionAdapter::new();
    let agents = vec![agent_with_query("dog", "true {}")];

    let outcome = sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Bead(BeadId::new("wisp-1")),
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling succeeds");

    assert_eq!(outcome.routed_count(), 1);
    assert_eq!(outcome.failed_count(), 0);
    assert_eq!(outcome.target.kind, SlingTargetKind::Agent);
}

#[tokio::test]
async fn container_bead_batches_over_open_children_only() {
    let beads = FakeBeadStore::new();
    let root = open_bead("convoy-1", "convoy");
    beads.insert(root.clone());
    beads.add_child(&root.id, open_bead("child-1", "task"));
    beads.add_child(&root.id, open_bead("child-2", "task"));
    beads.add_child(&root.id, closed_bead("child-3", "task"));
    let session = FakeSessionAdapter::new();
    let agents = vec![agent_with_query("dog", "true {}")];

    let outcome = sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Bead(root.id.clone()),
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling succeeds");

    assert_eq!(outcome.attempts.len(), 2);
    assert_eq!(outcome.routed_count(), 2);
}

#[tokio::test]
async fn container_bead_with_no_open_children_is_an_error() {
    let beads = FakeBeadStore::new();
    let root = open_bead("epic-1", "epic");
    beads.insert(root.clone());
    beads.add_child(&root.id, closed_bead("child-1", "task"));
    let session = FakeSessionAdapter::new();
    let agents = vec![agent_with_query("dog", "true {}")];

    let result = sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Bead(root.id.clone()),
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await;

    assert!(matches!(result, Err(SlingError::NoOpenChildren(_))));
}

#[tokio::test]
async fn missing_sling_query_is_an_error() {
    let beads = FakeBeadStore::new();
    beads.insert(open_bead("wisp-1", "task"));
    let session = FakeSessionAdapter::new();
    let agents = vec![Agent::new("", "dog")];

    let result = sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Bead(BeadId::new("wisp-1")),
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await;

    assert!(matches!(result, Err(SlingError::NoSlingQuery(_))));
}

#[tokio::test]
async fn unknown_target_is_an_error() {
    let beads = FakeBeadStore::new();
    let session = FakeSessionAdapter::new();
    let agents: Vec<Agent> = vec![];

    let result = sling_bead(
        "ghost",
        None,
        &agents,
        SlingMethod::Bead(BeadId::new("wisp-1")),
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await;

    assert!(matches!(result, Err(SlingError::TargetNotFound(_))));
}

#[tokio::test]
async fn failing_query_is_counted_but_does_not_abort_the_batch() {
    let beads = FakeBeadStore::new();
    let root = open_bead("convoy-1", "convoy");
    beads.insert(root.clone());
    beads.add_child(&root.id, open_bead("child-1", "task"));
    let session = FakeSessionAdapter::new();
    let agents = vec![agent_with_query("dog", "false {}")];

    let outcome = sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Bead(root.id.clone()),
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling reports, does not error, on per-child failure");

    assert_eq!(outcome.failed_count(), 1);
}

#[tokio::test]
async fn formula_method_cooks_before_routing() {
    let beads = FakeBeadStore::new();
    let session = FakeSessionAdapter::new();
    let agents = vec![agent_with_query("dog", "true {}")];

    let outcome = sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Formula {
            formula: "mol-digest".to_string(),
            title: None,
            vars: Vec::new(),
        },
        false,
        false,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling succeeds");

    assert_eq!(beads.cook_calls().len(), 1);
    assert_eq!(outcome.routed_count(), 1);
}

#[tokio::test]
async fn post_sling_nudge_reaches_a_single_agent_session() {
    let beads = FakeBeadStore::new();
    beads.insert(open_bead("wisp-1", "task"));
    let session = FakeSessionAdapter::new();
    let agents = vec![agent_with_query("dog", "true {}")];

    sling_bead(
        "dog",
        None,
        &agents,
        SlingMethod::Bead(BeadId::new("wisp-1")),
        false,
        true,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling succeeds");

    assert!(session.calls().iter().any(|c| c.starts_with("nudge:city-dog")));
}

#[tokio::test]
async fn post_sling_nudge_on_a_pool_with_no_running_instance_is_a_warning_not_a_failure() {
    let beads = FakeBeadStore::new();
    beads.insert(open_bead("wisp-1", "task"));
    let session = FakeSessionAdapter::new();
    let mut pool_agent = agent_with_query("polecat", "true {}");
    pool_agent.pool = Some(PoolSpec { min: 1, max: 3 });
    let agents = vec![pool_agent];

    let outcome = sling_bead(
        "polecat",
        None,
        &agents,
        SlingMethod::Bead(BeadId::new("wisp-1")),
        false,
        true,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling succeeds even when no pool instance is running");

    assert_eq!(outcome.target.kind, SlingTargetKind::Pool);
    assert!(!session.calls().iter().any(|c| c.starts_with("nudge:")));
}

#[tokio::test]
async fn post_sling_nudge_on_a_pool_reaches_the_first_running_instance() {
    let beads = FakeBeadStore::new();
    beads.insert(open_bead("wisp-1", "task"));
    let session = FakeSessionAdapter::new();
    session.mark_running("city-polecat-2");
    let mut pool_agent = agent_with_query("polecat", "true {}");
    pool_agent.pool = Some(PoolSpec { min: 1, max: 3 });
    let agents = vec![pool_agent];

    sling_bead(
        "polecat",
        None,
        &agents,
        SlingMethod::Bead(BeadId::new("wisp-1")),
        false,
        true,
        "city",
        None,
        &beads,
        &session,
    )
    .await
    .expect("sling succeeds");

    assert!(session.calls().iter().any(|c| c.starts_with("nudge:city-polecat-2")));
}
