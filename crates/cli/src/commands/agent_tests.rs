// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::CliContext;
use gc_formula::CityConfig;
use serial_test::serial;
use std::path::Path;

fn write_city_toml(dir: &Path, content: &str) {
    std::fs::write(dir.join("city.toml"), content).expect("write city.toml");
}

fn load_ctx(dir: &Path) -> CliContext {
    std::env::set_var("GC_CITY", dir);
    std::env::remove_var("GC_DIR");
    std::env::set_var("GC_SESSION", "fake");
    std::env::set_var("GC_BEADS", "fake");
    std::env::set_var("GC_EVENTS", "fake");
    std::env::set_var("GC_MAIL", "fake");
    let ctx = CliContext::load().expect("load context");
    std::env::remove_var("GC_CITY");
    std::env::remove_var("GC_SESSION");
    std::env::remove_var("GC_BEADS");
    std::env::remove_var("GC_EVENTS");
    std::env::remove_var("GC_MAIL");
    ctx
}

#[tokio::test]
#[serial]
async fn add_then_list_round_trips_through_city_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(dir.path(), "[workspace]\nname = \"demo\"\n");
    let mut ctx = load_ctx(dir.path());

    handle(
        AgentCommand::Add {
            name: "builder".to_string(),
            dir: None,
            prompt_template: None,
            suspended: false,
            pool_min: None,
            pool_max: None,
            sling_query: None,
        },
        &mut ctx,
    )
    .await
    .expect("add succeeds");

    let reloaded = load_ctx(dir.path());
    assert_eq!(reloaded.agents().len(), 1);
    assert_eq!(reloaded.agents()[0].qualified_name(), "builder");
}

#[tokio::test]
#[serial]
async fn add_duplicate_agent_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        "[workspace]\nname = \"demo\"\n\n[[agents]]\nname = \"builder\"\n",
    );
    let mut ctx = load_ctx(dir.path());

    let result = handle(
        AgentCommand::Add {
            name: "builder".to_string(),
            dir: None,
            prompt_template: None,
            suspended: false,
            pool_min: None,
            pool_max: None,
            sling_query: None,
        },
        &mut ctx,
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn suspend_then_resume_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        "[workspace]\nname = \"demo\"\n\n[[agents]]\nname = \"builder\"\n",
    );
    let mut ctx = load_ctx(dir.path());

    handle(
        AgentCommand::Suspend {
            name: "builder".to_string(),
        },
        &mut ctx,
    )
    .await
    .expect("suspend succeeds");
    let reloaded = load_ctx(dir.path());
    assert!(reloaded.agents()[0].suspended);

    let mut ctx = reloaded;
    handle(
        AgentCommand::Resume {
            name: "builder".to_string(),
        },
        &mut ctx,
    )
    .await
    .expect("resume succeeds");
    let reloaded = load_ctx(dir.path());
    assert!(!reloaded.agents()[0].suspended);
}

#[tokio::test]
#[serial]
async fn unknown_agent_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(dir.path(), "[workspace]\nname = \"demo\"\n");
    let mut ctx = load_ctx(dir.path());

    let result = handle(
        AgentCommand::Kill {
            name: "nope".to_string(),
        },
        &mut ctx,
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn kill_calls_through_to_the_session_provider() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        "[workspace]\nname = \"demo\"\n\n[[agents]]\nname = \"builder\"\n",
    );
    let mut ctx = load_ctx(dir.path());

    handle(
        AgentCommand::Kill {
            name: "builder".to_string(),
        },
        &mut ctx,
    )
    .await
    .expect("kill succeeds against the fake session adapter");
}

#[tokio::test]
#[serial]
async fn drain_check_errors_when_no_drain_signal_is_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        "[workspace]\nname = \"demo\"\n\n[[agents]]\nname = \"builder\"\n",
    );
    let mut ctx = load_ctx(dir.path());

    let result = handle(
        AgentCommand::DrainCheck {
            name: "builder".to_string(),
        },
        &mut ctx,
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn drain_then_drain_check_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        "[workspace]\nname = \"demo\"\n\n[[agents]]\nname = \"builder\"\n",
    );
    let mut ctx = load_ctx(dir.path());

    handle(
        AgentCommand::Drain {
            name: "builder".to_string(),
        },
        &mut ctx,
    )
    .await
    .expect("drain succeeds");

    handle(
        AgentCommand::DrainCheck {
            name: "builder".to_string(),
        },
        &mut ctx,
    )
    .await
    .expect("drain-check now sees the signal");
}
