// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn write_city_toml(dir: &Path, content: &str) {
    std::fs::write(dir.join("city.toml"), content).expect("write city.toml");
}

#[test]
fn load_minimal_city_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(dir.path(), "[workspace]\nname = \"demo\"\n");
    let cfg = load_city_config(dir.path()).expect("load");
    assert_eq!(cfg.workspace.name.as_deref(), Some("demo"));
    assert!(cfg.agents.is_empty());
}

#[test]
fn load_missing_file_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_city_config(dir.path()).expect_err("should error");
    assert!(matches!(err, CityConfigError::Read { .. }));
}

#[test]
fn load_malformed_toml_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(dir.path(), "not valid [[[ toml");
    let err = load_city_config(dir.path()).expect_err("should error");
    assert!(matches!(err, CityConfigError::Parse { .. }));
}

#[test]
fn parses_agents_and_rigs() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        r#"
[[rigs]]
name = "demo-repo"
path = "/work/demo-repo"

[[agents]]
name = "builder"
dir = "demo-repo"

[agents.pool]
min = 1
max = 3
"#,
    );
    let cfg = load_city_config(dir.path()).expect("load");
    assert_eq!(cfg.rigs.len(), 1);
    assert_eq!(cfg.agents.len(), 1);
    assert_eq!(cfg.agents[0].pool, Some(PoolSpec { min: 1, max: 3 }));
}

#[test]
fn rig_lookup_by_name() {
    let mut cfg = CityConfig::default();
    cfg.rigs.push(RigEntry {
        name: "demo-repo".to_string(),
        path: PathBuf::from("/work/demo-repo"),
        suspended: false,
    });
    assert!(cfg.rig("demo-repo").is_some());
    assert!(cfg.rig("other").is_none());
}

#[test]
fn agent_lookup_by_dir_and_name() {
    let mut cfg = CityConfig::default();
    cfg.agents.push(AgentEntry {
        name: "builder".to_string(),
        dir: "demo-repo".to_string(),
        prompt_template: None,
        suspended: false,
        pool: None,
        sling_query: None,
    });
    assert!(cfg.agent("demo-repo", "builder").is_some());
    assert!(cfg.agent("", "builder").is_none());
}

#[test]
fn agent_mut_allows_in_place_suspend() {
    let mut cfg = CityConfig::default();
    cfg.agents.push(AgentEntry {
        name: "builder".to_string(),
        dir: "demo-repo".to_string(),
        prompt_template: None,
        suspended: false,
        pool: None,
        sling_query: None,
    });
    cfg.agent_mut("demo-repo", "builder").expect("present").suspended = true;
    assert!(cfg.agent("demo-repo", "builder").expect("present").suspended);
}

#[test]
fn save_then_load_round_trips_an_added_agent() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(dir.path(), "[workspace]\nname = \"demo\"\n");
    let mut cfg = load_city_config(dir.path()).expect("load");

    cfg.agents.push(AgentEntry {
        name: "builder".to_string(),
        dir: "demo-repo".to_string(),
        prompt_template: None,
        suspended: false,
        pool: None,
        sling_query: Some("bd update {} --assign=builder".to_string()),
    });
    save_city_config(dir.path(), &cfg).expect("save");

    let reloaded = load_city_config(dir.path()).expect("reload");
    let agent: gc_core::Agent = reloaded
        .agent("demo-repo", "builder")
        .cloned()
        .expect("agent persisted")
        .into();
    assert_eq!(agent.qualified_name(), "demo-repo/builder");
}
