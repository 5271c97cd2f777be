// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn write_city_toml(dir: &std::path::Path, content: &str) {
    std::fs::write(dir.join("city.toml"), content).expect("write city.toml");
}

#[test]
#[serial]
fn load_reads_city_toml_from_gc_city() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_city_toml(
        dir.path(),
        "[workspace]\nname = \"demo\"\n\n[[agents]]\nname = \"builder\"\n",
    );

    std::env::set_var("GC_CITY", dir.path());
    std::env::remove_var("GC_DIR");
    let ctx = CliContext::load().expect("load context");
    std::env::remove_var("GC_CITY");

    assert_eq!(ctx.city_name(), "demo");
    assert_eq!(ctx.agents().len(), 1);
    assert_eq!(ctx.agents()[0].qualified_name(), "builder");
}

#[test]
#[serial]
fn missing_city_toml_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::env::set_var("GC_CITY", dir.path());
    let result = CliContext::load();
    std::env::remove_var("GC_CITY");
    assert!(result.is_err());
}
