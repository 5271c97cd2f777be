// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger scanner (§4.5): walks layered formula directories and
//! materializes trigger descriptors.

use crate::city_config::CityConfig;
use crate::trigger_file::{kind_for_path, load_trigger_file};
use gc_core::Trigger;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The rig a scan is being performed for, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RigContext {
    pub rig: Option<String>,
}

impl RigContext {
    pub fn city() -> Self {
        Self { rig: None }
    }

    pub fn rig(name: impl Into<String>) -> Self {
        Self {
            rig: Some(name.into()),
        }
    }
}

/// Scan a city's layered formula directories for trigger files (§4.5).
///
/// City layers (`cfg.formula_layers.city`) are scanned first with `rig=""`;
/// when `rig_ctx` names a rig, that rig's full layer list (its own entry in
/// `formula_layers.rigs`, minus any directory already covered by the city
/// prefix) is scanned next, stamping `rig=<name>`. The same canonicalized
/// file path is never scanned twice.
pub fn scan_triggers(city_root: &Path, cfg: &CityConfig, rig_ctx: &RigContext) -> Vec<Trigger> {
    let skip_names: HashSet<&str> = ["README.md", ".gitkeep"].into_iter().collect();
    let mut seen_paths: HashSet<PathBuf> = HashSet::new();
    let mut triggers = Vec::new();

    for layer in &cfg.formula_layers.city {
        scan_layer(
            &resolve_layer(city_root, layer),
            "",
            &skip_names,
            &mut seen_paths,
            &mut triggers,
        );
    }

    if let Some(rig_name) = &rig_ctx.rig {
        if let Some(layers) = cfg.formula_layers.rigs.get(rig_name) {
            for layer in layers {
                scan_layer(
                    &resolve_layer(city_root, layer),
                    rig_name,
                    &skip_names,
                    &mut seen_paths,
                    &mut triggers,
                );
            }
        }
    }

    triggers
}

fn resolve_layer(city_root: &Path, layer: &Path) -> PathBuf {
    if layer.is_absolute() {
        layer.to_path_buf()
    } else {
        city_root.join(layer)
    }
}

fn scan_layer(
    dir: &Path,
    rig: &str,
    skip_names: &HashSet<&str>,
    seen_paths: &mut HashSet<PathBuf>,
    triggers: &mut Vec<Trigger>,
) {
    for path in collect_trigger_files(dir, skip_names) {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !seen_paths.insert(canonical) {
            continue;
        }
        let Some(kind) = kind_for_path(&path) else {
            continue;
        };
        match load_trigger_file(&path, kind, rig) {
            Ok(trigger) => {
                if trigger.skip {
                    tracing::debug!(path = %path.display(), "trigger file marked skip, excluding");
                    continue;
                }
                if let Err(err) = trigger.validate() {
                    tracing::warn!(path = %path.display(), error = %err, "skipping invalid trigger file");
                    continue;
                }
                triggers.push(trigger)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unparsable trigger file");
            }
        }
    }
}

fn collect_trigger_files(dir: &Path, skip_names: &HashSet<&str>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if skip_names.contains(name) {
                continue;
            }
            if kind_for_path(&path).is_some() {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
