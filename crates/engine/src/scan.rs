// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger scanning entry point (§3, §4.5): a thin composition over
//! `gc_formula::scanner` that both the dispatcher and the CLI (`plugin
//! list`, `automation list`) call, keeping the "recomputed each tick,
//! never persisted" lifecycle rule visible at the engine layer.

use gc_core::Trigger;
use gc_formula::{scan_triggers, CityConfig, RigContext};
use std::path::Path;

/// Scan the city layer once, then every rig's exclusive layers, in the
/// order city-first (§4.5). Rig names are scanned in sorted order for
/// deterministic output.
pub fn scan_all_triggers(city_root: &Path, cfg: &CityConfig) -> Vec<Trigger> {
    let mut triggers = scan_triggers(city_root, cfg, &RigContext::city());

    let mut rig_names: Vec<&String> = cfg.formula_layers.rigs.keys().collect();
    rig_names.sort();

    for rig_name in rig_names {
        let scoped = scan_triggers(city_root, cfg, &RigContext::rig(rig_name.clone()));
        triggers.extend(scoped.into_iter().filter(|t| &t.rig == rig_name));
    }

    triggers
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
