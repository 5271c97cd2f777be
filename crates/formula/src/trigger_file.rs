// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `*.plugin.toml` / `*.automation.toml` deserialization (§6).

use gc_core::{GateKind, RunTarget, Trigger, TriggerKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One trigger file's contents, before `rig`/`source`/`kind` are stamped by
/// the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerFileDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub exec: Option<PathBuf>,
    pub gate: GateKind,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub check: Option<String>,
    #[serde(default)]
    pub on: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub skip: bool,
}

/// Errors parsing a single trigger file.
#[derive(Debug, thiserror::Error)]
pub enum TriggerFileError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{path}: formula and exec are mutually exclusive (exactly one required)")]
    FormulaXorExec { path: PathBuf },
}

/// Parse one trigger file's raw content and turn it into a [`Trigger`],
/// stamping `kind`, `rig`, and `source`. Does not call [`Trigger::validate`]
/// — callers decide whether to reject-and-skip or accept defensively.
pub fn parse_trigger_file(
    content: &str,
    path: &Path,
    kind: TriggerKind,
    rig: &str,
) -> Result<Trigger, TriggerFileError> {
    let def: TriggerFileDef =
        toml::from_str(content).map_err(|source| TriggerFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let run = match (def.formula, def.exec) {
        (Some(formula), None) => RunTarget::Formula(formula),
        (None, Some(script)) => RunTarget::Exec(script),
        _ => {
            return Err(TriggerFileError::FormulaXorExec {
                path: path.to_path_buf(),
            })
        }
    };

    Ok(Trigger {
        kind,
        name: def.name,
        rig: rig.to_string(),
        run,
        gate: def.gate,
        interval: def.interval,
        schedule: def.schedule,
        check: def.check,
        on: def.on,
        pool: def.pool,
        description: def.description,
        source: path.to_path_buf(),
        timeout: def.timeout.map(Duration::from_secs),
        skip: def.skip,
    })
}

/// Read and parse a trigger file from disk.
pub fn load_trigger_file(
    path: &Path,
    kind: TriggerKind,
    rig: &str,
) -> Result<Trigger, TriggerFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| TriggerFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trigger_file(&content, path, kind, rig)
}

/// Infer a trigger's [`TriggerKind`] from its file name
/// (`*.plugin.toml` / `*.automation.toml`), per §6.
pub fn kind_for_path(path: &Path) -> Option<TriggerKind> {
    let name = path.file_name()?.to_str()?;
    if name.ends_with(".plugin.toml") {
        Some(TriggerKind::Plugin)
    } else if name.ends_with(".automation.toml") {
        Some(TriggerKind::Automation)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "trigger_file_tests.rs"]
mod tests;
