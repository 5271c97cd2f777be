// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rig definitions (§3): sub-project directories scoping agents and formulas.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A registered rig (`(name, path, suspended)`, §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub suspended: bool,
}

impl Rig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            suspended: false,
        }
    }

    /// Exact cleaned-path comparison used by the identity resolver (§4.4).
    pub fn matches_path(&self, candidate: &Path) -> bool {
        clean_path(&self.path) == clean_path(candidate)
    }
}

fn clean_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "rig_tests.rs"]
mod tests;
