// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent definitions (§3).
//!
//! An agent's identity is the pair `(dir, name)`; instances are materialized
//! on demand by the session lifecycle, not by this struct.

use crate::scope::scoped_name;
use serde::{Deserialize, Serialize};

/// A pool of identical agent instances `name-1 … name-max` (§3, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub min: u32,
    pub max: u32,
}

impl PoolSpec {
    /// Whether `k` is a valid instance index for this pool.
    pub fn contains_instance(&self, k: u32) -> bool {
        k >= 1 && k <= self.max
    }
}

/// A registered agent definition (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// The rig name this agent is scoped to, or empty for city-level.
    #[serde(default)]
    pub dir: String,
    pub name: String,
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub pool: Option<PoolSpec>,
    #[serde(default)]
    pub sling_query: Option<String>,
}

impl Agent {
    pub fn new(dir: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            prompt_template: None,
            suspended: false,
            pool: None,
            sling_query: None,
        }
    }

    /// `QualifiedName` per §3: `dir+"/"+name`, or bare `name` if `dir` is empty.
    pub fn qualified_name(&self) -> String {
        scoped_name(&self.dir, &self.name)
    }

    /// Whether this agent represents a pool of more than one instance.
    pub fn is_pool(&self) -> bool {
        self.pool.map(|p| p.max > 1).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
