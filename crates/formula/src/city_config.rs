// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `city.toml` deserialization (§6).

use gc_core::{Agent, PoolSpec, Rig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `[workspace]` section of `city.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSection {
    #[serde(default)]
    pub name: Option<String>,
}

/// Provider-selection sections share the same shape: an optional explicit
/// kind, falling back to env var then default at resolve time (§4.1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(default)]
    pub kind: Option<String>,
}

/// `[formula_layers]` section: ordered city layer directories, plus a
/// per-rig map of additional layer directories (§4.5).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaLayers {
    #[serde(default)]
    pub city: Vec<PathBuf>,
    #[serde(default)]
    pub rigs: HashMap<String, Vec<PathBuf>>,
}

/// One `[[agents]]` entry in `city.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub name: String,
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub pool: Option<PoolSpec>,
    #[serde(default)]
    pub sling_query: Option<String>,
}

impl From<AgentEntry> for Agent {
    fn from(e: AgentEntry) -> Self {
        Agent {
            dir: e.dir,
            name: e.name,
            prompt_template: e.prompt_template,
            suspended: e.suspended,
            pool: e.pool,
            sling_query: e.sling_query,
        }
    }
}

/// One `[[rigs]]` entry in `city.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub suspended: bool,
}

impl From<RigEntry> for Rig {
    fn from(e: RigEntry) -> Self {
        Rig {
            name: e.name,
            path: e.path,
            suspended: e.suspended,
        }
    }
}

/// The full `city.toml` document (§6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    #[serde(default)]
    pub workspace: WorkspaceSection,
    #[serde(default)]
    pub session: ProviderSection,
    #[serde(default)]
    pub beads: ProviderSection,
    #[serde(default)]
    pub events: ProviderSection,
    #[serde(default)]
    pub mail: ProviderSection,
    #[serde(default, rename = "agents")]
    pub agents: Vec<AgentEntry>,
    #[serde(default, rename = "rigs")]
    pub rigs: Vec<RigEntry>,
    #[serde(default)]
    pub formula_layers: FormulaLayers,
}

/// Errors parsing or writing `city.toml`.
#[derive(Debug, thiserror::Error)]
pub enum CityConfigError {
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
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serializing city config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load and parse `city.toml` from a city root directory.
pub fn load_city_config(city_root: &Path) -> Result<CityConfig, CityConfigError> {
    let path = city_root.join("city.toml");
    let content =
        std::fs::read_to_string(&path).map_err(|source| CityConfigError::Read {
            path: path.clone(),
            source,
        })?;
    toml::from_str(&content).map_err(|source| CityConfigError::Parse { path, source })
}

/// Serialize and write `city.toml` back to a city root directory (§5:
/// "writers... must perform a read-modify-write on the file"). Used by
/// `agent add/suspend/resume`.
pub fn save_city_config(city_root: &Path, cfg: &CityConfig) -> Result<(), CityConfigError> {
    let path = city_root.join("city.toml");
    let content = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, content).map_err(|source| CityConfigError::Write { path, source })
}

impl CityConfig {
    /// Rig lookup by name.
    pub fn rig(&self, name: &str) -> Option<&RigEntry> {
        self.rigs.iter().find(|r| r.name == name)
    }

    /// Agent lookup by `(dir, name)`.
    pub fn agent(&self, dir: &str, name: &str) -> Option<&AgentEntry> {
        self.agents
            .iter()
            .find(|a| a.dir == dir && a.name == name)
    }

    /// Mutable agent lookup by `(dir, name)` (used by `agent
    /// suspend`/`resume`).
    pub fn agent_mut(&mut self, dir: &str, name: &str) -> Option<&mut AgentEntry> {
        self.agents
            .iter_mut()
            .find(|a| a.dir == dir && a.name == name)
    }
}

#[cfg(test)]
#[path = "city_config_tests.rs"]
mod tests;
