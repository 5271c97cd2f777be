// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger definitions (§3): the shared `plugin` / `automation` vocabulary.
//!
//! Parsing a `*.plugin.toml` / `*.automation.toml` file into a [`Trigger`]
//! lives in `gc-formula`; this crate holds the data shape and the
//! gate-matches-timing-field validation that both the scanner (reject at
//! scan time) and the gate evaluator (defensive tie-break, §4.6) rely on.

use crate::error::GcError;
use crate::scope::scoped_trigger_name;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One of four gate kinds (§3/§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    Manual,
    Cooldown,
    Cron,
    Check,
    Event,
}

impl GateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Manual => "manual",
            GateKind::Cooldown => "cooldown",
            GateKind::Cron => "cron",
            GateKind::Check => "check",
            GateKind::Event => "event",
        }
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a trigger is a `plugin` or an `automation` (GLOSSARY: identical
/// semantics in this core, distinguished only for label-prefix purposes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Plugin,
    Automation,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Plugin => "plugin",
            TriggerKind::Automation => "automation",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The source of wisps a trigger dispatches: a formula, or a raw exec script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunTarget {
    Formula(String),
    Exec(PathBuf),
}

/// A gated recurring trigger (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub name: String,
    /// Stamped after scanning rig-exclusive layers (§4.5); empty for
    /// city-scanned triggers.
    #[serde(default)]
    pub rig: String,
    pub run: RunTarget,
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
    pub description: Option<String>,
    pub source: PathBuf,
    #[serde(default)]
    pub timeout: Option<Duration>,
    /// Disables this trigger entirely when set (§6 trigger-file field
    /// `skip`) — the scanner excludes it from the set it returns, as
    /// distinct from the workspace-level filename skip-set in §4.5.
    #[serde(default)]
    pub skip: bool,
}

/// Default `check`/`exec` timeout (§4.6/§5): 60 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

impl Trigger {
    /// `ScopedName()` (§3): `name` if no rig, else `name:rig:<rig>`.
    pub fn scoped_name(&self) -> String {
        scoped_trigger_name(&self.name, &self.rig)
    }

    pub fn timeout_or_default(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// The timing field selected by this trigger's gate, under the
    /// defensive tie-break order `{interval, schedule, check, on}` (§4.6).
    /// `manual` has no timing field and always returns `None`.
    pub fn timing_field(&self) -> Option<&str> {
        self.interval
            .as_deref()
            .or(self.schedule.as_deref())
            .or(self.check.as_deref())
            .or(self.on.as_deref())
    }

    /// Validate the `formula` XOR `exec` and gate/timing-field invariants
    /// (§3). Called at scan time (reject-and-skip) and defensively by the
    /// gate evaluator.
    pub fn validate(&self) -> Result<(), GcError> {
        let expected_field_set = match self.gate {
            GateKind::Manual => self.interval.is_none()
                && self.schedule.is_none()
                && self.check.is_none()
                && self.on.is_none(),
            GateKind::Cooldown => self.interval.is_some(),
            GateKind::Cron => self.schedule.is_some(),
            GateKind::Check => self.check.is_some(),
            GateKind::Event => self.on.is_some(),
        };
        if !expected_field_set {
            return Err(GcError::InvalidInput(format!(
                "trigger {}: timing field does not match gate {}",
                self.name, self.gate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
