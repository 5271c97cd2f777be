// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bead definitions (§3): the issue-tracker record type owned by the bead
//! store provider. This crate only models the shape the dispatcher and
//! sling router read and write; bead identity and storage live behind
//! `gc-providers::beads`.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque bead identifier, as returned by the bead store.
    pub struct BeadId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bead {
    pub id: BeadId,
    pub title: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Bead {
    /// Whether `status == "open"` (§4.9 child partitioning).
    pub fn is_open(&self) -> bool {
        self.status == "open"
    }

    /// Whether a label with this exact string is present.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Add a label if not already present (§4.2 `Update` is idempotent).
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.has_label(&label) {
            self.labels.push(label);
        }
    }
}

/// Build the `pool:<qpool>` label (§3/§4.7).
pub fn pool_label(qualified_pool: &str) -> String {
    format!("pool:{}", qualified_pool)
}

/// Build the `{plugin,automation}-run:<scoped>` tracking label (§3/§4.7,
/// GLOSSARY "Tracking label").
pub fn run_label(kind: crate::trigger::TriggerKind, scoped: &str) -> String {
    format!("{}-run:{}", kind.as_str(), scoped)
}

/// Build the `{plugin,automation}:<scoped>` event-gate label (§4.7 step 3).
pub fn trigger_label(kind: crate::trigger::TriggerKind, scoped: &str) -> String {
    format!("{}:{}", kind.as_str(), scoped)
}

/// Build the `seq:<u64>` label (§3/§4.7).
pub fn seq_label(seq: u64) -> String {
    format!("seq:{}", seq)
}

/// Parse a `seq:<u64>` label's value, if this label is a `seq:` label.
pub fn parse_seq_label(label: &str) -> Option<u64> {
    label.strip_prefix("seq:")?.parse().ok()
}

#[cfg(test)]
#[path = "bead_tests.rs"]
mod tests;
