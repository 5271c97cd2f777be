// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The events log entry type (§3/§4.3).
//!
//! Unlike the teacher's closed `Event` enum (one variant per internal
//! runtime transition), this system's events are an open, operator-defined
//! vocabulary (`event emit <type> ...`, §6) — so `type` is a string, not an
//! enum discriminant.

use serde::{Deserialize, Serialize};

/// A single entry in the append-only events log (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Strictly monotone 64-bit sequence number, starting at 1. Assigned by
    /// the events provider on append; `0` is never a valid assigned seq.
    pub seq: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// An event before it has been assigned a `seq` by the provider (what a
/// writer appends, §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl NewEvent {
    pub fn new(kind: impl Into<String>, actor: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            actor: actor.into(),
            subject: subject.into(),
            message: String::new(),
            payload: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
