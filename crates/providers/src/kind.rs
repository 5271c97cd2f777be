// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider kind vocabulary shared by every provider family (§4.1).

use std::path::PathBuf;

/// A resolved provider selection, before the concrete trait object is
/// constructed by [`crate::registry::ProviderRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// The real, I/O-backed implementation.
    Native,
    /// In-memory test double: every operation succeeds.
    Fake,
    /// In-memory test double: every operation fails.
    Fail,
    /// `exec:<path>` — shells out to a script using the generic wire
    /// protocol (§4.1/§6).
    Exec(PathBuf),
    /// Bypasses the provider's lifecycle entirely (bead daemon
    /// start/stop, `GC_DOLT=skip`).
    Skip,
}

impl ProviderKind {
    /// Parse a raw provider-selection string (env var value or config
    /// field) into a kind. `"exec:<path>"`, `"fake"`, `"fail"`, and
    /// `"skip"` are reserved; anything else (including empty/absent)
    /// resolves to `Native`.
    pub fn parse(raw: &str) -> ProviderKind {
        if let Some(path) = raw.strip_prefix("exec:") {
            return ProviderKind::Exec(PathBuf::from(path));
        }
        match raw {
            "fake" => ProviderKind::Fake,
            "fail" => ProviderKind::Fail,
            "skip" => ProviderKind::Skip,
            _ => ProviderKind::Native,
        }
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
