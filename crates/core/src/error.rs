// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core error kinds (§7): the vocabulary shared by providers, the identity
//! resolver, the gate evaluator, the dispatcher, and sling.

use thiserror::Error;

/// Error kinds common to the dispatch & gating engine.
#[derive(Debug, Error)]
pub enum GcError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider failure: {0}")]
    ProviderFailure(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("degraded: {0}")]
    Degraded(String),
}

impl GcError {
    /// Short machine-readable tag, for structured logging fields.
    pub fn code(&self) -> &'static str {
        match self {
            GcError::NotFound(_) => "not_found",
            GcError::InvalidInput(_) => "invalid_input",
            GcError::ProviderFailure(_) => "provider_failure",
            GcError::Timeout(_) => "timeout",
            GcError::Conflict(_) => "conflict",
            GcError::Degraded(_) => "degraded",
        }
    }

    /// Process exit code for CLI commands that surface this error directly
    /// (§6: `0` success, `1` generic failure — `2` is reserved for exec
    /// subprocess no-ops and is never produced here).
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether this error is "best-effort" — logged but never propagated
    /// (§7: event emission, nudge failures).
    pub fn is_degraded(&self) -> bool {
        matches!(self, GcError::Degraded(_))
    }
}

pub type Result<T> = std::result::Result<T, GcError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
