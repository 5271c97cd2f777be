// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI error formatting (§6/§7): "errors exit non-zero with a one-line
//! stderr message of the form `gc <cmd>: <reason>`."

use std::fmt;

/// Wraps a command failure with the process exit code it should carry and
/// the name of the failing subcommand, so `main` can render the spec's
/// exact message shape without each command re-deriving it.
#[derive(Debug)]
pub struct ExitError {
    pub command: String,
    pub reason: String,
    pub code: i32,
}

impl ExitError {
    pub fn new(command: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            command: command.into(),
            reason: reason.to_string(),
            code: 1,
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gc {}: {}", self.command, self.reason)
    }
}

impl std::error::Error for ExitError {}

/// Attach a command name to any displayable error, turning it into an
/// [`ExitError`] anyhow can carry through to `main`'s exit-code mapping.
pub trait WithCommand<T> {
    fn with_command(self, command: &str) -> anyhow::Result<T>;
}

impl<T, E: fmt::Display> WithCommand<T> for Result<T, E> {
    fn with_command(self, command: &str) -> anyhow::Result<T> {
        self.map_err(|e| anyhow::Error::new(ExitError::new(command, e)))
    }
}

#[cfg(test)]
#[path = "exit_tests.rs"]
mod tests;
