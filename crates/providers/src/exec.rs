// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The generic `exec:<script>` wire protocol (§4.1/§6), shared by every
//! provider family's `Exec` variant and by the `check`/`exec` trigger
//! gates (§4.6/§4.7).

use gc_core::{GcError, Result};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Exit code reserved for "not applicable / no-op" — always treated as
/// success (§4.1, §7, §8).
pub const NOT_APPLICABLE_EXIT: i32 = 2;

/// Invoke `script <subcommand> <args...>` and interpret its exit status per
/// the wire protocol:
///
/// - exit `0`: success, stdout (trimmed) is returned.
/// - exit `2`: success (not-applicable/no-op), returns an empty string.
/// - any other exit: `ProviderFailure("exec <provider> <subcommand>:
///   <trimmed stderr>")`, or the raw stderr-less message when stderr is
///   empty.
///
/// `provider` names the calling provider family (`"beads"`, `"session"`,
/// `"events"`, `"mail"`) for the error message shape spec.md §7/§8 example
/// 6 specifies verbatim.
pub async fn run_exec_op(
    provider: &str,
    script: &Path,
    subcommand: &str,
    args: &[String],
    cwd: &Path,
    env: &[(String, String)],
    timeout: Duration,
) -> Result<String> {
    let mut cmd = Command::new(script);
    cmd.arg(subcommand);
    cmd.args(args);
    cmd.current_dir(cwd);
    for (key, value) in env {
        cmd.env(key, value);
    }

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(io_err)) => {
            return Err(GcError::ProviderFailure(format!(
                "exec {} {}: {}",
                provider, subcommand, io_err
            )))
        }
        Err(_elapsed) => {
            return Err(GcError::Timeout(format!(
                "exec {} {} timed out after {}s",
                provider,
                subcommand,
                timeout.as_secs()
            )))
        }
    };

    match output.status.code() {
        Some(0) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()),
        Some(NOT_APPLICABLE_EXIT) => Ok(String::new()),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                Err(GcError::ProviderFailure(format!(
                    "exec {} {}: process exited with status {}",
                    provider,
                    subcommand,
                    output.status
                )))
            } else {
                Err(GcError::ProviderFailure(format!(
                    "exec {} {}: {}",
                    provider, subcommand, stderr
                )))
            }
        }
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
