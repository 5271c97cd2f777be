// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped acquisition of a provider, with guaranteed release on every exit
//! path (§9): the guard calls the provider's `ensure-ready` exec
//! subcommand on construction and `shutdown` on drop. In-memory providers
//! (fake/fail) have no external resource to warm up, so acquisition is a
//! no-op for them.

use crate::exec::run_exec_op;
use gc_core::Result;
use std::path::PathBuf;
use std::time::Duration;

/// An exec script this guard should call `ensure-ready`/`shutdown` on.
/// `None` for in-memory or already-running providers, matching the
/// native/fake/fail distinction elsewhere in this crate.
pub struct ScopedProvider {
    name: &'static str,
    script: Option<PathBuf>,
    cwd: PathBuf,
    timeout: Duration,
}

impl ScopedProvider {
    /// Acquire the provider: runs `ensure-ready` if `script` is set.
    pub async fn acquire(
        name: &'static str,
        script: Option<PathBuf>,
        cwd: PathBuf,
        timeout: Duration,
    ) -> Result<Self> {
        if let Some(path) = &script {
            run_exec_op(name, path, "ensure-ready", &[], &cwd, &[], timeout).await?;
        }
        Ok(Self {
            name,
            script,
            cwd,
            timeout,
        })
    }

    /// Release the provider eagerly and observe whether `shutdown`
    /// succeeded. Prefer this over relying on `Drop` when the caller wants
    /// to propagate a shutdown failure; `Drop` still runs the same
    /// teardown (best-effort, errors logged) on every other exit path.
    pub async fn release(mut self) -> Result<()> {
        self.shutdown_once().await
    }

    async fn shutdown_once(&mut self) -> Result<()> {
        if let Some(path) = self.script.take() {
            run_exec_op(self.name, &path, "shutdown", &[], &self.cwd, &[], self.timeout).await?;
        }
        Ok(())
    }
}

impl Drop for ScopedProvider {
    fn drop(&mut self) {
        let Some(path) = self.script.take() else {
            return;
        };
        let name = self.name;
        let cwd = self.cwd.clone();
        let timeout = self.timeout;
        // Best-effort: a panicking/aborting process can't await here, so
        // teardown on drop is fire-and-forget within whatever runtime is
        // still alive. Callers that need to observe failure should call
        // `release()` explicitly on the success path.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(err) = run_exec_op(name, &path, "shutdown", &[], &cwd, &[], timeout).await
                {
                    tracing::warn!(provider = name, error = %err, "provider shutdown failed on drop");
                }
            });
        }
    }
}

#[cfg(test)]
#[path = "scoped_tests.rs"]
mod tests;
