// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle provider (§4.8): start/attach/nudge/peek/kill, the
//! key-value environment sidecar used for drain signaling, and the drain
//! state machine itself.

use async_trait::async_trait;
use gc_core::{GcError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// Session-scoped environment keys used for out-of-band drain signaling
/// (§4.8, §6).
pub const GC_DRAIN: &str = "GC_DRAIN";
pub const GC_DRAIN_ACK: &str = "GC_DRAIN_ACK";

/// A session's drain lifecycle state (§4.8): `Absent → Running →
/// (Draining → DrainAcked) → Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Absent,
    Running,
    Draining,
    DrainAcked,
}

/// Adapter for starting, attaching to, and signaling agent sessions (§4.8).
///
/// Implementations must be cheap to clone (a thin handle over shared
/// state), matching the teacher's `SessionAdapter` convention.
#[async_trait]
pub trait SessionAdapter: Send + Sync {
    async fn start(&self, name: &str) -> Result<()>;
    async fn stop(&self, name: &str) -> Result<()>;
    async fn is_running(&self, name: &str) -> Result<bool>;
    async fn attach(&self, name: &str) -> Result<()>;
    async fn nudge(&self, name: &str, text: &str) -> Result<()>;
    async fn peek(&self, name: &str, lines: u32) -> Result<String>;

    async fn get_env(&self, name: &str, key: &str) -> Result<Option<String>>;
    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<()>;
    async fn remove_env(&self, name: &str, key: &str) -> Result<()>;

    /// `drain(name)`: sets `GC_DRAIN=<unix-ts>` in the session environment
    /// (§4.8). Idempotent — re-issuing updates the timestamp.
    async fn drain(&self, name: &str, now_unix_ts: i64) -> Result<()> {
        self.set_env(name, GC_DRAIN, &now_unix_ts.to_string()).await
    }

    /// `undrain(name)`: removes `GC_DRAIN`. Idempotent — a no-op on a
    /// non-draining session.
    async fn undrain(&self, name: &str) -> Result<()> {
        self.remove_env(name, GC_DRAIN).await
    }

    /// `drain-check`: exit 0 (returns `true`) iff `GC_DRAIN` is set and
    /// non-empty (§4.8).
    async fn drain_check(&self, name: &str) -> Result<bool> {
        match self.get_env(name, GC_DRAIN).await? {
            Some(v) => Ok(!v.is_empty()),
            None => Ok(false),
        }
    }

    /// `drain-ack`: sets `GC_DRAIN_ACK=1`, called by the agent after
    /// graceful wind-down (§4.8).
    async fn drain_ack(&self, name: &str) -> Result<()> {
        self.set_env(name, GC_DRAIN_ACK, "1").await
    }

    /// `kill(name)`: bypasses drain and calls `Stop` immediately (§4.8).
    async fn kill(&self, name: &str) -> Result<()> {
        self.stop(name).await
    }

    /// Observe the current lifecycle state by reading the session
    /// environment sidecar (§4.8). Used by the daemon's reconciliation
    /// loop and by `drain-check`/CLI.
    async fn drain_state(&self, name: &str) -> Result<DrainState> {
        if !self.is_running(name).await? {
            return Ok(DrainState::Absent);
        }
        if self
            .get_env(name, GC_DRAIN_ACK)
            .await?
            .is_some_and(|v| v == "1")
        {
            return Ok(DrainState::DrainAcked);
        }
        if self.drain_check(name).await? {
            return Ok(DrainState::Draining);
        }
        Ok(DrainState::Running)
    }
}

/// Derive the session name from `(cityName, qualifiedAgent, template)`
/// (§4.8). The default template joins the two with `-`; a custom template
/// may contain a single `{}` placeholder for the qualified agent name.
pub fn session_name(city_name: &str, qualified_agent: &str, template: Option<&str>) -> String {
    match template {
        Some(t) if t.contains("{}") => t.replace("{}", qualified_agent),
        Some(t) => format!("{}-{}", t, qualified_agent),
        None => format!("{}-{}", city_name, qualified_agent),
    }
}

/// Native session adapter: shells a configurable terminal-multiplexer
/// command. The multiplexer binary itself is an external collaborator
/// (spec.md §1) — this adapter only knows how to invoke it.
#[derive(Clone)]
pub struct NativeSessionAdapter {
    multiplexer_bin: String,
}

impl NativeSessionAdapter {
    pub fn new(multiplexer_bin: impl Into<String>) -> Self {
        Self {
            multiplexer_bin: multiplexer_bin.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new(&self.multiplexer_bin)
            .args(args)
            .output()
            .await
            .map_err(|e| GcError::ProviderFailure(format!("{}: {}", self.multiplexer_bin, e)))
    }
}

#[async_trait]
impl SessionAdapter for NativeSessionAdapter {
    async fn start(&self, name: &str) -> Result<()> {
        let output = self.run(&["new-session", "-d", "-s", name]).await?;
        if !output.status.success() {
            return Err(GcError::ProviderFailure(format!(
                "start {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<()> {
        let _ = self.run(&["kill-session", "-t", name]).await?;
        Ok(())
    }

    async fn is_running(&self, name: &str) -> Result<bool> {
        let output = self.run(&["has-session", "-t", name]).await?;
        Ok(output.status.success())
    }

    async fn attach(&self, name: &str) -> Result<()> {
        let output = self.run(&["attach-session", "-t", name]).await?;
        if !output.status.success() {
            return Err(GcError::NotFound(format!("session {}", name)));
        }
        Ok(())
    }

    async fn nudge(&self, name: &str, text: &str) -> Result<()> {
        let output = self
            .run(&["send-keys", "-t", name, text, "Enter"])
            .await?;
        if !output.status.success() {
            return Err(GcError::ProviderFailure(format!(
                "nudge {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }

    async fn peek(&self, name: &str, lines: u32) -> Result<String> {
        let output = self
            .run(&[
                "capture-pane",
                "-t",
                name,
                "-p",
                "-S",
                &format!("-{}", lines),
            ])
            .await?;
        if !output.status.success() {
            return Err(GcError::NotFound(format!("session {}", name)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn get_env(&self, name: &str, key: &str) -> Result<Option<String>> {
        let output = self
            .run(&["show-environment", "-t", name, key])
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim().strip_prefix(&format!("{}=", key)).map(String::from))
    }

    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<()> {
        let output = self
            .run(&["set-environment", "-t", name, key, value])
            .await?;
        if !output.status.success() {
            return Err(GcError::ProviderFailure(format!(
                "set-env {} {}: {}",
                name,
                key,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }

    async fn remove_env(&self, name: &str, key: &str) -> Result<()> {
        let _ = self.run(&["set-environment", "-t", name, "-u", key]).await?;
        Ok(())
    }
}

#[derive(Default)]
struct FakeSessionState {
    running: HashMap<String, bool>,
    env: HashMap<String, HashMap<String, String>>,
    calls: Vec<String>,
}

/// In-memory test double: all operations succeed (§4.1).
#[derive(Clone, Default)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    pub fn mark_running(&self, name: &str) {
        self.inner
            .lock()
            .running
            .insert(name.to_string(), true);
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn start(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(format!("start:{}", name));
        inner.running.insert(name.to_string(), true);
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(format!("stop:{}", name));
        inner.running.insert(name.to_string(), false);
        inner.env.remove(name);
        Ok(())
    }

    async fn is_running(&self, name: &str) -> Result<bool> {
        Ok(self
            .inner
            .lock()
            .running
            .get(name)
            .copied()
            .unwrap_or(false))
    }

    async fn attach(&self, name: &str) -> Result<()> {
        self.inner.lock().calls.push(format!("attach:{}", name));
        Ok(())
    }

    async fn nudge(&self, name: &str, text: &str) -> Result<()> {
        self.inner
            .lock()
            .calls
            .push(format!("nudge:{}:{}", name, text));
        Ok(())
    }

    async fn peek(&self, name: &str, lines: u32) -> Result<String> {
        self.inner
            .lock()
            .calls
            .push(format!("peek:{}:{}", name, lines));
        Ok(String::new())
    }

    async fn get_env(&self, name: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .inner
            .lock()
            .env
            .get(name)
            .and_then(|m| m.get(key))
            .cloned())
    }

    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner
            .env
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_env(&self, name: &str, key: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(m) = inner.env.get_mut(name) {
            m.remove(key);
        }
        Ok(())
    }
}

/// In-memory test double: every operation fails with `ProviderFailure`
/// (§4.1).
#[derive(Clone, Copy, Default)]
pub struct FailSessionAdapter;

#[async_trait]
impl SessionAdapter for FailSessionAdapter {
    async fn start(&self, _name: &str) -> Result<()> {
        Err(fail())
    }
    async fn stop(&self, _name: &str) -> Result<()> {
        Err(fail())
    }
    async fn is_running(&self, _name: &str) -> Result<bool> {
        Err(fail())
    }
    async fn attach(&self, _name: &str) -> Result<()> {
        Err(fail())
    }
    async fn nudge(&self, _name: &str, _text: &str) -> Result<()> {
        Err(fail())
    }
    async fn peek(&self, _name: &str, _lines: u32) -> Result<String> {
        Err(fail())
    }
    async fn get_env(&self, _name: &str, _key: &str) -> Result<Option<String>> {
        Err(fail())
    }
    async fn set_env(&self, _name: &str, _key: &str, _value: &str) -> Result<()> {
        Err(fail())
    }
    async fn remove_env(&self, _name: &str, _key: &str) -> Result<()> {
        Err(fail())
    }
}

fn fail() -> GcError {
    GcError::ProviderFailure("fail provider: session operation always fails".to_string())
}

/// Exec-backed session adapter (§4.1/§6): every op shells `<script>
/// <subcommand> <name> [args...]` through the generic wire protocol.
#[derive(Clone)]
pub struct ExecSessionAdapter {
    script: PathBuf,
    timeout: Duration,
}

impl ExecSessionAdapter {
    pub fn new(script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            script: script.into(),
            timeout,
        }
    }

    async fn call(&self, subcommand: &str, args: &[String]) -> Result<String> {
        crate::exec::run_exec_op(
            "session",
            &self.script,
            subcommand,
            args,
            &std::env::current_dir().unwrap_or_default(),
            &[],
            self.timeout,
        )
        .await
    }
}

#[async_trait]
impl SessionAdapter for ExecSessionAdapter {
    async fn start(&self, name: &str) -> Result<()> {
        self.call("start", &[name.to_string()]).await.map(|_| ())
    }
    async fn stop(&self, name: &str) -> Result<()> {
        self.call("stop", &[name.to_string()]).await.map(|_| ())
    }
    async fn is_running(&self, name: &str) -> Result<bool> {
        Ok(self.call("is-running", &[name.to_string()]).await? == "true")
    }
    async fn attach(&self, name: &str) -> Result<()> {
        self.call("attach", &[name.to_string()]).await.map(|_| ())
    }
    async fn nudge(&self, name: &str, text: &str) -> Result<()> {
        self.call("nudge", &[name.to_string(), text.to_string()])
            .await
            .map(|_| ())
    }
    async fn peek(&self, name: &str, lines: u32) -> Result<String> {
        self.call("peek", &[name.to_string(), lines.to_string()])
            .await
    }
    async fn get_env(&self, name: &str, key: &str) -> Result<Option<String>> {
        let out = self
            .call("get-env", &[name.to_string(), key.to_string()])
            .await?;
        Ok(if out.is_empty() { None } else { Some(out) })
    }
    async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<()> {
        self.call(
            "set-env",
            &[name.to_string(), key.to_string(), value.to_string()],
        )
        .await
        .map(|_| ())
    }
    async fn remove_env(&self, name: &str, key: &str) -> Result<()> {
        self.call("remove-env", &[name.to_string(), key.to_string()])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
