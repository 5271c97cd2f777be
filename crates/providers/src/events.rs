// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events log provider (§4.3, §6): append-only newline-delimited JSON at
//! `.gc/events.jsonl`, with a monotone `seq` counter guarded by an
//! advisory file lock (matching the teacher's own state-file guarding).

use async_trait::async_trait;
use fs2::FileExt;
use gc_core::{Event, GcError, NewEvent, Result};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait EventsLog: Send + Sync {
    async fn append(&self, event: NewEvent) -> Result<Event>;

    /// Highest assigned `seq`, or `0` if empty, or if this provider cannot
    /// supply a sequence at all (e.g. a discard sink) — §4.3.
    async fn latest_seq(&self) -> Result<u64>;
}

/// Native events log: appends to `<city_root>/.gc/events.jsonl`, assigning
/// strictly monotone `seq` via the file itself (reading the last line to
/// recover the counter), guarded by an advisory exclusive lock so
/// concurrent producers serialize (§4.3 concurrency note: append order =
/// seq order).
#[derive(Clone)]
pub struct NativeEventsLog {
    path: PathBuf,
}

impl NativeEventsLog {
    pub fn new(city_root: &Path) -> Self {
        Self {
            path: city_root.join(".gc").join("events.jsonl"),
        }
    }

    fn read_latest_seq_locked(file: &std::fs::File) -> Result<u64> {
        let reader = std::io::BufReader::new(file);
        let mut latest = 0u64;
        for line in reader.lines() {
            let line = line
                .map_err(|e| GcError::ProviderFailure(format!("reading events log: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(&line)
                .map_err(|e| GcError::ProviderFailure(format!("parsing event line: {}", e)))?;
            latest = latest.max(event.seq);
        }
        Ok(latest)
    }
}

#[async_trait]
impl EventsLog for NativeEventsLog {
    async fn append(&self, event: NewEvent) -> Result<Event> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GcError::ProviderFailure(format!("creating events dir: {}", e))
                })?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&path)
                .map_err(|e| GcError::ProviderFailure(format!("opening events log: {}", e)))?;
            file.lock_exclusive()
                .map_err(|e| GcError::ProviderFailure(format!("locking events log: {}", e)))?;

            let next_seq = NativeEventsLog::read_latest_seq_locked(&file)? + 1;
            let full = Event {
                seq: next_seq,
                kind: event.kind,
                actor: event.actor,
                subject: event.subject,
                message: event.message,
                payload: event.payload,
                timestamp: chrono::Utc::now(),
            };
            let line = serde_json::to_string(&full)
                .map_err(|e| GcError::ProviderFailure(format!("serializing event: {}", e)))?;
            writeln!(file, "{}", line)
                .map_err(|e| GcError::ProviderFailure(format!("appending event: {}", e)))?;
            file.unlock()
                .map_err(|e| GcError::ProviderFailure(format!("unlocking events log: {}", e)))?;
            Ok(full)
        })
        .await
        .map_err(|e| GcError::ProviderFailure(format!("events log task panicked: {}", e)))?
    }

    async fn latest_seq(&self) -> Result<u64> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let Ok(file) = std::fs::File::open(&path) else {
                return Ok(0);
            };
            file.lock_shared()
                .map_err(|e| GcError::ProviderFailure(format!("locking events log: {}", e)))?;
            let seq = NativeEventsLog::read_latest_seq_locked(&file)?;
            file.unlock()
                .map_err(|e| GcError::ProviderFailure(format!("unlocking events log: {}", e)))?;
            Ok(seq)
        })
        .await
        .map_err(|e| GcError::ProviderFailure(format!("events log task panicked: {}", e)))?
    }
}

#[derive(Default)]
struct FakeEventsState {
    events: Vec<Event>,
}

/// In-memory events log (§4.1): used pervasively in gate-evaluator and
/// dispatcher tests to exercise the race-free cursor snapshot (§4.7/§8).
#[derive(Clone, Default)]
pub struct FakeEventsLog {
    inner: Arc<Mutex<FakeEventsState>>,
}

impl FakeEventsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().events.clone()
    }
}

#[async_trait]
impl EventsLog for FakeEventsLog {
    async fn append(&self, event: NewEvent) -> Result<Event> {
        let mut inner = self.inner.lock();
        let seq = inner.events.last().map(|e| e.seq).unwrap_or(0) + 1;
        let full = Event {
            seq,
            kind: event.kind,
            actor: event.actor,
            subject: event.subject,
            message: event.message,
            payload: event.payload,
            timestamp: chrono::Utc::now(),
        };
        inner.events.push(full.clone());
        Ok(full)
    }

    async fn latest_seq(&self) -> Result<u64> {
        Ok(self.inner.lock().events.last().map(|e| e.seq).unwrap_or(0))
    }
}

/// In-memory test double: every operation fails (§4.1). `latest_seq`
/// still returns `0` per §4.3 ("when the provider cannot supply a
/// sequence... the evaluator treats `LatestSeq()` as `0`") rather than
/// erroring, so gate evaluation over a discard/failed sink degrades
/// gracefully instead of wedging the dispatcher.
#[derive(Clone, Copy, Default)]
pub struct FailEventsLog;

#[async_trait]
impl EventsLog for FailEventsLog {
    async fn append(&self, _event: NewEvent) -> Result<Event> {
        Err(GcError::ProviderFailure(
            "fail provider: events log operation always fails".to_string(),
        ))
    }

    async fn latest_seq(&self) -> Result<u64> {
        Ok(0)
    }
}

/// Exec-backed events log (§4.1/§6).
#[derive(Clone)]
pub struct ExecEventsLog {
    script: PathBuf,
    cwd: PathBuf,
    timeout: Duration,
}

impl ExecEventsLog {
    pub fn new(script: impl Into<PathBuf>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            script: script.into(),
            cwd: cwd.into(),
            timeout,
        }
    }
}

#[async_trait]
impl EventsLog for ExecEventsLog {
    async fn append(&self, event: NewEvent) -> Result<Event> {
        let mut args = vec![event.kind.clone(), event.actor.clone(), event.subject.clone()];
        if !event.message.is_empty() {
            args.push(format!("--message={}", event.message));
        }
        if let Some(payload) = &event.payload {
            args.push(format!("--payload={}", payload));
        }
        let out = crate::exec::run_exec_op(
            "events",
            &self.script,
            "emit",
            &args,
            &self.cwd,
            &[],
            self.timeout,
        )
        .await?;
        serde_json::from_str(&out)
            .map_err(|e| GcError::ProviderFailure(format!("parsing emitted event: {}", e)))
    }

    async fn latest_seq(&self) -> Result<u64> {
        let out = crate::exec::run_exec_op(
            "events",
            &self.script,
            "latest-seq",
            &[],
            &self.cwd,
            &[],
            self.timeout,
        )
        .await?;
        if out.is_empty() {
            return Ok(0);
        }
        out.parse()
            .map_err(|e| GcError::ProviderFailure(format!("parsing latest-seq output: {}", e)))
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
