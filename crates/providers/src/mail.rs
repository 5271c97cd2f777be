// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail provider (§4.1): minimal, since spec.md leaves mail semantics
//! undetailed beyond "a provider kind" — kept symmetric with the other
//! three (native/fake/fail/exec).

use async_trait::async_trait;
use gc_core::{GcError, Result};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait MailAdapter: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Native mail adapter: shells a configurable sendmail-compatible binary.
#[derive(Clone)]
pub struct NativeMailAdapter {
    bin: PathBuf,
    timeout: Duration,
}

impl NativeMailAdapter {
    pub fn new(bin: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MailAdapter for NativeMailAdapter {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        crate::exec::run_exec_op(
            "mail",
            &self.bin,
            "send",
            &[to.to_string(), subject.to_string(), body.to_string()],
            &std::env::current_dir().unwrap_or_default(),
            &[],
            self.timeout,
        )
        .await
        .map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// In-memory test double: every send succeeds and is recorded (§4.1).
#[derive(Clone, Default)]
pub struct FakeMailAdapter {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl FakeMailAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MailAdapter for FakeMailAdapter {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.sent.lock().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// In-memory test double: every send fails (§4.1).
#[derive(Clone, Copy, Default)]
pub struct FailMailAdapter;

#[async_trait]
impl MailAdapter for FailMailAdapter {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
        Err(GcError::ProviderFailure(
            "fail provider: mail send always fails".to_string(),
        ))
    }
}

/// Exec-backed mail adapter (§4.1/§6).
#[derive(Clone)]
pub struct ExecMailAdapter {
    script: PathBuf,
    timeout: Duration,
}

impl ExecMailAdapter {
    pub fn new(script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            script: script.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MailAdapter for ExecMailAdapter {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        crate::exec::run_exec_op(
            "mail",
            &self.script,
            "send",
            &[to.to_string(), subject.to_string(), body.to_string()],
            &std::env::current_dir().unwrap_or_default(),
            &[],
            self.timeout,
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
