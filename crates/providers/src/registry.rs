// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider registry (§4.1): environment variable > config field > default
//! resolution, and fresh construction of every provider per invocation
//! (§9 "no singletons").

use crate::beads::{BeadStore, ExecBeadStore, FailBeadStore, FakeBeadStore, NativeBeadStore};
use crate::events::{EventsLog, ExecEventsLog, FailEventsLog, FakeEventsLog, NativeEventsLog};
use crate::kind::ProviderKind;
use crate::mail::{ExecMailAdapter, FailMailAdapter, FakeMailAdapter, MailAdapter, NativeMailAdapter};
use crate::session::{
    ExecSessionAdapter, FailSessionAdapter, FakeSessionAdapter, NativeSessionAdapter,
    SessionAdapter,
};
use gc_core::DEFAULT_TIMEOUT;
use std::sync::Arc;

/// Resolve a provider's kind from env var > config value > default
/// (§4.1). `env_var` names the environment variable (`GC_SESSION`,
/// `GC_BEADS`, `GC_MAIL`, `GC_EVENTS`); `config_value` is the
/// corresponding `city.toml` field; `default` is the hard-coded fallback
/// (usually `ProviderKind::Native`, or `ProviderKind::Skip` for the bead
/// daemon lifecycle per §4.1/§6 `GC_DOLT=skip`).
pub fn resolve_provider_kind(
    env_var: &str,
    config_value: Option<&str>,
    default: ProviderKind,
) -> ProviderKind {
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return ProviderKind::parse(&value);
        }
    }
    if let Some(value) = config_value {
        if !value.is_empty() {
            return ProviderKind::parse(value);
        }
    }
    default
}

/// The four constructed provider trait objects for one invocation.
pub struct Providers {
    pub session: Arc<dyn SessionAdapter>,
    pub beads: Arc<dyn BeadStore>,
    pub events: Arc<dyn EventsLog>,
    pub mail: Arc<dyn MailAdapter>,
}

/// Builds [`Providers`] fresh from resolved kinds (§9: "every command
/// constructs its providers fresh").
pub struct ProviderRegistry {
    pub city_root: std::path::PathBuf,
    pub multiplexer_bin: String,
    pub bead_bin: std::path::PathBuf,
    pub mail_bin: std::path::PathBuf,
}

impl ProviderRegistry {
    pub fn new(city_root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            city_root: city_root.into(),
            multiplexer_bin: "tmux".to_string(),
            bead_bin: std::path::PathBuf::from("bd"),
            mail_bin: std::path::PathBuf::from("sendmail"),
        }
    }

    pub fn build(
        &self,
        session_kind: ProviderKind,
        beads_kind: ProviderKind,
        events_kind: ProviderKind,
        mail_kind: ProviderKind,
    ) -> Providers {
        Providers {
            session: self.build_session(session_kind),
            beads: self.build_beads(beads_kind),
            events: self.build_events(events_kind),
            mail: self.build_mail(mail_kind),
        }
    }

    fn build_session(&self, kind: ProviderKind) -> Arc<dyn SessionAdapter> {
        match kind {
            ProviderKind::Native | ProviderKind::Skip => {
                Arc::new(NativeSessionAdapter::new(self.multiplexer_bin.clone()))
            }
            ProviderKind::Fake => Arc::new(FakeSessionAdapter::new()),
            ProviderKind::Fail => Arc::new(FailSessionAdapter),
            ProviderKind::Exec(path) => Arc::new(ExecSessionAdapter::new(path, DEFAULT_TIMEOUT)),
        }
    }

    fn build_beads(&self, kind: ProviderKind) -> Arc<dyn BeadStore> {
        match kind {
            ProviderKind::Native | ProviderKind::Skip => Arc::new(NativeBeadStore::new(
                self.bead_bin.clone(),
                self.city_root.clone(),
                DEFAULT_TIMEOUT,
            )),
            ProviderKind::Fake => Arc::new(FakeBeadStore::new()),
            ProviderKind::Fail => Arc::new(FailBeadStore),
            ProviderKind::Exec(path) => Arc::new(ExecBeadStore::new(
                path,
                self.city_root.clone(),
                DEFAULT_TIMEOUT,
            )),
        }
    }

    fn build_events(&self, kind: ProviderKind) -> Arc<dyn EventsLog> {
        match kind {
            ProviderKind::Native | ProviderKind::Skip => {
                Arc::new(NativeEventsLog::new(&self.city_root))
            }
            ProviderKind::Fake => Arc::new(FakeEventsLog::new()),
            ProviderKind::Fail => Arc::new(FailEventsLog),
            ProviderKind::Exec(path) => Arc::new(ExecEventsLog::new(
                path,
                self.city_root.clone(),
                DEFAULT_TIMEOUT,
            )),
        }
    }

    fn build_mail(&self, kind: ProviderKind) -> Arc<dyn MailAdapter> {
        match kind {
            ProviderKind::Native | ProviderKind::Skip => {
                Arc::new(NativeMailAdapter::new(self.mail_bin.clone(), DEFAULT_TIMEOUT))
            }
            ProviderKind::Fake => Arc::new(FakeMailAdapter::new()),
            ProviderKind::Fail => Arc::new(FailMailAdapter),
            ProviderKind::Exec(path) => Arc::new(ExecMailAdapter::new(path, DEFAULT_TIMEOUT)),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
