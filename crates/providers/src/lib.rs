// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gc-providers: the provider registry (§4.1) and the four provider
//! contracts — session (§4.8), beads (§4.2), events (§4.3), mail — each
//! with native / fake / fail / exec implementations, plus the generic exec
//! wire protocol (§4.1/§6) and the scoped-acquisition RAII guard (§9).

pub mod beads;
pub mod events;
pub mod exec;
pub mod kind;
pub mod mail;
pub mod registry;
pub mod scoped;
pub mod session;

pub use beads::BeadStore;
pub use events::EventsLog;
pub use exec::run_exec_op;
pub use kind::ProviderKind;
pub use mail::MailAdapter;
pub use registry::{resolve_provider_kind, ProviderRegistry, Providers};
pub use scoped::ScopedProvider;
pub use session::{session_name, DrainState, SessionAdapter};

#[cfg(any(test, feature = "test-support"))]
pub use beads::{FailBeadStore, FakeBeadStore};
#[cfg(any(test, feature = "test-support"))]
pub use events::{FailEventsLog, FakeEventsLog};
#[cfg(any(test, feature = "test-support"))]
pub use mail::{FailMailAdapter, FakeMailAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use session::{FailSessionAdapter, FakeSessionAdapter};
