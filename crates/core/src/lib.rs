// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gc-core: data model and scoping primitives for the gc dispatch & gating
//! engine.

pub mod agent;
pub mod bead;
pub mod clock;
pub mod error;
pub mod event;
pub mod id;
pub mod rig;
pub mod scope;
pub mod trigger;

pub use agent::{Agent, PoolSpec};
pub use bead::{parse_seq_label, pool_label, run_label, seq_label, trigger_label, Bead, BeadId};
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{GcError, Result};
pub use event::{Event, NewEvent};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use rig::Rig;
pub use scope::{qualify_pool, scoped_name, scoped_trigger_name, split_scoped_name};
pub use trigger::{GateKind, RunTarget, Trigger, TriggerKind, DEFAULT_TIMEOUT};
