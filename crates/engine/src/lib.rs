// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gc-engine: identity resolution (§4.4), trigger scanning entry point
//! (§4.5), gate evaluation (§4.6), dispatch (§4.7), and sling routing
//! (§4.9).

pub mod dispatcher;
pub mod gate;
pub mod identity;
pub mod scan;
pub mod sling;

pub use dispatcher::{
    dispatch_now, dispatch_tick, DispatchOutcome, DispatchReport, DispatchedEntry, SkippedEntry,
};
pub use gate::{check_gate, cursor_for, last_run_for, GateOutcome};
pub use identity::{resolve_agent, resolve_rig_context, resolve_trigger, ResolvedAgent};
pub use scan::scan_all_triggers;
pub use sling::{
    sling_bead, SlingAttempt, SlingError, SlingMethod, SlingOutcome, SlingTarget, SlingTargetKind,
};
