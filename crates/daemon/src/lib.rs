// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gc-daemon library surface.
//!
//! This crate is consumed two ways: the `gcd` binary (`src/main.rs`) owns
//! its own private copies of the tick-loop modules, the way `oj-daemon`'s
//! binary owns its listener/event-bus internals; the library exposes only
//! the small contract the `gc` CLI needs to resolve provider kinds the
//! same way the daemon does, mirroring how `oj-daemon`'s lib surface
//! exposes just its wire `protocol` types to CLI clients.

pub mod controller;
mod env;
mod lifecycle;

pub use controller::ResolvedProviderKinds;
