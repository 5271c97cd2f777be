// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gc-formula: `city.toml`/trigger-file parsing, layered directory
//! scanning, template interpolation, and cron matching.

pub mod city_config;
pub mod cron;
pub mod interval;
pub mod scanner;
pub mod template;
pub mod trigger_file;

pub use city_config::{
    load_city_config, save_city_config, AgentEntry, CityConfig, CityConfigError, FormulaLayers,
    ProviderSection, RigEntry, WorkspaceSection,
};
pub use cron::{cron_due, parse_schedule, CronError, CronSchedule};
pub use interval::{parse_interval, IntervalError};
pub use scanner::{scan_triggers, RigContext};
pub use template::{interpolate, substitute_bead_id};
pub use trigger_file::{kind_for_path, load_trigger_file, parse_trigger_file, TriggerFileError};
