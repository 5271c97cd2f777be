// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooldown `interval` string parsing (§3/§4.6): `"24h"`, `"90m"`, `"30s"`,
//! `"2d"` — an integer magnitude followed by a single unit suffix.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntervalError {
    #[error("invalid interval {0:?}: expected <number><s|m|h|d>")]
    Malformed(String),
}

/// Parse an interval string into a [`Duration`].
pub fn parse_interval(raw: &str) -> Result<Duration, IntervalError> {
    let raw = raw.trim();
    let unit = raw
        .chars()
        .last()
        .ok_or_else(|| IntervalError::Malformed(raw.to_string()))?;
    let (magnitude_str, multiplier) = match unit {
        's' => (&raw[..raw.len() - 1], 1u64),
        'm' => (&raw[..raw.len() - 1], 60),
        'h' => (&raw[..raw.len() - 1], 3600),
        'd' => (&raw[..raw.len() - 1], 86400),
        _ => return Err(IntervalError::Malformed(raw.to_string())),
    };
    let magnitude: u64 = magnitude_str
        .parse()
        .map_err(|_| IntervalError::Malformed(raw.to_string()))?;
    Ok(Duration::from_secs(magnitude * multiplier))
}

#[cfg(test)]
#[path = "interval_tests.rs"]
mod tests;
