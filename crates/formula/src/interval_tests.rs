// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_hours() {
    assert_eq!(parse_interval("24h").unwrap(), Duration::from_secs(86400));
}

#[test]
fn parses_minutes_seconds_days() {
    assert_eq!(parse_interval("90m").unwrap(), Duration::from_secs(5400));
    assert_eq!(parse_interval("30s").unwrap(), Duration::from_secs(30));
    assert_eq!(parse_interval("2d").unwrap(), Duration::from_secs(172800));
}

#[test]
fn rejects_missing_unit() {
    assert!(parse_interval("24").is_err());
}

#[test]
fn rejects_unknown_unit() {
    assert!(parse_interval("24w").is_err());
}

#[test]
fn rejects_non_numeric_magnitude() {
    assert!(parse_interval("xh").is_err());
}
