// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standard POSIX 5-field cron expression matching (§4.6, §9 Open Question
//! resolved: 5 fields — `minute hour day-of-month month day-of-week` — no
//! seconds field, evaluated in the city's local timezone captured at
//! process start).

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CronError {
    #[error("cron schedule {0:?} must have exactly 5 fields")]
    WrongFieldCount(String),
    #[error("invalid cron field {field:?} in {raw:?}")]
    InvalidField { raw: String, field: String },
}

/// A parsed 5-field cron schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    minute: FieldMatch,
    hour: FieldMatch,
    day_of_month: FieldMatch,
    month: FieldMatch,
    day_of_week: FieldMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldMatch {
    Any,
    Values(Vec<u32>),
}

impl FieldMatch {
    fn matches(&self, value: u32) -> bool {
        match self {
            FieldMatch::Any => true,
            FieldMatch::Values(values) => values.contains(&value),
        }
    }
}

fn parse_field(field: &str, min: u32, max: u32) -> Result<FieldMatch, CronError> {
    if field == "*" {
        return Ok(FieldMatch::Any);
    }
    let mut values = Vec::new();
    for part in field.split(',') {
        if let Some((start, step_str)) = part.split_once('/') {
            let step: u32 = step_str.parse().map_err(|_| CronError::InvalidField {
                raw: field.to_string(),
                field: part.to_string(),
            })?;
            let (lo, hi) = if start == "*" {
                (min, max)
            } else if let Some((a, b)) = start.split_once('-') {
                (
                    a.parse().map_err(|_| CronError::InvalidField {
                        raw: field.to_string(),
                        field: part.to_string(),
                    })?,
                    b.parse().map_err(|_| CronError::InvalidField {
                        raw: field.to_string(),
                        field: part.to_string(),
                    })?,
                )
            } else {
                let v: u32 = start.parse().map_err(|_| CronError::InvalidField {
                    raw: field.to_string(),
                    field: part.to_string(),
                })?;
                (v, max)
            };
            if step == 0 {
                return Err(CronError::InvalidField {
                    raw: field.to_string(),
                    field: part.to_string(),
                });
            }
            let mut v = lo;
            while v <= hi {
                values.push(v);
                v += step;
            }
        } else if let Some((a, b)) = part.split_once('-') {
            let lo: u32 = a.parse().map_err(|_| CronError::InvalidField {
                raw: field.to_string(),
                field: part.to_string(),
            })?;
            let hi: u32 = b.parse().map_err(|_| CronError::InvalidField {
                raw: field.to_string(),
                field: part.to_string(),
            })?;
            values.extend(lo..=hi);
        } else {
            let v: u32 = part.parse().map_err(|_| CronError::InvalidField {
                raw: field.to_string(),
                field: part.to_string(),
            })?;
            values.push(v);
        }
    }
    for v in &values {
        if *v < min || *v > max {
            return Err(CronError::InvalidField {
                raw: field.to_string(),
                field: v.to_string(),
            });
        }
    }
    Ok(FieldMatch::Values(values))
}

/// Parse a 5-field cron expression (`minute hour day-of-month month
/// day-of-week`).
pub fn parse_schedule(schedule: &str) -> Result<CronSchedule, CronError> {
    let fields: Vec<&str> = schedule.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(CronError::WrongFieldCount(schedule.to_string()));
    }
    Ok(CronSchedule {
        minute: parse_field(fields[0], 0, 59)?,
        hour: parse_field(fields[1], 0, 23)?,
        day_of_month: parse_field(fields[2], 1, 31)?,
        month: parse_field(fields[3], 1, 12)?,
        day_of_week: parse_field(fields[4], 0, 6)?,
    })
}

impl CronSchedule {
    /// Whether `now` (in local time) matches every field of this schedule.
    pub fn matches<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.minute.matches(now.minute())
            && self.hour.matches(now.hour())
            && self.day_of_month.matches(now.day())
            && self.month.matches(now.month())
            && self.day_of_week.matches(now.weekday().num_days_from_sunday())
    }
}

/// Whether a `cron` gate is due (§4.6): `now` matches `schedule` **and** no
/// run with identical minute occurred (`last_run_minute` is the minute
/// bucket — `now` truncated to the minute — of the most recent run, if any).
pub fn cron_due<Tz: TimeZone>(
    now: &DateTime<Tz>,
    schedule: &CronSchedule,
    last_run_minute: Option<DateTime<Tz>>,
) -> bool {
    if !schedule.matches(now) {
        return false;
    }
    match last_run_minute {
        Some(last) => !same_minute(now, &last),
        None => true,
    }
}

fn same_minute<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year()
        && a.month() == b.month()
        && a.day() == b.day()
        && a.hour() == b.hour()
        && a.minute() == b.minute()
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
