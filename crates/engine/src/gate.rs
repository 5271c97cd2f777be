// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate evaluator (§4.6): given a trigger, the current time, bead-store
//! history, and the events provider, decide whether a trigger is due.

use chrono::{DateTime, Utc};
use gc_core::{
    parse_seq_label, run_label, trigger_label, GateKind, GcError, Result, Trigger,
};
use gc_providers::BeadStore;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// The outcome of evaluating one trigger's gate (§4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub due: bool,
    pub reason: String,
}

impl GateOutcome {
    fn due(reason: impl Into<String>) -> Self {
        Self {
            due: true,
            reason: reason.into(),
        }
    }

    fn not_due(reason: impl Into<String>) -> Self {
        Self {
            due: false,
            reason: reason.into(),
        }
    }
}

/// Query bead history for the most recent `*-run:<scoped>` label,
/// returning that bead's `created_at` (§4.6 `lastRunFn`).
pub async fn last_run_for(
    beads: &dyn BeadStore,
    kind: gc_core::TriggerKind,
    scoped: &str,
) -> Result<Option<DateTime<Utc>>> {
    let label = run_label(kind, scoped);
    let matches = beads.list_by_label(&label, 1).await?;
    Ok(matches.into_iter().next().map(|b| b.created_at))
}

/// The maximum `seq:` label observed on beads labeled with the trigger's
/// scoped name (§4.6 `cursorFn`).
pub async fn cursor_for(
    beads: &dyn BeadStore,
    kind: gc_core::TriggerKind,
    scoped: &str,
) -> Result<u64> {
    let label = trigger_label(kind, scoped);
    let matches = beads.list_by_label(&label, 0).await?;
    Ok(matches
        .iter()
        .flat_map(|b| b.labels.iter())
        .filter_map(|l| parse_seq_label(l))
        .max()
        .unwrap_or(0))
}

async fn run_shell_check(check: &str, cwd: &Path, timeout: Duration) -> Result<bool> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(check).current_dir(cwd);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output.status.success()),
        Ok(Err(io_err)) => Err(GcError::ProviderFailure(format!(
            "check {:?}: {}",
            check, io_err
        ))),
        Err(_elapsed) => Err(GcError::Timeout(format!(
            "check {:?} timed out after {}s",
            check,
            timeout.as_secs()
        ))),
    }
}

/// `CheckGate(t, now, lastRunFn, eventsProvider, cursorFn) -> {Due,
/// Reason}` (§4.6). `exec_cwd` is the working directory `check` commands
/// run in (§5: `cwd="."` for exec triggers, similarly here).
///
/// `latest_seq` is the events provider's `LatestSeq()`, read exactly once
/// by the caller (§4.7: the dispatcher reuses this same read as the
/// race-free `headSeq` it stamps on the cooked wisp, rather than reading
/// `LatestSeq()` a second time after this call returns).
pub async fn check_gate(
    trigger: &Trigger,
    now: DateTime<Utc>,
    beads: &dyn BeadStore,
    latest_seq: u64,
    exec_cwd: &Path,
) -> Result<GateOutcome> {
    let scoped = trigger.scoped_name();

    match trigger.gate {
        GateKind::Manual => Ok(GateOutcome::not_due(
            "manual gate is never auto-dispatched",
        )),

        GateKind::Cooldown => {
            let interval_str = trigger.timing_field().ok_or_else(|| {
                GcError::InvalidInput(format!(
                    "trigger {}: cooldown gate missing interval",
                    trigger.name
                ))
            })?;
            let interval = gc_formula::parse_interval(interval_str)
                .map_err(|e| GcError::InvalidInput(e.to_string()))?;
            match last_run_for(beads, trigger.kind, &scoped).await? {
                None => Ok(GateOutcome::due("no previous run")),
                Some(last) => {
                    let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
                    if elapsed >= interval {
                        Ok(GateOutcome::due(format!(
                            "elapsed {}s >= interval {}s",
                            elapsed.as_secs(),
                            interval.as_secs()
                        )))
                    } else {
                        Ok(GateOutcome::not_due(format!(
                            "elapsed {}s < interval {}s",
                            elapsed.as_secs(),
                            interval.as_secs()
                        )))
                    }
                }
            }
        }

        GateKind::Cron => {
            let schedule_str = trigger.timing_field().ok_or_else(|| {
                GcError::InvalidInput(format!(
                    "trigger {}: cron gate missing schedule",
                    trigger.name
                ))
            })?;
            let schedule = gc_formula::parse_schedule(schedule_str)
                .map_err(|e| GcError::InvalidInput(e.to_string()))?;
            let last = last_run_for(beads, trigger.kind, &scoped).await?;
            let due = gc_formula::cron_due(&now, &schedule, last);
            if due {
                Ok(GateOutcome::due("schedule matches, no run this minute"))
            } else {
                Ok(GateOutcome::not_due(
                    "schedule does not match, or already ran this minute",
                ))
            }
        }

        GateKind::Check => {
            let check_cmd = trigger.timing_field().ok_or_else(|| {
                GcError::InvalidInput(format!("trigger {}: check gate missing command", trigger.name))
            })?;
            match run_shell_check(check_cmd, exec_cwd, trigger.timeout_or_default()).await {
                Ok(true) => Ok(GateOutcome::due("check exited 0")),
                Ok(false) => Ok(GateOutcome::not_due("check exited non-zero")),
                Err(GcError::Timeout(_)) => Ok(GateOutcome::not_due("check timed out")),
                Err(e) => Err(e),
            }
        }

        GateKind::Event => {
            let cursor = cursor_for(beads, trigger.kind, &scoped).await?;
            if latest_seq > cursor {
                Ok(GateOutcome::due(format!("new={}", latest_seq - cursor)))
            } else {
                Ok(GateOutcome::not_due("new=0"))
            }
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
