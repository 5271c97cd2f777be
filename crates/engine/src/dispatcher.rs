// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher (§4.7): cooks a wisp for every due trigger and stamps the
//! routing labels the sling router and gate evaluator later read back.

use crate::gate::check_gate;
use chrono::{DateTime, Utc};
use gc_core::{
    pool_label, qualify_pool, run_label, seq_label, trigger_label, BeadId, GcError, Result,
    RunTarget, Trigger,
};
use gc_providers::{BeadStore, EventsLog};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::warn;

/// A trigger that was due and dispatched this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEntry {
    pub trigger: String,
    /// The cooked molecule's root bead id; `None` for exec triggers, which
    /// have no bead (§4.7).
    pub root: Option<BeadId>,
}

/// A trigger that was due but could not be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub trigger: String,
    pub reason: String,
}

/// The outcome of attempting to dispatch one trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched(DispatchedEntry),
    Skipped(SkippedEntry),
    NotDue,
}

/// A full tick's results (§4.7: "not persisted... for CLI/daemon
/// consumption").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub dispatched: Vec<DispatchedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl DispatchReport {
    pub fn dispatched_count(&self) -> usize {
        self.dispatched.len()
    }
}

async fn run_exec_trigger(script: &Path, cwd: &Path, timeout: Duration) -> Result<()> {
    let automation_dir = script
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut cmd = Command::new(script);
    cmd.current_dir(cwd).env("AUTOMATION_DIR", automation_dir);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => Err(GcError::ProviderFailure(format!(
            "exec trigger {:?}: {}",
            script,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Ok(Err(io_err)) => Err(GcError::ProviderFailure(format!(
            "exec trigger {:?}: {}",
            script, io_err
        ))),
        Err(_elapsed) => Err(GcError::Timeout(format!(
            "exec trigger {:?} timed out after {}s",
            script,
            timeout.as_secs()
        ))),
    }
}

/// Dispatch a single trigger already known to be due (§4.7 steps 1-5).
async fn dispatch_one(
    trigger: &Trigger,
    head_seq: Option<u64>,
    beads: &dyn BeadStore,
    exec_cwd: &Path,
) -> DispatchOutcome {
    let scoped = trigger.scoped_name();

    let formula = match &trigger.run {
        RunTarget::Exec(script) => {
            return match run_exec_trigger(script, exec_cwd, trigger.timeout_or_default()).await {
                Ok(()) => DispatchOutcome::Dispatched(DispatchedEntry {
                    trigger: scoped,
                    root: None,
                }),
                Err(e) => {
                    warn!(trigger = %scoped, error = %e, "exec trigger failed");
                    DispatchOutcome::Skipped(SkippedEntry {
                        trigger: scoped,
                        reason: e.to_string(),
                    })
                }
            };
        }
        RunTarget::Formula(f) => f,
    };

    let root_id = match beads.mol_cook(formula, None, &[]).await {
        Ok(id) => id,
        Err(e) => {
            warn!(trigger = %scoped, error = %e, "mol_cook failed, skipping trigger");
            return DispatchOutcome::Skipped(SkippedEntry {
                trigger: scoped,
                reason: e.to_string(),
            });
        }
    };

    let mut labels = vec![run_label(trigger.kind, &scoped)];
    if let Some(head) = head_seq {
        labels.push(trigger_label(trigger.kind, &scoped));
        labels.push(seq_label(head));
    }
    if let Some(pool) = &trigger.pool {
        labels.push(pool_label(&qualify_pool(pool, &trigger.rig)));
    }

    if let Err(e) = beads.update(&root_id, &labels).await {
        warn!(trigger = %scoped, error = %e, "label update failed, skipping trigger");
        return DispatchOutcome::Skipped(SkippedEntry {
            trigger: scoped,
            reason: e.to_string(),
        });
    }

    DispatchOutcome::Dispatched(DispatchedEntry {
        trigger: scoped,
        root: Some(root_id),
    })
}

/// Dispatch `trigger` immediately, bypassing its gate (`plugin run` /
/// `automation run`, §6 — the manual counterpart of a tick's auto-dispatch,
/// also usable to force-fire a non-manual trigger). Event gates still
/// capture `headSeq` race-free per §4.7 step 1.
pub async fn dispatch_now(
    trigger: &Trigger,
    beads: &dyn BeadStore,
    events: &dyn EventsLog,
    exec_cwd: &Path,
) -> DispatchOutcome {
    let head_seq = if matches!(trigger.gate, gc_core::GateKind::Event) {
        match events.latest_seq().await {
            Ok(seq) => Some(seq),
            Err(e) => {
                warn!(trigger = %trigger.scoped_name(), error = %e, "latest_seq failed, skipping trigger");
                return DispatchOutcome::Skipped(SkippedEntry {
                    trigger: trigger.scoped_name(),
                    reason: e.to_string(),
                });
            }
        }
    } else {
        None
    };

    dispatch_one(trigger, head_seq, beads, exec_cwd).await
}

/// Evaluate every trigger's gate and dispatch those found due, serially, in
/// the order given (§4.7, §5: "serially to preserve ordering of
/// event-cursor snapshots").
pub async fn dispatch_tick(
    triggers: &[Trigger],
    now: DateTime<Utc>,
    beads: &dyn BeadStore,
    events: &dyn EventsLog,
    exec_cwd: &Path,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for trigger in triggers {
        // Race-free cursor capture (§4.7 step 1): for event gates this one
        // read is both the due-check's `LatestSeq()` and the `headSeq`
        // later stamped on the cooked wisp — it is never read a second
        // time after this point in the same trigger's processing.
        let latest_seq = if matches!(trigger.gate, gc_core::GateKind::Event) {
            match events.latest_seq().await {
                Ok(seq) => seq,
                Err(e) => {
                    warn!(trigger = %trigger.scoped_name(), error = %e, "latest_seq failed, skipping trigger");
                    report.skipped.push(SkippedEntry {
                        trigger: trigger.scoped_name(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            }
        } else {
            0
        };

        let gate_outcome = match check_gate(trigger, now, beads, latest_seq, exec_cwd).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(trigger = %trigger.scoped_name(), error = %e, "gate evaluation failed, skipping trigger");
                report.skipped.push(SkippedEntry {
                    trigger: trigger.scoped_name(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !gate_outcome.due {
            continue;
        }

        let head_seq = matches!(trigger.gate, gc_core::GateKind::Event).then_some(latest_seq);

        match dispatch_one(trigger, head_seq, beads, exec_cwd).await {
            DispatchOutcome::Dispatched(entry) => report.dispatched.push(entry),
            DispatchOutcome::Skipped(entry) => report.skipped.push(entry),
            DispatchOutcome::NotDue => {}
        }
    }

    report
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
