// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session drain reconciliation (§4.8): a periodic pass over every known
//! agent session that calls `Stop` once the session has acknowledged a
//! drain request, grounded on the teacher's reconciliation-pass shape
//! (`oj-daemon::lifecycle::reconcile_state` walking persisted state and
//! issuing follow-up actions for each entity found in a terminal
//! sub-state).

use gc_core::{scoped_name, Agent};
use gc_providers::{session_name, DrainState, SessionAdapter};
use tracing::{info, warn};

/// One session the reconciliation pass acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledSession {
    pub session: String,
    pub agent: String,
}

/// The result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub stopped: Vec<ReconciledSession>,
    pub errors: Vec<(String, String)>,
}

/// Every session name a registered agent can occupy: the agent's own
/// session for a non-pool agent, or every instance `1..=max` for a pool
/// (§3 "pool" semantics).
fn session_names_for(agent: &Agent, city_name: &str, session_template: Option<&str>) -> Vec<String> {
    match agent.pool {
        Some(pool) => (1..=pool.max)
            .map(|k| {
                let instance_name = format!("{}-{}", agent.name, k);
                let qualified = scoped_name(&agent.dir, &instance_name);
                session_name(city_name, &qualified, session_template)
            })
            .collect(),
        None => vec![session_name(city_name, &agent.qualified_name(), session_template)],
    }
}

/// Poll every known agent's session environment and call `Stop` on any
/// session that has reached `DrainAcked` (§4.8: `Draining → DrainAcked →
/// Absent`). Sessions that are `Absent`, `Running`, or still `Draining`
/// are left alone. Per-session errors are recorded but do not abort the
/// pass (§7: one broken session must not stall the rest of the fleet).
pub async fn reconcile_drain(
    agents: &[Agent],
    city_name: &str,
    session_template: Option<&str>,
    session: &dyn SessionAdapter,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for agent in agents {
        for session_nm in session_names_for(agent, city_name, session_template) {
            let state = match session.drain_state(&session_nm).await {
                Ok(state) => state,
                Err(e) => {
                    warn!(session = %session_nm, error = %e, "drain reconciliation: could not read session state");
                    report.errors.push((session_nm.clone(), e.to_string()));
                    continue;
                }
            };

            if state != DrainState::DrainAcked {
                continue;
            }

            match session.stop(&session_nm).await {
                Ok(()) => {
                    info!(session = %session_nm, agent = %agent.qualified_name(), "reconciled drain-acked session");
                    report.stopped.push(ReconciledSession {
                        session: session_nm,
                        agent: agent.qualified_name(),
                    });
                }
                Err(e) => {
                    warn!(session = %session_nm, error = %e, "drain reconciliation: stop failed");
                    report.errors.push((session_nm, e.to_string()));
                }
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
