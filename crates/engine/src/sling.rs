// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sling router (§4.9): routes a bead (or a freshly cooked wisp) to a
//! target agent's effective sling-query, batching over a container bead's
//! open children.

use crate::identity::{resolve_agent, ResolvedAgent};
use gc_core::{scoped_name, Agent, Bead, BeadId, GcError, DEFAULT_TIMEOUT};
use gc_formula::substitute_bead_id;
use gc_providers::{session_name, BeadStore, SessionAdapter};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

/// How the bead being slung was obtained (§4.9 steps 1-2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlingMethod {
    Bead(BeadId),
    Formula {
        formula: String,
        title: Option<String>,
        vars: Vec<(String, String)>,
    },
}

impl SlingMethod {
    fn label(&self) -> &'static str {
        match self {
            SlingMethod::Bead(_) => "bead",
            SlingMethod::Formula { .. } => "formula",
        }
    }
}

/// Which kind of target a sling was addressed to (§4.9 telemetry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlingTargetKind {
    Agent,
    Pool,
}

impl SlingTargetKind {
    fn as_str(&self) -> &'static str {
        match self {
            SlingTargetKind::Agent => "agent",
            SlingTargetKind::Pool => "pool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlingTarget {
    pub name: String,
    pub kind: SlingTargetKind,
}

/// The result of running one target bead through the sling query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlingAttempt {
    pub bead_id: BeadId,
    pub ok: bool,
    pub error: Option<String>,
}

/// The full outcome of one `sling_bead` call (§7: per-child error
/// counting, successes still reported).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlingOutcome {
    pub target: SlingTarget,
    pub root_bead: BeadId,
    pub attempts: Vec<SlingAttempt>,
}

impl SlingOutcome {
    pub fn routed_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.ok).count()
    }

    pub fn failed_count(&self) -> usize {
        self.attempts.iter().filter(|a| !a.ok).count()
    }
}

#[derive(Debug, Error)]
pub enum SlingError {
    #[error("sling target {0:?} not found")]
    TargetNotFound(String),
    #[error("no sling_query configured for target {0}")]
    NoSlingQuery(String),
    #[error("bead {0}: no open children to route to")]
    NoOpenChildren(BeadId),
    #[error(transparent)]
    Provider(#[from] GcError),
}

async fn run_sling_query(query: &str, timeout: Duration) -> Result<(), GcError> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(query);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => Err(GcError::ProviderFailure(format!(
            "sling query {:?}: {}",
            query,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Ok(Err(io_err)) => Err(GcError::ProviderFailure(format!(
            "sling query {:?}: {}",
            query, io_err
        ))),
        Err(_elapsed) => Err(GcError::Timeout(format!(
            "sling query {:?} timed out after {}s",
            query,
            timeout.as_secs()
        ))),
    }
}

/// Nudge the target's running session after routing (§4.9 step 5). For an
/// unqualified pool target, scans instances `1..=max` and nudges the first
/// running one; if none is running this is a warning, not a failure.
async fn nudge_target(
    resolved: &ResolvedAgent<'_>,
    city_name: &str,
    session_template: Option<&str>,
    session: &dyn SessionAdapter,
    message: &str,
) -> Result<(), GcError> {
    if resolved.instance.is_some() || !resolved.agent.is_pool() {
        let name = session_name(city_name, &resolved.instance_qualified_name(), session_template);
        return session.nudge(&name, message).await;
    }

    let max = resolved.agent.pool.map(|p| p.max).unwrap_or(0);
    for k in 1..=max {
        let instance_name = format!("{}-{}", resolved.agent.name, k);
        let qualified = scoped_name(&resolved.agent.dir, &instance_name);
        let session_nm = session_name(city_name, &qualified, session_template);
        if session.is_running(&session_nm).await.unwrap_or(false) {
            return session.nudge(&session_nm, message).await;
        }
    }
    warn!(target = %resolved.agent.qualified_name(), "no running pool instance to nudge");
    Ok(())
}

/// Route a bead (or newly cooked wisp) to a target agent (§4.9).
#[allow(clippy::too_many_arguments)]
pub async fn sling_bead(
    input: &str,
    rig_ctx: Option<&str>,
    agents: &[Agent],
    method: SlingMethod,
    force: bool,
    nudge: bool,
    city_name: &str,
    session_template: Option<&str>,
    beads: &dyn BeadStore,
    session: &dyn SessionAdapter,
) -> Result<SlingOutcome, SlingError> {
    let resolved =
        resolve_agent(agents, input, rig_ctx).ok_or_else(|| SlingError::TargetNotFound(input.to_string()))?;

    let pool_max_zero = resolved.agent.pool.is_some_and(|p| p.max == 0);
    if !force && (resolved.agent.suspended || pool_max_zero) {
        warn!(
            target = %resolved.agent.qualified_name(),
            suspended = resolved.agent.suspended,
            pool_max_zero,
            "slinging to a suspended or zero-capacity target"
        );
    }

    let method_label = method.label();
    let root_bead = match &method {
        SlingMethod::Bead(id) => id.clone(),
        SlingMethod::Formula { formula, title, vars } => {
            beads.mol_cook(formula, title.as_deref(), vars).await?
        }
    };

    let bead = beads.get(&root_bead).await?;
    let targets: Vec<Bead> = if beads.is_container_type(&bead.kind) {
        let children = beads.children(&root_bead).await?;
        let open: Vec<Bead> = children.into_iter().filter(|b| b.is_open()).collect();
        if open.is_empty() {
            return Err(SlingError::NoOpenChildren(root_bead));
        }
        open
    } else {
        vec![bead]
    };

    let sling_query = resolved
        .agent
        .sling_query
        .as_deref()
        .ok_or_else(|| SlingError::NoSlingQuery(resolved.agent.qualified_name()))?;

    let target_kind = if resolved.instance.is_none() && resolved.agent.is_pool() {
        SlingTargetKind::Pool
    } else {
        SlingTargetKind::Agent
    };
    let method_label = if targets.len() > 1 { "batch" } else { method_label };

    let mut attempts = Vec::with_capacity(targets.len());
    for target_bead in &targets {
        let query = substitute_bead_id(sling_query, target_bead.id.as_str());
        let result = run_sling_query(&query, DEFAULT_TIMEOUT).await;
        info!(
            target = %resolved.agent.qualified_name(),
            target_type = target_kind.as_str(),
            method = method_label,
            bead = %target_bead.id,
            ok = result.is_ok(),
            "sling attempt"
        );
        attempts.push(SlingAttempt {
            bead_id: target_bead.id.clone(),
            ok: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        });
    }

    if nudge {
        let message = format!("sling: {}", root_bead);
        if let Err(e) = nudge_target(&resolved, city_name, session_template, session, &message).await {
            warn!(target = %resolved.agent.qualified_name(), error = %e, "post-sling nudge failed");
        }
    }

    Ok(SlingOutcome {
        target: SlingTarget {
            name: resolved.agent.qualified_name(),
            kind: target_kind,
        },
        root_bead,
        attempts,
    })
}

#[cfg(test)]
#[path = "sling_tests.rs"]
mod tests;
