// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller tick loop (§5, §12): drives the dispatcher and drain
//! reconciliation on independent fixed intervals, the way the teacher's
//! engine loop drives its timer checks and background reconciliation off
//! one `tokio::select!`.

use crate::env;
use crate::lifecycle::{reconcile_drain, ReconcileReport};
use gc_core::{Agent, Clock, GcError, Result, SystemClock};
use gc_engine::{dispatch_tick, scan_all_triggers, DispatchReport};
use gc_formula::load_city_config;
use gc_providers::{ProviderKind, ProviderRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Provider kinds resolved once at startup (§4.1 env > config > default);
/// re-resolved every tick would let a mid-flight env var change swap
/// providers under a running dispatch, which spec.md does not call for.
#[derive(Debug, Clone)]
pub struct ResolvedProviderKinds {
    pub session: ProviderKind,
    pub beads: ProviderKind,
    pub events: ProviderKind,
    pub mail: ProviderKind,
}

/// Everything the controller needs to run ticks against one city.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub city_root: PathBuf,
    pub tick_interval: Duration,
    pub reconcile_interval: Duration,
    pub provider_kinds: ResolvedProviderKinds,
}

fn invalid(e: impl std::fmt::Display) -> GcError {
    GcError::InvalidInput(e.to_string())
}

/// One dispatch tick: reload `city.toml`, rescan triggers (§3 "recomputed
/// each tick, never persisted"), build providers fresh (§9 "no
/// singletons"), and run the dispatcher.
pub async fn dispatch_once(cfg: &ControllerConfig) -> Result<DispatchReport> {
    let city_cfg = load_city_config(&cfg.city_root).map_err(invalid)?;
    let triggers = scan_all_triggers(&cfg.city_root, &city_cfg);
    let registry = ProviderRegistry::new(cfg.city_root.clone());
    let providers = registry.build(
        cfg.provider_kinds.session.clone(),
        cfg.provider_kinds.beads.clone(),
        cfg.provider_kinds.events.clone(),
        cfg.provider_kinds.mail.clone(),
    );
    let now = gc_core::SystemClock.now();
    Ok(dispatch_tick(
        &triggers,
        now,
        providers.beads.as_ref(),
        providers.events.as_ref(),
        &cfg.city_root,
    )
    .await)
}

/// One drain reconciliation pass over every registered agent's session.
pub async fn reconcile_once(cfg: &ControllerConfig) -> Result<ReconcileReport> {
    let city_cfg = load_city_config(&cfg.city_root).map_err(invalid)?;
    let city_name = city_cfg
        .workspace
        .name
        .clone()
        .unwrap_or_else(|| "city".to_string());
    let agents: Vec<Agent> = city_cfg.agents.into_iter().map(Agent::from).collect();
    let registry = ProviderRegistry::new(cfg.city_root.clone());
    let providers = registry.build(
        cfg.provider_kinds.session.clone(),
        cfg.provider_kinds.beads.clone(),
        cfg.provider_kinds.events.clone(),
        cfg.provider_kinds.mail.clone(),
    );
    Ok(reconcile_drain(&agents, &city_name, None, providers.session.as_ref()).await)
}

/// Run the controller until `shutdown` is notified. Dispatch and
/// reconciliation fire on independent intervals; `GC_SUSPENDED=1` (§6)
/// skips dispatch ticks but not reconciliation, so draining sessions still
/// wind down while the city is suspended.
pub async fn run(cfg: ControllerConfig, shutdown: Arc<Notify>) {
    let mut tick = tokio::time::interval(cfg.tick_interval);
    let mut reconcile = tokio::time::interval(cfg.reconcile_interval);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if env::city_suspended() {
                    debug!("city suspended (GC_SUSPENDED=1), skipping dispatch tick");
                    continue;
                }
                match dispatch_once(&cfg).await {
                    Ok(report) => {
                        if report.dispatched_count() > 0 || !report.skipped.is_empty() {
                            info!(
                                dispatched = report.dispatched_count(),
                                skipped = report.skipped.len(),
                                "dispatch tick complete"
                            );
                        }
                    }
                    Err(e) => warn!(error = %e, "dispatch tick failed"),
                }
            }

            _ = reconcile.tick() => {
                match reconcile_once(&cfg).await {
                    Ok(report) => {
                        if !report.stopped.is_empty() {
                            info!(stopped = report.stopped.len(), "drain reconciliation complete");
                        }
                    }
                    Err(e) => warn!(error = %e, "drain reconciliation failed"),
                }
            }

            _ = shutdown.notified() => {
                info!("controller stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
