// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gc daemon (gcd)
//!
//! Background process that owns the dispatch controller loop (§5, §12):
//! on a fixed tick it rescans triggers, evaluates gates, and dispatches
//! due work; on a coarser interval it reconciles drained sessions (§4.8).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod controller;
mod env;
mod lifecycle;

use std::sync::Arc;

use gc_providers::{resolve_provider_kind, ProviderKind, ScopedProvider};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

use crate::controller::{ControllerConfig, ResolvedProviderKinds};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("gcd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("gcd {}", env!("CARGO_PKG_VERSION"));
                println!("gc daemon — controller loop driving the dispatcher and session drain reconciliation");
                println!();
                println!("USAGE:");
                println!("    gcd");
                println!();
                println!("The daemon reads GC_CITY for the workspace root (default: cwd),");
                println!("GC_TICK_MS for the dispatch interval, and GC_RECONCILE_MS for the");
                println!("drain reconciliation interval. It is typically started by `gc` and");
                println!("should not be invoked directly.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: gcd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let city_root = env::city_root();
    let log_guard = setup_logging(&city_root)?;

    info!(city_root = %city_root.display(), "starting gc daemon");

    let city_cfg = gc_formula::load_city_config(&city_root)?;
    let bead_script = resolve_provider_kind("GC_BEADS", city_cfg.beads.kind.as_deref(), ProviderKind::Native);
    let provider_kinds = ResolvedProviderKinds {
        session: resolve_provider_kind("GC_SESSION", city_cfg.session.kind.as_deref(), ProviderKind::Native),
        beads: bead_script.clone(),
        events: resolve_provider_kind("GC_EVENTS", city_cfg.events.kind.as_deref(), ProviderKind::Native),
        mail: resolve_provider_kind("GC_MAIL", city_cfg.mail.kind.as_deref(), ProviderKind::Native),
    };

    // Acquire the bead provider's external process once for the daemon's
    // lifetime (§9): per-tick `dispatch_once` only constructs stateless
    // trait-object handles, it does not start/stop the backing daemon.
    // `GC_DOLT=skip` (mapped to `ProviderKind::Skip` by the registry) and
    // in-memory kinds have no external process to warm up.
    let bead_guard = match &bead_script {
        ProviderKind::Exec(path) => {
            Some(ScopedProvider::acquire("beads", Some(path.clone()), city_root.clone(), gc_core::DEFAULT_TIMEOUT).await?)
        }
        _ => None,
    };

    let cfg = ControllerConfig {
        city_root: city_root.clone(),
        tick_interval: env::tick_interval(),
        reconcile_interval: env::reconcile_interval(),
        provider_kinds,
    };

    let shutdown = Arc::new(Notify::new());
    let controller_shutdown = Arc::clone(&shutdown);
    let controller_task = tokio::spawn(controller::run(cfg, controller_shutdown));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    shutdown.notify_waiters();
    if let Err(e) = controller_task.await {
        error!(error = %e, "controller task panicked");
    }

    if let Some(guard) = bead_guard {
        if let Err(e) = guard.release().await {
            error!(error = %e, "bead provider shutdown failed");
        }
    }

    info!("gc daemon stopped");
    drop(log_guard);
    Ok(())
}

fn setup_logging(
    city_root: &std::path::Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = env::log_path(city_root);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
