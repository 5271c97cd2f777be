// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared CLI context: loading `city.toml`, resolving the active rig
//! (§4.4), and building providers fresh for a single invocation (§9: "no
//! singletons — every command constructs its providers fresh").

use gc_core::{Agent, Rig};
use gc_daemon::ResolvedProviderKinds;
use gc_formula::CityConfig;
use gc_providers::{ProviderKind, ProviderRegistry, Providers};
use std::path::PathBuf;

/// Everything a command handler needs about the active workspace.
pub struct CliContext {
    pub city_root: PathBuf,
    pub city_cfg: CityConfig,
    pub rig_ctx: Option<String>,
    pub provider_kinds: ResolvedProviderKinds,
}

fn city_root() -> PathBuf {
    std::env::var("GC_CITY")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_default())
}

impl CliContext {
    /// Load `city.toml` from `GC_CITY` (or the current directory) and
    /// resolve the active rig context from `GC_DIR`/cwd (§4.4).
    pub fn load() -> anyhow::Result<Self> {
        let city_root = city_root();
        let city_cfg = gc_formula::load_city_config(&city_root)?;

        let rigs: Vec<Rig> = city_cfg.rigs.iter().cloned().map(Rig::from).collect();
        let gc_dir = std::env::var("GC_DIR").ok();
        let cwd = std::env::current_dir().unwrap_or_else(|_| city_root.clone());
        let rig_ctx = gc_engine::resolve_rig_context(&rigs, gc_dir.as_deref(), &cwd)
            .map(|r| r.name.clone());

        let provider_kinds = ResolvedProviderKinds {
            session: gc_providers::resolve_provider_kind(
                "GC_SESSION",
                city_cfg.session.kind.as_deref(),
                ProviderKind::Native,
            ),
            beads: gc_providers::resolve_provider_kind(
                "GC_BEADS",
                city_cfg.beads.kind.as_deref(),
                ProviderKind::Native,
            ),
            events: gc_providers::resolve_provider_kind(
                "GC_EVENTS",
                city_cfg.events.kind.as_deref(),
                ProviderKind::Native,
            ),
            mail: gc_providers::resolve_provider_kind(
                "GC_MAIL",
                city_cfg.mail.kind.as_deref(),
                ProviderKind::Native,
            ),
        };

        Ok(Self {
            city_root,
            city_cfg,
            rig_ctx,
            provider_kinds,
        })
    }

    pub fn agents(&self) -> Vec<Agent> {
        self.city_cfg.agents.iter().cloned().map(Agent::from).collect()
    }

    pub fn city_name(&self) -> String {
        self.city_cfg
            .workspace
            .name
            .clone()
            .unwrap_or_else(|| "city".to_string())
    }

    /// Build every provider fresh for this one command invocation (§9).
    pub fn providers(&self) -> Providers {
        ProviderRegistry::new(self.city_root.clone()).build(
            self.provider_kinds.session.clone(),
            self.provider_kinds.beads.clone(),
            self.provider_kinds.events.clone(),
            self.provider_kinds.mail.clone(),
        )
    }

    pub fn save(&self) -> anyhow::Result<()> {
        gc_formula::save_city_config(&self.city_root, &self.city_cfg)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
