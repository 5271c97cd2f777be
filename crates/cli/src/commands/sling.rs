// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sling` (§6, §4.9): route a bead, or a freshly cooked formula wisp, to
//! a target agent's sling query.

use crate::commands::parse_key_value;
use crate::context::CliContext;
use crate::exit::{ExitError, WithCommand};
use anyhow::Result;
use clap::Args;
use gc_core::BeadId;
use gc_engine::{sling_bead, SlingMethod};

#[derive(Args)]
pub struct SlingArgs {
    /// Agent or pool to route to, bare or `dir/name` qualified
    pub target: String,
    /// Existing bead id to route (mutually exclusive with `--formula`)
    #[arg(long, conflicts_with = "formula")]
    pub bead: Option<String>,
    /// Formula to cook a fresh wisp from (mutually exclusive with `--bead`)
    #[arg(long, conflicts_with = "bead")]
    pub formula: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// Molecule variable `key=value`, repeatable
    #[arg(long = "var", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,
    /// Route even if the target is suspended or a zero-capacity pool
    #[arg(long)]
    pub force: bool,
    /// Nudge the target's running session after routing
    #[arg(long)]
    pub nudge: bool,
}

pub async fn handle(args: SlingArgs, ctx: &CliContext) -> Result<()> {
    let method = match (args.bead, args.formula) {
        (Some(bead), None) => SlingMethod::Bead(BeadId::new(bead)),
        (None, Some(formula)) => SlingMethod::Formula {
            formula,
            title: args.title,
            vars: args.vars,
        },
        _ => {
            return Err(ExitError::new("sling", "exactly one of --bead or --formula is required").into());
        }
    };

    let agents = ctx.agents();
    let providers = ctx.providers();

    let outcome = sling_bead(
        &args.target,
        ctx.rig_ctx.as_deref(),
        &agents,
        method,
        args.force,
        args.nudge,
        &ctx.city_name(),
        None,
        providers.beads.as_ref(),
        providers.session.as_ref(),
    )
    .await
    .with_command("sling")?;

    println!(
        "slung {} ({}) -> {} attempt(s), {} failed",
        outcome.root_bead,
        outcome.target.name,
        outcome.attempts.len(),
        outcome.failed_count()
    );
    for attempt in &outcome.attempts {
        if !attempt.ok {
            eprintln!(
                "gc sling: {} failed: {}",
                attempt.bead_id,
                attempt.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if outcome.failed_count() > 0 {
        return Err(ExitError::new(
            "sling",
            format!("{} of {} routes failed", outcome.failed_count(), outcome.attempts.len()),
        )
        .into());
    }

    Ok(())
}

#[cfg(test)]
#[path = "sling_tests.rs"]
mod tests;
