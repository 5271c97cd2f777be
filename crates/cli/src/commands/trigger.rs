// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared `plugin` / `automation` command surface (§6, §4.5/§4.6/§4.7):
//! both subcommands carry identical semantics (GLOSSARY), parameterized
//! here by [`gc_core::TriggerKind`] so the behavior is implemented once.

use crate::context::CliContext;
use crate::exit::{ExitError, WithCommand};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use gc_core::TriggerKind;
use gc_engine::{check_gate, dispatch_now, last_run_for, resolve_trigger, scan_all_triggers};

/// The `plugin`/`automation` subcommand shells, identical for both
/// (GLOSSARY) — `main` picks the [`TriggerKind`] to pass to [`handle`].
#[derive(Args)]
pub struct TriggerArgsWrapper {
    #[command(subcommand)]
    pub command: TriggerCommand,
}

#[derive(Subcommand)]
pub enum TriggerCommand {
    /// List every trigger visible from the current rig context
    List,
    /// Print one trigger's definition
    Show { name: String },
    /// Force-dispatch a trigger immediately, bypassing its gate
    Run { name: String },
    /// Exit 0 iff the trigger's gate currently evaluates due
    Check { name: String },
    /// Print the trigger's last dispatch time, if any
    History { name: String },
}

fn command_name(kind: TriggerKind, action: &str) -> String {
    format!("{} {}", kind.as_str(), action)
}

pub async fn handle(kind: TriggerKind, command: TriggerCommand, ctx: &CliContext) -> Result<()> {
    let triggers = scan_all_triggers(&ctx.city_root, &ctx.city_cfg);
    let triggers: Vec<_> = triggers.into_iter().filter(|t| t.kind == kind).collect();

    match command {
        TriggerCommand::List => {
            for t in &triggers {
                println!("{} [{}]", t.scoped_name(), t.gate);
            }
            Ok(())
        }

        TriggerCommand::Show { name } => {
            let t = resolve_trigger(&triggers, &name, ctx.rig_ctx.as_deref()).ok_or_else(|| {
                ExitError::new(command_name(kind, "show"), format!("{kind} {name:?} not found"))
            })?;
            println!("name: {}", t.scoped_name());
            println!("gate: {}", t.gate);
            if let Some(field) = t.timing_field() {
                println!("timing: {field}");
            }
            println!("run: {:?}", t.run);
            Ok(())
        }

        TriggerCommand::Run { name } => {
            let t = resolve_trigger(&triggers, &name, ctx.rig_ctx.as_deref())
                .cloned()
                .ok_or_else(|| {
                    ExitError::new(command_name(kind, "run"), format!("{kind} {name:?} not found"))
                })?;
            let providers = ctx.providers();
            let outcome = dispatch_now(
                &t,
                providers.beads.as_ref(),
                providers.events.as_ref(),
                &ctx.city_root,
            )
            .await;
            match outcome {
                gc_engine::DispatchOutcome::Dispatched(entry) => {
                    match entry.root {
                        Some(root) => println!("dispatched {} -> {}", entry.trigger, root),
                        None => println!("dispatched {}", entry.trigger),
                    }
                    Ok(())
                }
                gc_engine::DispatchOutcome::Skipped(skipped) => {
                    Err(ExitError::new(command_name(kind, "run"), skipped.reason).into())
                }
                gc_engine::DispatchOutcome::NotDue => {
                    Err(ExitError::new(command_name(kind, "run"), "trigger reported not due").into())
                }
            }
        }

        TriggerCommand::Check { name } => {
            let t = resolve_trigger(&triggers, &name, ctx.rig_ctx.as_deref()).ok_or_else(|| {
                ExitError::new(command_name(kind, "check"), format!("{kind} {name:?} not found"))
            })?;
            let providers = ctx.providers();
            let latest_seq = providers
                .events
                .latest_seq()
                .await
                .with_command(&command_name(kind, "check"))?;
            let outcome = check_gate(t, Utc::now(), providers.beads.as_ref(), latest_seq, &ctx.city_root)
                .await
                .with_command(&command_name(kind, "check"))?;
            println!("{}: {}", if outcome.due { "due" } else { "not-due" }, outcome.reason);
            if outcome.due {
                Ok(())
            } else {
                Err(ExitError::new(command_name(kind, "check"), outcome.reason).into())
            }
        }

        TriggerCommand::History { name } => {
            let t = resolve_trigger(&triggers, &name, ctx.rig_ctx.as_deref()).ok_or_else(|| {
                ExitError::new(command_name(kind, "history"), format!("{kind} {name:?} not found"))
            })?;
            let providers = ctx.providers();
            let last = last_run_for(providers.beads.as_ref(), kind, &t.scoped_name())
                .await
                .with_command(&command_name(kind, "history"))?;
            match last {
                Some(ts) => println!("last run: {ts}"),
                None => println!("last run: never"),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
