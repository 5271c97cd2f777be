// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agent` management commands (§6, §4.8): add/list/attach/kill/suspend/
//! resume/nudge/peek/drain/undrain/drain-check/drain-ack.

use crate::context::CliContext;
use crate::exit::{ExitError, WithCommand};
use anyhow::Result;
use clap::{Args, Subcommand};
use gc_core::{scoped_name, split_scoped_name, PoolSpec};
use gc_formula::AgentEntry;
use gc_providers::session_name;

#[derive(Args)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: AgentCommand,
}

#[derive(Subcommand)]
pub enum AgentCommand {
    /// Register a new agent, optionally qualified as `dir/name`
    Add {
        name: String,
        /// Rig directory this agent is scoped to, overriding any `dir/`
        /// prefix parsed from `name`
        #[arg(long)]
        dir: Option<String>,
        #[arg(long)]
        prompt_template: Option<String>,
        #[arg(long)]
        suspended: bool,
        #[arg(long)]
        pool_min: Option<u32>,
        #[arg(long)]
        pool_max: Option<u32>,
        #[arg(long)]
        sling_query: Option<String>,
    },
    /// List registered agents
    List,
    /// Attach to a running agent's session
    Attach { name: String },
    /// Stop an agent's session immediately, bypassing drain
    Kill { name: String },
    /// Mark an agent suspended (idempotent)
    Suspend { name: String },
    /// Clear an agent's suspended flag (idempotent)
    Resume { name: String },
    /// Send a line of text into an agent's session
    Nudge { name: String, text: String },
    /// Capture recent output from an agent's session
    Peek {
        name: String,
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: u32,
    },
    /// Signal an agent's session to wind down gracefully
    Drain { name: String },
    /// Clear a pending drain signal
    Undrain { name: String },
    /// Exit 0 iff the agent's session has an active drain signal
    DrainCheck { name: String },
    /// Acknowledge a drain signal from inside the agent's own session
    DrainAck { name: String },
}

/// A resolved target, detached from the borrowed agent slice so it can
/// outlive the short-lived `Vec<Agent>` each `ctx.agents()` call produces.
struct ResolvedTarget {
    agent: gc_core::Agent,
    instance: Option<u32>,
}

impl ResolvedTarget {
    fn instance_qualified_name(&self) -> String {
        match self.instance {
            Some(k) => {
                let instance_name = format!("{}-{}", self.agent.name, k);
                gc_core::scoped_name(&self.agent.dir, &instance_name)
            }
            None => self.agent.qualified_name(),
        }
    }
}

fn resolve_target(ctx: &CliContext, name: &str) -> Result<ResolvedTarget> {
    let agents = ctx.agents();
    let resolved = gc_engine::resolve_agent(&agents, name, ctx.rig_ctx.as_deref())
        .ok_or_else(|| ExitError::new("agent", format!("agent {name:?} not found")))?;
    Ok(ResolvedTarget {
        agent: resolved.agent.clone(),
        instance: resolved.instance,
    })
}

fn resolve_target_session(ctx: &CliContext, name: &str) -> Result<(ResolvedTarget, String)> {
    let resolved = resolve_target(ctx, name)?;
    let session = session_name(&ctx.city_name(), &resolved.instance_qualified_name(), None);
    Ok((resolved, session))
}

pub async fn handle(command: AgentCommand, ctx: &mut CliContext) -> Result<()> {
    match command {
        AgentCommand::Add {
            name,
            dir,
            prompt_template,
            suspended,
            pool_min,
            pool_max,
            sling_query,
        } => {
            let (dir, name) = match dir {
                Some(d) => (d, name),
                None => {
                    let (d, n) = split_scoped_name(&name);
                    (d.to_string(), n.to_string())
                }
            };
            if ctx.city_cfg.agent(&dir, &name).is_some() {
                return Err(ExitError::new(
                    "agent add",
                    format!("agent {:?} already registered", scoped_name(&dir, &name)),
                )
                .into());
            }
            let pool = match (pool_min, pool_max) {
                (None, None) => None,
                (min, max) => Some(PoolSpec {
                    min: min.unwrap_or(1),
                    max: max.unwrap_or(1),
                }),
            };
            let qualified = scoped_name(&dir, &name);
            ctx.city_cfg.agents.push(AgentEntry {
                name,
                dir,
                prompt_template,
                suspended,
                pool,
                sling_query,
            });
            ctx.save().with_command("agent add")?;
            println!("added agent {qualified}");
            Ok(())
        }

        AgentCommand::List => {
            for agent in ctx.agents() {
                let pool = agent
                    .pool
                    .map(|p| format!(" pool={}..{}", p.min, p.max))
                    .unwrap_or_default();
                let suspended = if agent.suspended { " [suspended]" } else { "" };
                println!("{}{}{}", agent.qualified_name(), pool, suspended);
            }
            Ok(())
        }

        AgentCommand::Suspend { name } => set_suspended(ctx, &name, true).await,
        AgentCommand::Resume { name } => set_suspended(ctx, &name, false).await,

        AgentCommand::Attach { name } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            providers
                .session
                .attach(&session)
                .await
                .with_command("agent attach")
        }

        AgentCommand::Kill { name } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            providers.session.kill(&session).await.with_command("agent kill")
        }

        AgentCommand::Nudge { name, text } => {
            let (resolved, session) = resolve_target_session(ctx, &name)?;
            if resolved.instance.is_none() && resolved.agent.is_pool() {
                return nudge_first_running_instance(ctx, &resolved, &text).await;
            }
            let providers = ctx.providers();
            providers
                .session
                .nudge(&session, &text)
                .await
                .with_command("agent nudge")
        }

        AgentCommand::Peek { name, lines } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            let text = providers
                .session
                .peek(&session, lines)
                .await
                .with_command("agent peek")?;
            print!("{text}");
            Ok(())
        }

        AgentCommand::Drain { name } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            let now = chrono::Utc::now().timestamp();
            providers.session.drain(&session, now).await.with_command("agent drain")
        }

        AgentCommand::Undrain { name } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            providers.session.undrain(&session).await.with_command("agent undrain")
        }

        AgentCommand::DrainCheck { name } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            let due = providers
                .session
                .drain_check(&session)
                .await
                .with_command("agent drain-check")?;
            if due {
                Ok(())
            } else {
                Err(ExitError::new("agent drain-check", "no active drain signal").into())
            }
        }

        AgentCommand::DrainAck { name } => {
            let (_, session) = resolve_target_session(ctx, &name)?;
            let providers = ctx.providers();
            providers
                .session
                .drain_ack(&session)
                .await
                .with_command("agent drain-ack")
        }
    }
}

async fn set_suspended(ctx: &mut CliContext, name: &str, suspended: bool) -> Result<()> {
    let resolved = resolve_target(ctx, name)?;
    let entry = ctx
        .city_cfg
        .agent_mut(&resolved.agent.dir, &resolved.agent.name)
        .ok_or_else(|| ExitError::new("agent", format!("agent {name:?} not found")))?;
    entry.suspended = suspended;
    ctx.save().with_command("agent")?;
    Ok(())
}

/// Nudge the first running instance of an unqualified pool target (§4.9
/// step 5's pool-nudge rule, reused here for `agent nudge <pool>` directly
/// rather than only via `sling`).
async fn nudge_first_running_instance(
    ctx: &CliContext,
    resolved: &ResolvedTarget,
    text: &str,
) -> Result<()> {
    let providers = ctx.providers();
    let max = resolved.agent.pool.map(|p| p.max).unwrap_or(0);
    for k in 1..=max {
        let instance_name = format!("{}-{}", resolved.agent.name, k);
        let qualified = scoped_name(&resolved.agent.dir, &instance_name);
        let session = session_name(&ctx.city_name(), &qualified, None);
        if providers.session.is_running(&session).await.unwrap_or(false) {
            return providers
                .session
                .nudge(&session, text)
                .await
                .with_command("agent nudge");
        }
    }
    eprintln!(
        "warning: no running instance of pool {:?} to nudge",
        resolved.agent.qualified_name()
    );
    Ok(())
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
