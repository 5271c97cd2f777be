// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gc - the city's command-line surface (§6).

mod commands;
mod context;
mod exit;

use clap::{Parser, Subcommand};
use commands::{agent, event, sling, trigger};
use context::CliContext;
use exit::ExitError;
use gc_core::TriggerKind;

#[derive(Parser)]
#[command(name = "gc", version, about = "gc - workstation orchestrator for agents, plugins, and automations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Agent management
    Agent(agent::AgentArgs),
    /// Route a bead or freshly cooked wisp to a target agent
    Sling(sling::SlingArgs),
    /// On-demand plugin management
    Plugin(trigger::TriggerArgsWrapper),
    /// Recurring automation management
    Automation(trigger::TriggerArgsWrapper),
    /// Append an event to the city's events log
    Event(event::EventArgs),
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |c| c.code);
        eprintln!("{e}");
        std::process::exit(code);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut ctx = CliContext::load()?;

    match cli.command {
        Commands::Agent(args) => agent::handle(args.command, &mut ctx).await,
        Commands::Sling(args) => sling::handle(args, &ctx).await,
        Commands::Plugin(wrapper) => trigger::handle(TriggerKind::Plugin, wrapper.command, &ctx).await,
        Commands::Automation(wrapper) => {
            trigger::handle(TriggerKind::Automation, wrapper.command, &ctx).await
        }
        Commands::Event(args) => event::handle(args.command, &ctx).await,
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
