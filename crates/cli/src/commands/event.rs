// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `event emit` (§6, §4.3): best-effort append to the events log. Always
//! exits 0 (§7) — a failed emit is logged, never surfaced as a CLI error,
//! so instrumenting a script with `event emit` can never break it.

use crate::commands::parse_key_value;
use crate::context::CliContext;
use anyhow::Result;
use clap::Args;
use gc_core::NewEvent;
use tracing::warn;

#[derive(Args)]
pub struct EventArgs {
    #[command(subcommand)]
    pub command: EventCommand,
}

#[derive(clap::Subcommand)]
pub enum EventCommand {
    /// Append one event to the log (best-effort, never fails the process)
    Emit {
        kind: String,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        message: String,
        /// Payload field `key=value`, repeatable, merged into a JSON object
        #[arg(long = "payload", value_parser = parse_key_value)]
        payload: Vec<(String, String)>,
    },
}

pub async fn handle(command: EventCommand, ctx: &CliContext) -> Result<()> {
    match command {
        EventCommand::Emit {
            kind,
            actor,
            subject,
            message,
            payload,
        } => {
            let mut event = NewEvent::new(kind, actor, subject).with_message(message);
            if !payload.is_empty() {
                let map: serde_json::Map<String, serde_json::Value> = payload
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                event = event.with_payload(serde_json::Value::Object(map));
            }

            let providers = ctx.providers();
            match providers.events.append(event).await {
                Ok(appended) => println!("seq:{}", appended.seq),
                Err(e) => warn!(error = %e, "event emit failed, continuing (best-effort)"),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
