//! One-shot CLI handlers that run a relay request and print the JSON result.
//!
//! Implements:
//! - `zenith plan <prompt>`        -- generate a plan (synthetic fallback)
//! - `zenith atomize <task>`       -- break a task into subtasks
//! - `zenith resources <task>`     -- find learning resources for a task

use anyhow::{Context, Result, bail};
use serde::Serialize;

use zenith_core::relay::Relay;

use crate::RelayCommands;

/// Dispatch a `RelayCommands` variant and print its result to stdout.
pub async fn run_relay_command(command: RelayCommands, relay: &Relay) -> Result<()> {
    let rendered = match command {
        RelayCommands::Plan { prompt } => {
            let prompt = require_input(prompt, "prompt")?;
            render(&relay.plan.handle(&prompt).await)?
        }
        RelayCommands::Atomize { task } => {
            let task = require_input(task, "task")?;
            render(&relay.atomize.handle(&task).await)?
        }
        RelayCommands::Resources { task } => {
            let task = require_input(task, "task")?;
            render(&relay.resources.handle(&task).await)?
        }
    };
    println!("{rendered}");
    Ok(())
}

/// Join positional words into one input string; empty input is an error.
fn require_input(words: Vec<String>, what: &str) -> Result<String> {
    let joined = words.join(" ");
    if joined.trim().is_empty() {
        bail!("missing {what}");
    }
    Ok(joined)
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize result")
}
