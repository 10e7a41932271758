mod check_cmd;
mod config;
mod relay_cmds;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use zenith_core::model::{GeminiClient, GenerativeModel};
use zenith_core::relay::Relay;

use config::{CliOverrides, ZenithConfig};

#[derive(Parser)]
#[command(name = "zenith", about = "AI study-plan relay with a synthetic fallback")]
struct Cli {
    /// Model name (overrides ZENITH_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a zenith config file
    Init {
        /// Generative Language API key to store (defaults to GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP relay
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides PORT env var)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send a test prompt to the configured model and report the outcome
    CheckModel,
    #[command(flatten)]
    Relay(RelayCommands),
}

#[derive(Subcommand)]
pub enum RelayCommands {
    /// Generate a study plan for a goal (e.g. "Learn Go in 2 months")
    Plan {
        /// Goal and duration, free text
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Break one task into smaller subtasks
    Atomize {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,
    },
    /// Find learning resources for one task
    Resources {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,
    },
}

/// Execute the `zenith init` command: write config file.
fn cmd_init(api_key: Option<String>, model: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let api_key = api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .and_then(|k| zenith_core::model::normalize_api_key(&k));

    let cfg = config::ConfigFile {
        model: config::ModelSection {
            api_key: api_key.clone(),
            name: model,
            ..Default::default()
        },
        server: config::ServerSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match api_key {
        Some(key) => println!(
            "  model.api_key = {}",
            zenith_core::model::mask_api_key(&key)
        ),
        None => println!("  model.api_key not set (plans will use the synthetic generator)"),
    }
    if let Some(name) = &cfg.model.name {
        println!("  model.name = {name}");
    }
    println!();
    println!("Next: run `zenith check-model` to verify the key, then `zenith serve`.");

    Ok(())
}

fn build_client(resolved: &ZenithConfig) -> anyhow::Result<GeminiClient> {
    GeminiClient::new(resolved.model.clone()).context("failed to build model client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key, cli.model, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = ZenithConfig::resolve(&CliOverrides {
                model: cli.model.as_deref(),
                bind: bind.as_deref(),
                port,
            })?;
            let client = build_client(&resolved)?;
            if client.is_available() {
                tracing::info!(model = client.name(), "model credential found");
            } else {
                tracing::warn!(
                    "no GEMINI_API_KEY configured; plans will use the synthetic generator"
                );
            }
            let relay = Relay::new(Arc::new(client));
            serve_cmd::run_serve(relay, &resolved.bind, resolved.port).await?;
        }
        Commands::CheckModel => {
            let resolved = ZenithConfig::resolve(&CliOverrides {
                model: cli.model.as_deref(),
                ..Default::default()
            })?;
            let client = build_client(&resolved)?;
            check_cmd::run_check(&client).await?;
        }
        Commands::Relay(command) => {
            let resolved = ZenithConfig::resolve(&CliOverrides {
                model: cli.model.as_deref(),
                ..Default::default()
            })?;
            let client = build_client(&resolved)?;
            let relay = Relay::new(Arc::new(client));
            relay_cmds::run_relay_command(command, &relay).await?;
        }
    }

    Ok(())
}
