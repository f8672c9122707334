// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # LLM Gateway CLI
//!
//! The `llm-gateway` binary runs the gateway HTTP API or sends one-off chat
//! requests through it.
//!
//! ## Commands
//!
//! - `llm-gateway serve` - Run the HTTP API
//! - `llm-gateway chat` - Send a single chat request
//! - `llm-gateway providers` - List registered providers
//! - `llm-gateway config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use llm_gateway::commands::{self, ChatArgs, ConfigCommand, ProvidersArgs, ServeArgs};
use llm_gateway_core::domain::gateway_config::{GatewayConfigManifest, LoggingConfig};

/// LLM Gateway - one request shape for every provider
#[derive(Parser)]
#[command(name = "llm-gateway")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "LLM_GATEWAY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) [default: from config, else info]
    #[arg(long, global = true, env = "LLM_GATEWAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format (text, json) [default: from config, else text]
    #[arg(long, global = true, env = "LLM_GATEWAY_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway HTTP API
    Serve(ServeArgs),

    /// Send a chat request to a provider
    Chat(ChatArgs),

    /// List registered providers
    Providers(ProvidersArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials commonly live in .env during development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let logging = configured_logging(&cli.config);
    init_logging(
        cli.log_level.as_deref().unwrap_or(&logging.level),
        cli.log_format.as_deref().unwrap_or(&logging.format),
    )?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.config).await,
        Commands::Chat(args) => commands::chat::execute(args, cli.config).await,
        Commands::Providers(args) => commands::providers::execute(args, cli.config).await,
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
    }
}

/// Logging section of the configuration, read before the subscriber exists
fn configured_logging(config_path: &Option<PathBuf>) -> LoggingConfig {
    GatewayConfigManifest::load_or_default(config_path.clone())
        .map(|config| config.spec.observability.logging)
        .unwrap_or_default()
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        "text" => builder.compact().init(),
        other => anyhow::bail!("Unknown log format '{}'. Expected json or text", other),
    }

    Ok(())
}
