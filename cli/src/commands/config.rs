// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use llm_gateway_core::domain::gateway_config::GatewayConfigManifest;
use llm_gateway_core::infrastructure::llm::CredentialResolver;

pub const MINIMAL_TEMPLATE: &str = include_str!("../../templates/config-minimal.yaml");
pub const EXAMPLES_TEMPLATE: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./llm-gateway.yaml")]
        output: PathBuf,

        /// Include every built-in provider with comments
        #[arg(long)]
        examples: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => {
            validate(file.or(config_override))?;
            println!("{}", "✓ Configuration is valid".green());
            Ok(())
        }
        ConfigCommand::Generate {
            output,
            examples,
            force,
        } => {
            generate(&output, examples, force)?;
            println!(
                "{}",
                format!("✓ Configuration generated: {}", output.display()).green()
            );
            Ok(())
        }
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = GatewayConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. LLM_GATEWAY_CONFIG_PATH: {}",
            std::env::var("LLM_GATEWAY_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./llm-gateway.yaml");
        println!("  4. ~/.llm-gateway/config.yaml");
        println!("  5. /etc/llm-gateway/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    let credentials = CredentialResolver::from_env();

    println!("{}", "Providers:".bold());
    for provider in &config.spec.providers {
        let state = if !provider.enabled {
            "disabled".dimmed()
        } else if credentials.resolve(provider).is_ok() {
            "credential set".green()
        } else {
            "credential not set".yellow()
        };
        println!("  {} ({}) {}", provider.name.bold(), provider.family, state);
        println!("    Endpoint: {}", provider.endpoint);
        if !provider.model.is_empty() {
            println!("    Model: {}", provider.model);
        }
        println!(
            "    Shapes: request={}, response={}",
            provider.request_shape, provider.response_shape
        );
        println!("    Credential key: {}", provider.credential_key);
    }
    println!();

    println!("{}", "HTTP:".bold());
    println!("  Timeout: {}ms", config.spec.http.timeout_ms);
    println!("  Connect timeout: {}ms", config.spec.http.connect_timeout_ms);
    println!("  Pool idle timeout: {}s", config.spec.http.pool_idle_timeout_secs);
    println!();

    println!("{}", "Server:".bold());
    println!(
        "  Listen: {}:{}",
        config.spec.server.bind_address, config.spec.server.port
    );
    println!(
        "  Audit events: {}",
        if config.spec.audit.enabled { "on" } else { "off" }
    );
    println!(
        "  Logging: {} ({})",
        config.spec.observability.logging.level, config.spec.observability.logging.format
    );

    Ok(())
}

/// Load and validate a configuration, returning it on success
pub fn validate(config_path: Option<PathBuf>) -> Result<GatewayConfigManifest> {
    let config = GatewayConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Write a sample configuration to `output`
pub fn generate(output: &Path, with_examples: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let sample = if with_examples {
        EXAMPLES_TEMPLATE
    } else {
        MINIMAL_TEMPLATE
    };

    std::fs::write(output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    Ok(())
}
