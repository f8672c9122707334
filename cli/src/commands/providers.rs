// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! List registered providers

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use llm_gateway_core::domain::gateway_config::GatewayConfigManifest;
use llm_gateway_core::domain::provider::ProviderSummary;
use llm_gateway_core::infrastructure::llm::{CredentialResolver, ProviderRegistry};

use crate::client::GatewayClient;

#[derive(Args)]
pub struct ProvidersArgs {
    /// Query a running gateway instead of the local configuration
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// One listing row; `credential_set` is unknown for remote gateways
#[derive(Debug, Serialize)]
pub struct ProviderRow {
    #[serde(flatten)]
    pub summary: ProviderSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_set: Option<bool>,
}

pub async fn execute(args: ProvidersArgs, config_path: Option<PathBuf>) -> Result<()> {
    let rows = match &args.server {
        Some(url) => GatewayClient::new(url, None)?
            .providers()
            .await?
            .into_iter()
            .map(|summary| ProviderRow {
                summary,
                credential_set: None,
            })
            .collect(),
        None => {
            let config = GatewayConfigManifest::load_or_default(config_path)
                .context("Failed to load configuration")?;
            local_rows(&config, &CredentialResolver::from_env())?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No providers registered".yellow());
        return Ok(());
    }

    for row in &rows {
        let status = match row.credential_set {
            Some(true) => "✓".green(),
            Some(false) => "✗ credential not set".red(),
            None => "".normal(),
        };
        println!(
            "  {} ({}, model: {}) {}",
            row.summary.name.bold(),
            row.summary.family,
            if row.summary.model.is_empty() { "-" } else { row.summary.model.as_str() },
            status
        );
    }

    Ok(())
}

/// Registered providers with whether their credential currently resolves
pub fn local_rows(
    config: &GatewayConfigManifest,
    credentials: &CredentialResolver,
) -> Result<Vec<ProviderRow>> {
    config
        .validate()
        .context("Configuration validation failed")?;
    let registry = ProviderRegistry::from_config(config).context("Invalid provider table")?;

    Ok(registry
        .descriptors()
        .map(|descriptor| ProviderRow {
            summary: descriptor.summary(),
            credential_set: Some(credentials.resolve(descriptor).is_ok()),
        })
        .collect())
}
