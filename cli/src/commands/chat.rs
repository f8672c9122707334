// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Send a single chat request
//!
//! Dispatches in-process by default. With `--server` the request goes to a
//! running gateway's HTTP API instead.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use llm_gateway_core::application::Gateway;
use llm_gateway_core::domain::chat::ChatRequest;
use llm_gateway_core::domain::gateway_config::GatewayConfigManifest;
use llm_gateway_core::domain::outcome::GatewayOutcome;

use crate::client::GatewayClient;

#[derive(Args)]
pub struct ChatArgs {
    /// Provider name as registered (e.g. "GPT-4")
    #[arg(short, long, env = "LLM_GATEWAY_PROVIDER")]
    pub provider: String,

    /// Message text; multiple words are joined with spaces
    #[arg(value_name = "MESSAGE", required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Base URL of a running gateway (e.g. http://127.0.0.1:8080)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Per-request deadline in milliseconds (default: spec.http.timeout_ms)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ChatArgs, config_path: Option<PathBuf>) -> Result<()> {
    let request = ChatRequest::new(args.provider.clone(), args.message.join(" "));
    let deadline = args.timeout_ms.map(Duration::from_millis);

    let outcome = match &args.server {
        Some(url) => GatewayClient::new(url, deadline)?.chat(&request).await?,
        None => {
            let config = GatewayConfigManifest::load_or_default(config_path)
                .context("Failed to load configuration")?;
            let gateway = Gateway::from_config(&config).context("Failed to initialize gateway")?;
            let deadline = deadline.unwrap_or_else(|| gateway.default_timeout());
            gateway.dispatch_with_deadline(&request, deadline).await
        }
    };

    print_outcome(&outcome, args.json)?;

    match outcome.into_result() {
        Ok(_) => Ok(()),
        Err(failure) => Err(failure.into()),
    }
}

/// Content goes to stdout; the failure detail reaches the user through the
/// error `execute` returns
pub fn print_outcome(outcome: &GatewayOutcome, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?
        );
        return Ok(());
    }

    match outcome {
        GatewayOutcome::Success { content } => println!("{}", content),
        GatewayOutcome::Failure(failure) => eprintln!(
            "{} {} ({})",
            "✗".red(),
            failure.kind.to_string().red().bold(),
            failure.provider_name
        ),
    }

    Ok(())
}
