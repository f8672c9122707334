// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Run the gateway HTTP API

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use llm_gateway_core::domain::gateway_config::GatewayConfigManifest;

use crate::server;

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides spec.server.bind_address)
    #[arg(long, env = "LLM_GATEWAY_HOST")]
    pub host: Option<String>,

    /// HTTP API port (overrides spec.server.port)
    #[arg(long, env = "LLM_GATEWAY_PORT")]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = GatewayConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    if let Some(host) = args.host {
        config.spec.server.bind_address = host;
    }
    if let Some(port) = args.port {
        config.spec.server.port = port;
    }

    server::start_server(config).await
}
