// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for a running gateway

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use llm_gateway_core::domain::chat::ChatRequest;
use llm_gateway_core::domain::outcome::{ErrorKind, GatewayOutcome};
use llm_gateway_core::domain::provider::ProviderSummary;

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    // Absent from gateways that only send the rendered message
    #[serde(default)]
    detail: Option<String>,
    kind: ErrorKind,
    provider: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a chat request and rebuild the gateway's outcome from the reply
    pub async fn chat(&self, request: &ChatRequest) -> Result<GatewayOutcome> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", self.base_url))?;

        let status = response.status();
        if status.is_success() {
            #[derive(Deserialize)]
            struct ChatResponse {
                content: String,
            }

            let body: ChatResponse = response
                .json()
                .await
                .context("Failed to parse chat response")?;
            return Ok(GatewayOutcome::success(body.content));
        }

        let body: ErrorBody = response
            .json()
            .await
            .with_context(|| format!("Gateway returned HTTP {} without an error body", status))?;

        Ok(GatewayOutcome::failure(
            body.kind,
            body.provider.unwrap_or_else(|| request.provider_name.clone()),
            body.detail.unwrap_or(body.error),
        ))
    }

    pub async fn providers(&self) -> Result<Vec<ProviderSummary>> {
        let response = self
            .client
            .get(format!("{}/api/providers", self.base_url))
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", self.base_url))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to list providers: {}", error_text);
        }

        #[derive(Deserialize)]
        struct ProvidersResponse {
            providers: Vec<ProviderSummary>,
        }

        let body: ProvidersResponse = response
            .json()
            .await
            .context("Failed to parse providers response")?;
        Ok(body.providers)
    }
}
