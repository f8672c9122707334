// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gateway Dispatcher - Application Service
//
// Drives one chat request through validate -> lookup -> resolve credential ->
// build request -> send -> parse response. Every path ends in exactly one
// GatewayOutcome. Stages before Send never touch the network, and Send makes
// at most one HTTP round trip; nothing here retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::chat::ChatRequest;
use crate::domain::events::GatewayEvent;
use crate::domain::gateway_config::{GatewayConfigManifest, HttpConfig};
use crate::domain::outcome::{ErrorKind, GatewayFailure, GatewayOutcome};
use crate::domain::provider::{ProviderDescriptor, ProviderSummary};
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::llm::registry::check_descriptor;
use crate::infrastructure::llm::transformer::OutboundRequest;
use crate::infrastructure::llm::{normalizer, transformer};
use crate::infrastructure::llm::{CredentialResolver, ProviderRegistry, ShapeTable};

/// Deadline applied when the caller does not supply one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Chat entry point used by the HTTP API and the CLI
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> GatewayOutcome;
    fn providers(&self) -> Vec<ProviderSummary>;
}

/// Stateless dispatcher over a read-only provider registry.
///
/// Cloning is cheap and clones share the registry, shape table and HTTP
/// connection pool.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<ProviderRegistry>,
    credentials: CredentialResolver,
    shapes: Arc<ShapeTable>,
    client: reqwest::Client,
    timeout: Duration,
    events: Option<EventBus>,
}

pub struct GatewayBuilder {
    registry: ProviderRegistry,
    credentials: Option<CredentialResolver>,
    shapes: Option<ShapeTable>,
    client: Option<reqwest::Client>,
    timeout: Duration,
    events: Option<EventBus>,
}

impl GatewayBuilder {
    pub fn with_credentials(mut self, credentials: CredentialResolver) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_shapes(mut self, shapes: ShapeTable) -> Self {
        self.shapes = Some(shapes);
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Gateway {
        Gateway {
            registry: Arc::new(self.registry),
            credentials: self.credentials.unwrap_or_default(),
            shapes: Arc::new(self.shapes.unwrap_or_default()),
            client: self.client.unwrap_or_default(),
            timeout: self.timeout,
            events: self.events,
        }
    }
}

/// HTTP client shared by every dispatch; connections are pooled per host
pub fn build_http_client(http: &HttpConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(http.connect_timeout())
        .pool_idle_timeout(http.pool_idle_timeout())
        .build()
}

impl Gateway {
    pub fn builder(registry: ProviderRegistry) -> GatewayBuilder {
        GatewayBuilder {
            registry,
            credentials: None,
            shapes: None,
            client: None,
            timeout: DEFAULT_TIMEOUT,
            events: None,
        }
    }

    /// Build a gateway from a configuration manifest.
    ///
    /// Fails if the manifest does not validate (bad provider table, zero
    /// timeouts, unknown log format) or the HTTP client cannot be created.
    pub fn from_config(config: &GatewayConfigManifest) -> anyhow::Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let registry = ProviderRegistry::from_config(config).context("Invalid provider table")?;
        let client =
            build_http_client(&config.spec.http).context("Failed to build HTTP client")?;

        let mut builder = Self::builder(registry)
            .with_client(client)
            .with_timeout(config.spec.http.timeout());

        if config.spec.audit.enabled {
            builder = builder.with_event_bus(EventBus::new(config.spec.audit.capacity));
        }

        Ok(builder.build())
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }

    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    /// Dispatch with the gateway's default deadline
    pub async fn dispatch(&self, request: &ChatRequest) -> GatewayOutcome {
        self.dispatch_with_deadline(request, self.timeout).await
    }

    /// Dispatch, giving up on the upstream call once `deadline` elapses.
    ///
    /// An elapsed deadline yields `NetworkError` with detail `"timeout"`. The
    /// in-flight request future is dropped, which closes its connection.
    pub async fn dispatch_with_deadline(
        &self,
        request: &ChatRequest,
        deadline: Duration,
    ) -> GatewayOutcome {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        debug!(%request_id, provider = %request.provider_name, "Dispatching chat request");

        let outcome = GatewayOutcome::from(self.run(request, deadline).await);
        let latency_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            GatewayOutcome::Success { .. } => {
                info!(%request_id, provider = %request.provider_name, latency_ms, "Chat request completed");
            }
            GatewayOutcome::Failure(failure) => {
                warn!(
                    %request_id,
                    provider = %failure.provider_name,
                    kind = %failure.kind,
                    detail = %failure.detail,
                    latency_ms,
                    "Chat request failed"
                );
            }
        }

        self.publish(request_id, &request.provider_name, &outcome, latency_ms);
        outcome
    }

    pub fn providers(&self) -> Vec<ProviderSummary> {
        self.registry.summaries()
    }

    async fn run(&self, request: &ChatRequest, deadline: Duration) -> Result<String, GatewayFailure> {
        request
            .validate()
            .map_err(|detail| GatewayFailure::new(ErrorKind::InvalidRequest, &request.provider_name, detail))?;

        let descriptor = self.registry.lookup(&request.provider_name).ok_or_else(|| {
            GatewayFailure::new(
                ErrorKind::UnknownProvider,
                &request.provider_name,
                format!("no provider named '{}' is registered", request.provider_name),
            )
        })?;

        check_descriptor(descriptor).map_err(|e| {
            GatewayFailure::new(ErrorKind::MisconfiguredProvider, &descriptor.name, e.to_string())
        })?;

        let outbound = {
            let credential = self.credentials.resolve(descriptor)?;
            transformer::build(&self.shapes, descriptor, request, &credential)?
        };

        let (status, body) = self.send(descriptor, outbound, deadline).await?;

        normalizer::parse(&self.shapes, descriptor, status, &body).into_result()
    }

    async fn send(
        &self,
        descriptor: &ProviderDescriptor,
        outbound: OutboundRequest,
        deadline: Duration,
    ) -> Result<(StatusCode, Vec<u8>), GatewayFailure> {
        let body = outbound.serialized_body();
        let call = async {
            let response = self
                .client
                .request(outbound.method, outbound.url)
                .headers(outbound.headers)
                .body(body)
                .send()
                .await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes.to_vec()))
        };

        match tokio::time::timeout(deadline, call).await {
            Ok(Ok(received)) => Ok(received),
            Ok(Err(e)) => Err(GatewayFailure::new(
                ErrorKind::NetworkError,
                &descriptor.name,
                transport_detail(&e),
            )),
            Err(_) => Err(GatewayFailure::new(
                ErrorKind::NetworkError,
                &descriptor.name,
                "timeout",
            )),
        }
    }

    fn publish(&self, request_id: Uuid, provider_name: &str, outcome: &GatewayOutcome, latency_ms: u64) {
        let Some(events) = &self.events else {
            return;
        };

        let event = match outcome {
            GatewayOutcome::Success { .. } => GatewayEvent::ChatCompleted {
                request_id,
                provider_name: provider_name.to_string(),
                latency_ms,
                completed_at: Utc::now(),
            },
            GatewayOutcome::Failure(failure) => GatewayEvent::ChatFailed {
                request_id,
                provider_name: provider_name.to_string(),
                kind: failure.kind,
                detail: failure.detail.clone(),
                latency_ms,
                failed_at: Utc::now(),
            },
        };
        events.publish(event);
    }
}

/// Underlying cause of a transport fault, including its source chain
fn transport_detail(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "timeout".to_string();
    }

    let mut detail = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[async_trait]
impl ChatService for Gateway {
    async fn chat(&self, request: ChatRequest) -> GatewayOutcome {
        self.dispatch(&request).await
    }

    fn providers(&self) -> Vec<ProviderSummary> {
        Gateway::providers(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::InMemoryCredentialSource;

    fn offline_gateway() -> Gateway {
        let config = GatewayConfigManifest::default();
        Gateway::builder(ProviderRegistry::from_config(&config).unwrap())
            .with_credentials(CredentialResolver::new(Arc::new(InMemoryCredentialSource::new())))
            .build()
    }

    #[tokio::test]
    async fn test_blank_message_is_invalid_request() {
        let outcome = offline_gateway().dispatch(&ChatRequest::new("GPT-4", "   ")).await;
        assert_eq!(outcome.kind(), Some(ErrorKind::InvalidRequest));
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let outcome = offline_gateway().dispatch(&ChatRequest::new("GPT-5", "hello")).await;
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::UnknownProvider);
        assert_eq!(failure.provider_name, "GPT-5");
    }

    #[tokio::test]
    async fn test_missing_credential_before_network() {
        let outcome = offline_gateway().dispatch(&ChatRequest::new("Claude", "hello")).await;
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::MissingCredential);
        assert!(failure.detail.contains("ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn test_failures_are_published() {
        let bus = EventBus::new(8);
        let mut receiver = bus.subscribe();
        let gateway = Gateway::builder(ProviderRegistry::default())
            .with_event_bus(bus)
            .build();

        gateway.dispatch(&ChatRequest::new("GPT-4", "hello")).await;

        match receiver.recv().await.unwrap() {
            GatewayEvent::ChatFailed { kind, provider_name, .. } => {
                assert_eq!(kind, ErrorKind::UnknownProvider);
                assert_eq!(provider_name, "GPT-4");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_rejects_invalid_manifest() {
        let mut config = GatewayConfigManifest::default();
        config.spec.http.timeout_ms = 0;
        let err = Gateway::from_config(&config).err().unwrap();
        assert!(format!("{:#}", err).contains("timeout_ms"));

        let mut config = GatewayConfigManifest::default();
        config.spec.observability.logging.format = "yaml".to_string();
        assert!(Gateway::from_config(&config).is_err());

        let config = GatewayConfigManifest::default();
        let gateway = Gateway::from_config(&config).unwrap();
        assert_eq!(gateway.default_timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_builder_defaults() {
        let gateway = Gateway::builder(ProviderRegistry::default()).build();
        assert_eq!(gateway.default_timeout(), DEFAULT_TIMEOUT);
        assert!(gateway.event_bus().is_none());
        assert!(gateway.providers().is_empty());
    }
}
