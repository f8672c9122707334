// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Gateway HTTP server bootstrap

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use llm_gateway_core::{
    application::Gateway,
    domain::{events::GatewayEvent, gateway_config::GatewayConfigManifest},
    infrastructure::event_bus::{EventBusError, EventReceiver},
    presentation::api,
};

/// Build the gateway from `config` and serve until Ctrl+C or SIGTERM
pub async fn start_server(config: GatewayConfigManifest) -> Result<()> {
    let gateway = Gateway::from_config(&config).context("Failed to initialize gateway")?;
    info!(
        "Gateway ready: {} provider(s), default timeout {}ms",
        gateway.registry().len(),
        config.spec.http.timeout_ms
    );

    if let Some(events) = gateway.event_bus() {
        spawn_audit_logger(events.subscribe());
    }

    let addr = format!("{}:{}", config.spec.server.bind_address, config.spec.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Gateway listening on {}", addr);

    serve(listener, gateway, shutdown_signal()).await?;

    info!("Gateway shutting down");

    Ok(())
}

/// Serve the API on an already-bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, gateway: Gateway, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = api::app(Arc::new(gateway));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// Forward audit events to the `audit` tracing target
pub fn spawn_audit_logger(mut receiver: EventReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => log_audit_event(&event),
                Err(EventBusError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    })
}

fn log_audit_event(event: &GatewayEvent) {
    match event {
        GatewayEvent::ChatCompleted {
            request_id,
            provider_name,
            latency_ms,
            ..
        } => {
            info!(target: "audit", %request_id, provider = %provider_name, latency_ms, "chat_completed");
        }
        GatewayEvent::ChatFailed {
            request_id,
            provider_name,
            kind,
            latency_ms,
            ..
        } => {
            info!(target: "audit", %request_id, provider = %provider_name, kind = %kind, latency_ms, "chat_failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
