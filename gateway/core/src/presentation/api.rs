// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP API - Chat Endpoint
//
// Maps GatewayOutcome onto HTTP. Configuration failures caused by the
// operator (missing credential, broken descriptor) get a generic message so
// deployment details never reach API clients; the full detail is in the logs.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::application::dispatcher::ChatService;
use crate::domain::chat::ChatRequest;
use crate::domain::outcome::{ErrorKind, GatewayFailure, GatewayOutcome};

pub struct AppState {
    pub chat_service: Arc<dyn ChatService>,
}

pub fn app(service: Arc<dyn ChatService>) -> Router {
    let state = Arc::new(AppState {
        chat_service: service,
    });

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/providers", get(list_providers))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP status for a failed dispatch
pub fn status_for(failure: &GatewayFailure) -> StatusCode {
    match failure.kind {
        ErrorKind::InvalidRequest | ErrorKind::UnknownProvider | ErrorKind::UnsupportedProvider => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::MissingCredential | ErrorKind::MisconfiguredProvider => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ErrorKind::NetworkError if failure.detail == "timeout" => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::NetworkError | ErrorKind::UpstreamError | ErrorKind::MalformedResponse => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn failure_response(failure: &GatewayFailure) -> Response {
    let (message, detail) = match failure.kind {
        ErrorKind::MissingCredential | ErrorKind::MisconfiguredProvider => {
            let generic = format!("Provider '{}' is not configured correctly", failure.provider_name);
            (generic.clone(), generic)
        }
        _ => (failure.to_string(), failure.detail.clone()),
    };

    (
        status_for(failure),
        Json(json!({
            "error": message,
            "detail": detail,
            "kind": failure.kind,
            "provider": failure.provider_name,
        })),
    )
        .into_response()
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": rejection.body_text(),
                    "kind": ErrorKind::InvalidRequest,
                })),
            )
                .into_response();
        }
    };

    match state.chat_service.chat(request).await {
        GatewayOutcome::Success { content } => Json(json!({ "content": content })).into_response(),
        GatewayOutcome::Failure(failure) => failure_response(&failure),
    }
}

async fn list_providers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "providers": state.chat_service.providers() }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
