// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Request Transformer - Canonical Chat Request to Provider Wire Format
//
// Pure functions: no I/O, no logging of bodies. The credential is only ever
// written into a header value that is flagged sensitive so it cannot leak
// through Debug output of the outbound request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::shapes::ShapeTable;
use crate::domain::chat::{ChatMessage, ChatRequest, MessageRole};
use crate::domain::credential::Credential;
use crate::domain::outcome::{ErrorKind, GatewayFailure};
use crate::domain::provider::ProviderDescriptor;

/// Completion budget used when a descriptor does not set `max_tokens`
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Encodes one canonical request into a provider body
pub type BodyEncoder = fn(&ProviderDescriptor, &ChatRequest) -> serde_json::Result<Value>;

/// A fully-specified HTTP request, ready to send
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Value,
}

impl OutboundRequest {
    pub fn serialized_body(&self) -> Vec<u8> {
        self.body.to_string().into_bytes()
    }
}

/// Build the outbound request for `descriptor`.
///
/// Fails with `UnsupportedProvider` when either shape tag has no registered
/// codec (checked together so nothing is sent that could not be decoded) and
/// with `MisconfiguredProvider` when the endpoint or a header is unusable.
pub fn build(
    shapes: &ShapeTable,
    descriptor: &ProviderDescriptor,
    request: &ChatRequest,
    credential: &Credential,
) -> Result<OutboundRequest, GatewayFailure> {
    let fail = |kind: ErrorKind, detail: String| GatewayFailure::new(kind, &descriptor.name, detail);

    let codec = shapes.request_codec(&descriptor.request_shape).ok_or_else(|| {
        fail(
            ErrorKind::UnsupportedProvider,
            format!("no request encoder registered for shape '{}'", descriptor.request_shape),
        )
    })?;

    if shapes.response_codec(&descriptor.response_shape).is_none() {
        return Err(fail(
            ErrorKind::UnsupportedProvider,
            format!("no response decoder registered for shape '{}'", descriptor.response_shape),
        ));
    }

    let url = Url::parse(&descriptor.endpoint).map_err(|e| {
        fail(ErrorKind::MisconfiguredProvider, format!("endpoint is not a valid URL: {}", e))
    })?;

    let body = (codec.encode)(descriptor, request).map_err(|e| {
        fail(ErrorKind::MisconfiguredProvider, format!("failed to encode request body: {}", e))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &descriptor.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            fail(ErrorKind::MisconfiguredProvider, format!("invalid header name '{}'", name))
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| {
            fail(ErrorKind::MisconfiguredProvider, format!("invalid value for header '{}'", name))
        })?;
        headers.insert(name, value);
    }

    let auth_name = HeaderName::from_bytes(codec.auth.header_name().as_bytes()).map_err(|_| {
        fail(
            ErrorKind::MisconfiguredProvider,
            format!("invalid auth header name '{}'", codec.auth.header_name()),
        )
    })?;

    // Never echo the credential back, not even in part.
    let mut auth_value = HeaderValue::from_str(&codec.auth.header_value(credential.expose()))
        .map_err(|_| {
            fail(
                ErrorKind::MisconfiguredProvider,
                "credential contains characters not allowed in an HTTP header".to_string(),
            )
        })?;
    auth_value.set_sensitive(true);
    headers.insert(auth_name, auth_value);

    Ok(OutboundRequest {
        method: Method::POST,
        url,
        headers,
        body,
    })
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Serialize)]
struct ChatMessagesBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct DeploymentChatBody<'a> {
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct PromptCompletionBody<'a> {
    model: &'a str,
    prompt: String,
    max_tokens_to_sample: u32,
}

#[derive(Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Serialize)]
struct TextGenerationBody<'a> {
    prompt: &'a str,
    max_tokens: u32,
}

/// System prompt, then prior turns, then the new user message
fn wire_messages<'a>(descriptor: &'a ProviderDescriptor, request: &'a ChatRequest) -> Vec<WireMessage<'a>> {
    let mut messages = Vec::with_capacity(request.conversation_history.len() + 2);

    if let Some(system) = descriptor.system_prompt.as_deref() {
        messages.push(WireMessage {
            role: MessageRole::System.as_str(),
            content: system,
        });
    }
    messages.extend(request.conversation_history.iter().map(WireMessage::from));
    messages.push(WireMessage {
        role: MessageRole::User.as_str(),
        content: &request.message_text,
    });

    messages
}

fn max_tokens(descriptor: &ProviderDescriptor) -> u32 {
    descriptor.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
}

pub fn encode_chat_messages(descriptor: &ProviderDescriptor, request: &ChatRequest) -> serde_json::Result<Value> {
    serde_json::to_value(ChatMessagesBody {
        model: &descriptor.model,
        messages: wire_messages(descriptor, request),
    })
}

pub fn encode_deployment_chat(descriptor: &ProviderDescriptor, request: &ChatRequest) -> serde_json::Result<Value> {
    serde_json::to_value(DeploymentChatBody {
        messages: wire_messages(descriptor, request),
    })
}

pub fn encode_prompt_completion(descriptor: &ProviderDescriptor, request: &ChatRequest) -> serde_json::Result<Value> {
    serde_json::to_value(PromptCompletionBody {
        model: &descriptor.model,
        prompt: format!("Human: {}\n\nAssistant:", request.message_text),
        max_tokens_to_sample: max_tokens(descriptor),
    })
}

pub fn encode_generation(descriptor: &ProviderDescriptor, request: &ChatRequest) -> serde_json::Result<Value> {
    serde_json::to_value(GenerationBody {
        model: &descriptor.model,
        prompt: &request.message_text,
        max_tokens: max_tokens(descriptor),
    })
}

pub fn encode_text_generation(descriptor: &ProviderDescriptor, request: &ChatRequest) -> serde_json::Result<Value> {
    serde_json::to_value(TextGenerationBody {
        prompt: &request.message_text,
        max_tokens: max_tokens(descriptor),
    })
}
