// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Shape Table - Tag to Encoder/Decoder Strategy Lookup
//
// Each request shape tag maps to a body encoder plus the auth scheme it is
// sent with; each response shape tag maps to the field path holding the
// assistant text. Supporting a new provider wire format means registering one
// entry on each side. The dispatcher never branches on provider identity.

use std::collections::HashMap;

use super::normalizer::{self, FieldPath};
use super::transformer::{self, BodyEncoder};
use crate::domain::provider::ShapeTag;

/// How the credential is attached to the outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <credential>`
    Bearer,
    /// `<header>: <credential>`, no prefix. Any case; names that are not
    /// valid header tokens fail the request as `MisconfiguredProvider`.
    Header(&'static str),
}

impl AuthScheme {
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::Bearer => "authorization",
            Self::Header(name) => name,
        }
    }

    pub fn header_value(&self, secret: &str) -> String {
        match self {
            Self::Bearer => format!("Bearer {}", secret),
            Self::Header(_) => secret.to_string(),
        }
    }
}

/// Request side of a shape
#[derive(Debug, Clone, Copy)]
pub struct RequestCodec {
    pub auth: AuthScheme,
    pub encode: BodyEncoder,
}

/// Response side of a shape
#[derive(Debug, Clone, Copy)]
pub struct ResponseCodec {
    /// Where the assistant text lives in a 2xx body
    pub content_path: FieldPath,
}

/// Registered request encoders and response decoders, keyed by shape tag
#[derive(Debug, Clone)]
pub struct ShapeTable {
    requests: HashMap<String, RequestCodec>,
    responses: HashMap<String, ResponseCodec>,
}

impl ShapeTable {
    /// A table with nothing registered
    pub fn empty() -> Self {
        Self {
            requests: HashMap::new(),
            responses: HashMap::new(),
        }
    }

    /// The shapes the gateway ships with
    pub fn builtin() -> Self {
        let mut table = Self::empty();

        table
            .register_request(
                ShapeTag::CHAT_MESSAGES,
                RequestCodec {
                    auth: AuthScheme::Bearer,
                    encode: transformer::encode_chat_messages,
                },
            )
            .register_request(
                ShapeTag::PROMPT_COMPLETION,
                RequestCodec {
                    auth: AuthScheme::Header("x-api-key"),
                    encode: transformer::encode_prompt_completion,
                },
            )
            .register_request(
                ShapeTag::GENERATION,
                RequestCodec {
                    auth: AuthScheme::Bearer,
                    encode: transformer::encode_generation,
                },
            )
            .register_request(
                ShapeTag::API_KEY_HEADER,
                RequestCodec {
                    auth: AuthScheme::Header("api-key"),
                    encode: transformer::encode_deployment_chat,
                },
            )
            .register_request(
                ShapeTag::TEXT_GENERATION,
                RequestCodec {
                    auth: AuthScheme::Bearer,
                    encode: transformer::encode_text_generation,
                },
            );

        table
            .register_response(
                ShapeTag::CHAT_MESSAGES,
                ResponseCodec {
                    content_path: normalizer::CHOICES_MESSAGE_CONTENT,
                },
            )
            .register_response(
                ShapeTag::PROMPT_COMPLETION,
                ResponseCodec {
                    content_path: normalizer::COMPLETION,
                },
            )
            .register_response(
                ShapeTag::GENERATION,
                ResponseCodec {
                    content_path: normalizer::GENERATIONS_TEXT,
                },
            )
            .register_response(
                ShapeTag::API_KEY_HEADER,
                ResponseCodec {
                    content_path: normalizer::CHOICES_MESSAGE_CONTENT,
                },
            )
            .register_response(
                ShapeTag::TEXT_GENERATION,
                ResponseCodec {
                    content_path: normalizer::GENERATED_TEXT,
                },
            );

        table
    }

    pub fn register_request(&mut self, tag: impl Into<String>, codec: RequestCodec) -> &mut Self {
        self.requests.insert(tag.into(), codec);
        self
    }

    pub fn register_response(&mut self, tag: impl Into<String>, codec: ResponseCodec) -> &mut Self {
        self.responses.insert(tag.into(), codec);
        self
    }

    pub fn request_codec(&self, tag: &ShapeTag) -> Option<&RequestCodec> {
        self.requests.get(tag.as_str())
    }

    pub fn response_codec(&self, tag: &ShapeTag) -> Option<&ResponseCodec> {
        self.responses.get(tag.as_str())
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
