// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider
//!
//! Static metadata describing how to talk to one upstream provider.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements provider descriptors and shape tags

// Provider Descriptor Domain Types (Anti-Corruption Layer)
//
// A descriptor never carries a secret. It names the configuration entry the
// credential lives under and the shape tags used to pick an encoder/decoder
// out of the shape table in infrastructure/llm/shapes.rs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Broad API family a provider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderFamily {
    OpenaiCompatible,
    AnthropicStyle,
    GenerativeText,
    #[default]
    Other,
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenaiCompatible => write!(f, "openai-compatible"),
            Self::AnthropicStyle => write!(f, "anthropic-style"),
            Self::GenerativeText => write!(f, "generative-text"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Tag selecting a request encoder or response decoder.
///
/// Tags are open strings rather than a closed enum: a descriptor may name a
/// shape nobody registered, which surfaces per request as
/// `ErrorKind::UnsupportedProvider` instead of failing configuration parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeTag(String);

impl ShapeTag {
    /// `{model, messages}` with bearer auth
    pub const CHAT_MESSAGES: &'static str = "chat-messages";
    /// `{model, prompt: "Human: ..\n\nAssistant:", max_tokens_to_sample}` with `X-API-Key`
    pub const PROMPT_COMPLETION: &'static str = "prompt-completion";
    /// `{model, prompt, max_tokens}` with bearer auth, `generations[0].text`
    pub const GENERATION: &'static str = "generation";
    /// `{messages}` with an `api-key` header (managed deployments)
    pub const API_KEY_HEADER: &'static str = "api-key-header";
    /// `{prompt, max_tokens}` with bearer auth, `generated_text` (hosted inference)
    pub const TEXT_GENERATION: &'static str = "text-generation";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to reach one provider, minus the secret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique, human-readable name callers select the provider by (e.g. "GPT-4")
    pub name: String,

    #[serde(default)]
    pub family: ProviderFamily,

    /// Full URL the request is POSTed to
    pub endpoint: String,

    /// Configuration entry holding the credential (supports "env:VAR_NAME")
    pub credential_key: String,

    /// Model identifier sent upstream; ignored by shapes that carry no model
    #[serde(default)]
    pub model: String,

    pub request_shape: ShapeTag,

    pub response_shape: ShapeTag,

    /// Leading system message for chat-messages requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Overrides the default completion budget for prompt/generation shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Static, non-secret headers sent with every request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Disabled descriptors are skipped when the registry is built
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderDescriptor {
    /// Descriptor whose request and response share one shape tag
    pub fn new(
        name: impl Into<String>,
        family: ProviderFamily,
        endpoint: impl Into<String>,
        credential_key: impl Into<String>,
        model: impl Into<String>,
        shape: &str,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            endpoint: endpoint.into(),
            credential_key: credential_key.into(),
            model: model.into(),
            request_shape: ShapeTag::new(shape),
            response_shape: ShapeTag::new(shape),
            system_prompt: None,
            max_tokens: None,
            headers: BTreeMap::new(),
            enabled: true,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_response_shape(mut self, shape: &str) -> Self {
        self.response_shape = ShapeTag::new(shape);
        self
    }

    /// Public, secret-free view used for provider listings
    pub fn summary(&self) -> ProviderSummary {
        ProviderSummary {
            name: self.name.clone(),
            family: self.family,
            model: self.model.clone(),
        }
    }
}

/// Listing entry returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub name: String,
    pub family: ProviderFamily,
    pub model: String,
}

fn default_true() -> bool {
    true
}
