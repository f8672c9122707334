// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Chat Request Domain Types
//
// The provider-agnostic request accepted at the gateway boundary. Created per
// incoming call and never persisted.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A prior turn passed through to chat-style providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Normalized chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Registry name of the target provider
    #[serde(alias = "llmName", alias = "provider")]
    pub provider_name: String,

    /// The user's message; must not be blank
    #[serde(alias = "message")]
    pub message_text: String,

    /// Earlier turns, oldest first. Only chat-style shapes forward them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(provider_name: impl Into<String>, message_text: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            message_text: message_text.into(),
            conversation_history: vec![],
        }
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.conversation_history = history;
        self
    }

    /// Check request shape invariants, returning the reason on failure
    pub fn validate(&self) -> Result<(), String> {
        if self.provider_name.trim().is_empty() {
            return Err("providerName cannot be empty".to_string());
        }
        if self.message_text.trim().is_empty() {
            return Err("messageText cannot be empty".to_string());
        }
        Ok(())
    }
}
