// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::outcome::ErrorKind;

/// Audit trail for gateway dispatches.
///
/// Events describe *that* a dispatch happened and how it ended. They never
/// carry the message text, the generated content, a credential, or an
/// upstream body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GatewayEvent {
    ChatCompleted {
        request_id: Uuid,
        provider_name: String,
        latency_ms: u64,
        completed_at: DateTime<Utc>,
    },
    ChatFailed {
        request_id: Uuid,
        provider_name: String,
        kind: ErrorKind,
        detail: String,
        latency_ms: u64,
        failed_at: DateTime<Utc>,
    },
}

impl GatewayEvent {
    pub fn request_id(&self) -> Uuid {
        match self {
            Self::ChatCompleted { request_id, .. } | Self::ChatFailed { request_id, .. } => {
                *request_id
            }
        }
    }

    pub fn provider_name(&self) -> &str {
        match self {
            Self::ChatCompleted { provider_name, .. } | Self::ChatFailed { provider_name, .. } => {
                provider_name
            }
        }
    }
}
