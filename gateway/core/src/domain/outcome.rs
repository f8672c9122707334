// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Outcome
//!
//! The normalized result every dispatch terminates in.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements the tagged success/failure outcome and its error taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure taxonomy exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request failed basic validation (blank message or provider name)
    InvalidRequest,
    /// No registered provider has the requested name
    UnknownProvider,
    /// The provider's shape tags have no registered encoder/decoder
    UnsupportedProvider,
    /// The descriptor cannot be used to build a request
    MisconfiguredProvider,
    /// The credential entry is unset or empty
    MissingCredential,
    /// DNS, TLS, connect, or deadline fault
    NetworkError,
    /// Upstream answered with a non-2xx status
    UpstreamError,
    /// Upstream answered 2xx but the text was not at the expected path
    MalformedResponse,
}

impl ErrorKind {
    /// Detected before any network call; needs operator or caller action
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest
                | Self::UnknownProvider
                | Self::UnsupportedProvider
                | Self::MisconfiguredProvider
                | Self::MissingCredential
        )
    }

    /// Raised by the round trip itself; callers may choose to retry
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError | Self::UpstreamError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::UnknownProvider => "UnknownProvider",
            Self::UnsupportedProvider => "UnsupportedProvider",
            Self::MisconfiguredProvider => "MisconfiguredProvider",
            Self::MissingCredential => "MissingCredential",
            Self::NetworkError => "NetworkError",
            Self::UpstreamError => "UpstreamError",
            Self::MalformedResponse => "MalformedResponse",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure. `detail` never contains a credential or a raw body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{kind} from provider '{provider_name}': {detail}")]
pub struct GatewayFailure {
    pub kind: ErrorKind,
    pub provider_name: String,
    pub detail: String,
}

impl GatewayFailure {
    pub fn new(kind: ErrorKind, provider_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            provider_name: provider_name.into(),
            detail: detail.into(),
        }
    }
}

/// What a caller observes for every dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GatewayOutcome {
    Success { content: String },
    Failure(GatewayFailure),
}

impl GatewayOutcome {
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
        }
    }

    pub fn failure(kind: ErrorKind, provider_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Failure(GatewayFailure::new(kind, provider_name, detail))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Success { content } => Some(content),
            Self::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&GatewayFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_failure().map(|f| f.kind)
    }

    pub fn into_result(self) -> Result<String, GatewayFailure> {
        match self {
            Self::Success { content } => Ok(content),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<Result<String, GatewayFailure>> for GatewayOutcome {
    fn from(result: Result<String, GatewayFailure>) -> Self {
        match result {
            Ok(content) => Self::Success { content },
            Err(failure) => Self::Failure(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes_are_disjoint() {
        let all = [
            ErrorKind::InvalidRequest,
            ErrorKind::UnknownProvider,
            ErrorKind::UnsupportedProvider,
            ErrorKind::MisconfiguredProvider,
            ErrorKind::MissingCredential,
            ErrorKind::NetworkError,
            ErrorKind::UpstreamError,
            ErrorKind::MalformedResponse,
        ];
        for kind in all {
            assert!(!(kind.is_configuration() && kind.is_transport()), "{kind}");
        }
        assert!(!ErrorKind::MalformedResponse.is_configuration());
        assert!(!ErrorKind::MalformedResponse.is_transport());
    }

    #[test]
    fn test_outcome_serialization() {
        let ok = serde_json::to_value(GatewayOutcome::success("hi")).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "success", "content": "hi"}));

        let failed = serde_json::to_value(GatewayOutcome::failure(
            ErrorKind::UnknownProvider,
            "GPT-5",
            "no provider named 'GPT-5'",
        ))
        .unwrap();
        assert_eq!(failed["status"], "failure");
        assert_eq!(failed["kind"], "UnknownProvider");
        assert_eq!(failed["providerName"], "GPT-5");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(GatewayOutcome::success("x").into_result().unwrap(), "x");

        let err = GatewayOutcome::failure(ErrorKind::NetworkError, "Claude", "timeout")
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "NetworkError from provider 'Claude': timeout");
    }
}
