// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Credential Domain Types
//
// A credential is resolved per request and dropped with the outbound call.
// The secret is only reachable through `expose()`; Debug output is redacted.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Secret used to authenticate against one provider
pub struct Credential(SecretString);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Where credential values are read from.
///
/// Implementations must read current state on every call; the resolver does
/// not cache hits or misses.
pub trait CredentialSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}
