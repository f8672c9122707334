// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Credential Resolver
//
// Turns a descriptor's credential_key into a Credential. Every call rereads
// its source so keys added or rotated while the process runs are picked up by
// the next request. A miss is reported as MissingCredential, which callers can
// tell apart from an upstream 401.

use crate::domain::credential::{Credential, CredentialSource};
use crate::domain::outcome::{ErrorKind, GatewayFailure};
use crate::domain::provider::ProviderDescriptor;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Reads credentials from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialSource;

impl CredentialSource for EnvCredentialSource {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mutable in-process credential map (tests, embedding, rotation)
#[derive(Debug, Default)]
pub struct InMemoryCredentialSource {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl CredentialSource for InMemoryCredentialSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// Resolves the credential a descriptor needs
#[derive(Clone)]
pub struct CredentialResolver {
    source: Arc<dyn CredentialSource>,
}

impl CredentialResolver {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }

    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvCredentialSource))
    }

    /// Resolve the descriptor's credential.
    ///
    /// `credential_key` may be a bare name (`OPENAI_API_KEY`) or use the
    /// `env:OPENAI_API_KEY` form. Unset and blank values both fail.
    pub fn resolve(&self, descriptor: &ProviderDescriptor) -> Result<Credential, GatewayFailure> {
        let key = key_name(&descriptor.credential_key);

        match self.source.lookup(key) {
            Some(value) if !value.trim().is_empty() => Ok(Credential::new(value)),
            Some(_) => Err(GatewayFailure::new(
                ErrorKind::MissingCredential,
                &descriptor.name,
                format!("credential '{}' is set but empty", key),
            )),
            None => Err(GatewayFailure::new(
                ErrorKind::MissingCredential,
                &descriptor.name,
                format!("credential '{}' is not configured", key),
            )),
        }
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

fn key_name(credential_key: &str) -> &str {
    let key = credential_key.trim();
    key.strip_prefix("env:").unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::{ProviderFamily, ShapeTag};

    fn descriptor(credential_key: &str) -> ProviderDescriptor {
        ProviderDescriptor::new(
            "Cohere",
            ProviderFamily::GenerativeText,
            "https://api.cohere.ai/v1/generate",
            credential_key,
            "command",
            ShapeTag::GENERATION,
        )
    }

    #[test]
    fn test_unset_key_is_missing_credential() {
        let resolver = CredentialResolver::new(Arc::new(InMemoryCredentialSource::new()));

        let failure = resolver.resolve(&descriptor("COHERE_API_KEY")).unwrap_err();
        assert_eq!(failure.kind, ErrorKind::MissingCredential);
        assert_eq!(failure.provider_name, "Cohere");
        assert!(failure.detail.contains("COHERE_API_KEY"));
    }

    #[test]
    fn test_blank_value_is_missing_credential() {
        let source = InMemoryCredentialSource::new().with("COHERE_API_KEY", "   ");
        let resolver = CredentialResolver::new(Arc::new(source));

        let failure = resolver.resolve(&descriptor("COHERE_API_KEY")).unwrap_err();
        assert_eq!(failure.kind, ErrorKind::MissingCredential);
    }

    #[test]
    fn test_env_prefix_is_stripped() {
        let source = InMemoryCredentialSource::new().with("COHERE_API_KEY", "co-secret");
        let resolver = CredentialResolver::new(Arc::new(source));

        let credential = resolver.resolve(&descriptor("env:COHERE_API_KEY")).unwrap();
        assert_eq!(credential.expose(), "co-secret");
    }

    #[test]
    fn test_rereads_source_on_every_call() {
        let source = Arc::new(InMemoryCredentialSource::new());
        let resolver = CredentialResolver::new(source.clone());
        let descriptor = descriptor("COHERE_API_KEY");

        assert!(resolver.resolve(&descriptor).is_err());

        source.set("COHERE_API_KEY", "first");
        assert_eq!(resolver.resolve(&descriptor).unwrap().expose(), "first");

        source.set("COHERE_API_KEY", "rotated");
        assert_eq!(resolver.resolve(&descriptor).unwrap().expose(), "rotated");

        source.remove("COHERE_API_KEY");
        assert!(resolver.resolve(&descriptor).is_err());
    }

    #[test]
    fn test_env_source_reports_unset_variable() {
        let resolver = CredentialResolver::from_env();
        let failure = resolver
            .resolve(&descriptor("LLM_GATEWAY_TEST_SURELY_UNSET_KEY_8F2A"))
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::MissingCredential);
    }
}
