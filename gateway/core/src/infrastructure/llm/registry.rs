// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Provider Name Resolution
//
// Holds the immutable descriptor table built at process start. Construction
// is the only place descriptors are checked for completeness; a registry that
// exists is safe to dispatch against and may be shared across any number of
// concurrent readers.

use crate::domain::gateway_config::GatewayConfigManifest;
use crate::domain::provider::{ProviderDescriptor, ProviderSummary};
use std::collections::HashMap;
use tracing::info;

/// Startup-time registry construction failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Provider name cannot be empty")]
    EmptyName,

    #[error("Duplicate provider name: {0}")]
    DuplicateProvider(String),

    #[error("Provider endpoint cannot be empty for: {0}")]
    MissingEndpoint(String),

    #[error("Provider endpoint is not a valid URL for {name}: {reason}")]
    InvalidEndpoint { name: String, reason: String },

    #[error("Provider credential_key cannot be empty for: {0}")]
    MissingCredentialKey(String),
}

/// Checks the fields every dispatchable descriptor must carry
pub fn check_descriptor(descriptor: &ProviderDescriptor) -> Result<(), RegistryError> {
    if descriptor.name.trim().is_empty() {
        return Err(RegistryError::EmptyName);
    }

    if descriptor.endpoint.trim().is_empty() {
        return Err(RegistryError::MissingEndpoint(descriptor.name.clone()));
    }

    if let Err(e) = url::Url::parse(&descriptor.endpoint) {
        return Err(RegistryError::InvalidEndpoint {
            name: descriptor.name.clone(),
            reason: e.to_string(),
        });
    }

    if descriptor.credential_key.trim().is_empty() {
        return Err(RegistryError::MissingCredentialKey(descriptor.name.clone()));
    }

    Ok(())
}

/// Read-only table of provider descriptors keyed by name
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderDescriptor>,
    order: Vec<String>, // declaration order, for listings
}

impl ProviderRegistry {
    /// Build a registry, rejecting duplicates and incomplete descriptors.
    /// Disabled descriptors are skipped.
    pub fn new(
        descriptors: impl IntoIterator<Item = ProviderDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut providers = HashMap::new();
        let mut order = Vec::new();

        for descriptor in descriptors {
            if !descriptor.enabled {
                info!("Provider '{}' disabled, skipping", descriptor.name);
                continue;
            }

            check_descriptor(&descriptor)?;

            if providers.contains_key(&descriptor.name) {
                return Err(RegistryError::DuplicateProvider(descriptor.name));
            }

            info!(
                "Registering provider '{}' ({}, request={}, response={})",
                descriptor.name, descriptor.family, descriptor.request_shape, descriptor.response_shape
            );
            order.push(descriptor.name.clone());
            providers.insert(descriptor.name.clone(), descriptor);
        }

        if providers.is_empty() {
            tracing::warn!("No LLM providers registered - every dispatch will fail with UnknownProvider");
        }

        Ok(Self { providers, order })
    }

    /// Create provider registry from gateway configuration
    pub fn from_config(config: &GatewayConfigManifest) -> Result<Self, RegistryError> {
        info!("Initializing LLM provider registry");
        Self::new(config.spec.providers.iter().cloned())
    }

    /// Look up a descriptor by exact name
    pub fn lookup(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.order.iter().filter_map(|name| self.providers.get(name))
    }

    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.descriptors().map(ProviderDescriptor::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
