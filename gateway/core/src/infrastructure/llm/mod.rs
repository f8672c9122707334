// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure

pub mod credentials;
pub mod normalizer;
pub mod registry;
pub mod shapes;
pub mod transformer;

pub use credentials::{CredentialResolver, EnvCredentialSource, InMemoryCredentialSource};
pub use registry::{ProviderRegistry, RegistryError};
pub use shapes::{AuthScheme, RequestCodec, ResponseCodec, ShapeTable};
pub use transformer::OutboundRequest;
