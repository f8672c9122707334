// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure
//!
//! Adapters between the gateway domain and the outside world: the provider
//! table, credential sources, wire-format codecs and the audit event bus.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements registry, shape codecs, credentials and event bus

pub mod event_bus;
pub mod llm;
