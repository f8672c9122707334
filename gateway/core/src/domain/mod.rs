// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides the gateway's domain vocabulary.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements mod

pub mod chat;
pub mod credential;
pub mod events;
pub mod gateway_config;
pub mod outcome;
pub mod provider;
