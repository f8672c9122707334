// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application
//!
//! Use cases that drive the domain through the infrastructure adapters.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Implements the chat dispatch use case

pub mod dispatcher;

pub use dispatcher::{ChatService, Gateway, GatewayBuilder};
