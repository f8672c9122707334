// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! LLM gateway CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Implements the CLI commands, HTTP server bootstrap and the
//!   client for remote gateways

pub mod client;
pub mod commands;
pub mod server;
