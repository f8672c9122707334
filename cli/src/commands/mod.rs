// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the LLM gateway CLI

pub mod chat;
pub mod config;
pub mod providers;
pub mod serve;

pub use self::chat::ChatArgs;
pub use self::config::ConfigCommand;
pub use self::providers::ProvidersArgs;
pub use self::serve::ServeArgs;
