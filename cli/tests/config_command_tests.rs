// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tests for the config and providers commands.

use std::sync::Arc;

use llm_gateway::commands::config::{generate, validate, EXAMPLES_TEMPLATE, MINIMAL_TEMPLATE};
use llm_gateway::commands::providers::local_rows;
use llm_gateway_core::domain::gateway_config::GatewayConfigManifest;
use llm_gateway_core::infrastructure::llm::{CredentialResolver, InMemoryCredentialSource};
use tempfile::TempDir;

#[test]
fn test_templates_are_valid_configs() {
    let minimal = GatewayConfigManifest::from_yaml_str(MINIMAL_TEMPLATE).unwrap();
    minimal.validate().unwrap();
    assert_eq!(minimal.spec.providers.len(), 7);

    let examples = GatewayConfigManifest::from_yaml_str(EXAMPLES_TEMPLATE).unwrap();
    examples.validate().unwrap();
    let names: Vec<_> = examples.spec.providers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["GPT-3.5", "GPT-4", "Claude", "Cohere", "Llama-2", "Mistral-7B", "Azure-OpenAI"]
    );
}

#[test]
fn test_generate_then_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("llm-gateway.yaml");

    generate(&path, true, false).unwrap();
    let config = validate(Some(path.clone())).unwrap();
    assert_eq!(config.metadata.name, "llm-gateway");

    // refuses to clobber without --force
    assert!(generate(&path, false, false).is_err());
    generate(&path, false, true).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MINIMAL_TEMPLATE);
}

#[test]
fn test_validate_rejects_duplicate_providers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dup.yaml");
    std::fs::write(
        &path,
        r#"
apiVersion: llm-gateway/v1
kind: GatewayConfig
metadata:
  name: dup
spec:
  providers:
    - name: GPT-4
      endpoint: https://api.openai.com/v1/chat/completions
      credential_key: OPENAI_API_KEY
      request_shape: chat-messages
      response_shape: chat-messages
    - name: GPT-4
      endpoint: https://api.openai.com/v1/chat/completions
      credential_key: OPENAI_API_KEY
      request_shape: chat-messages
      response_shape: chat-messages
"#,
    )
    .unwrap();

    let err = validate(Some(path)).unwrap_err();
    assert!(format!("{:#}", err).contains("Duplicate provider name: GPT-4"));
}

#[test]
fn test_validate_missing_explicit_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(validate(Some(dir.path().join("absent.yaml"))).is_err());
}

#[test]
fn test_provider_rows_report_credential_state() {
    let config = GatewayConfigManifest::default();
    let credentials = CredentialResolver::new(Arc::new(
        InMemoryCredentialSource::new().with("OPENAI_API_KEY", "sk-test"),
    ));

    let rows = local_rows(&config, &credentials).unwrap();
    assert_eq!(rows.len(), 7);

    let state = |name: &str| {
        rows.iter()
            .find(|row| row.summary.name == name)
            .and_then(|row| row.credential_set)
    };
    assert_eq!(state("GPT-4"), Some(true));
    assert_eq!(state("Claude"), Some(false));
}

#[test]
fn test_provider_rows_reject_invalid_config() {
    let mut config = GatewayConfigManifest::default();
    config.spec.http.timeout_ms = 0;
    let credentials = CredentialResolver::new(Arc::new(InMemoryCredentialSource::new()));

    let err = local_rows(&config, &credentials).unwrap_err();
    assert!(format!("{:#}", err).contains("timeout_ms"));
}

#[test]
fn test_validate_accepts_disabled_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("placeholder.yaml");
    std::fs::write(
        &path,
        r#"
apiVersion: llm-gateway/v1
kind: GatewayConfig
metadata:
  name: placeholder
spec:
  providers:
    - name: GPT-4
      endpoint: https://api.openai.com/v1/chat/completions
      credential_key: OPENAI_API_KEY
      request_shape: chat-messages
      response_shape: chat-messages
    - name: On-Prem
      endpoint: ""
      credential_key: ONPREM_API_KEY
      request_shape: text-generation
      response_shape: text-generation
      enabled: false
"#,
    )
    .unwrap();

    let config = validate(Some(path)).unwrap();
    assert_eq!(config.spec.providers.len(), 2);
}
