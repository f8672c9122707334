// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gateway Configuration Types
//
// Defines the configuration schema for an LLM gateway process, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Provider descriptors (the registry's static table)
// - Outbound HTTP client limits
// - API server binding
// - Audit event bus and logging settings

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::provider::{ProviderDescriptor, ProviderFamily, ShapeTag};
use crate::infrastructure::llm::registry::{check_descriptor, RegistryError};

pub const API_VERSION: &str = "llm-gateway/v1";
pub const KIND: &str = "GatewayConfig";

/// Top-level Kubernetes-style gateway configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigManifest {
    /// API version (must be "llm-gateway/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "GatewayConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: GatewayConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable deployment name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Gateway configuration specification (content under spec:)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigSpec {
    /// Provider descriptors; omitted means the built-in table
    #[serde(default = "builtin_providers")]
    pub providers: Vec<ProviderDescriptor>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Default per-request deadline when the caller supplies none
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// How long idle pooled connections are kept
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Publish dispatch events on the event bus
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Events buffered per subscriber before the oldest are dropped
    #[serde(default = "default_audit_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// The provider table shipped with the gateway.
///
/// Self-hosted endpoints (Llama, Azure) are placeholders to be replaced per
/// deployment; the shape and auth taxonomy is what matters.
pub fn builtin_providers() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor::new(
            "GPT-3.5",
            ProviderFamily::OpenaiCompatible,
            "https://api.openai.com/v1/chat/completions",
            "OPENAI_API_KEY",
            "gpt-3.5-turbo",
            ShapeTag::CHAT_MESSAGES,
        ),
        ProviderDescriptor::new(
            "GPT-4",
            ProviderFamily::OpenaiCompatible,
            "https://api.openai.com/v1/chat/completions",
            "OPENAI_API_KEY",
            "gpt-4",
            ShapeTag::CHAT_MESSAGES,
        ),
        ProviderDescriptor::new(
            "Claude",
            ProviderFamily::AnthropicStyle,
            "https://api.anthropic.com/v1/complete",
            "ANTHROPIC_API_KEY",
            "claude-2",
            ShapeTag::PROMPT_COMPLETION,
        )
        .with_header("anthropic-version", "2023-06-01"),
        ProviderDescriptor::new(
            "Cohere",
            ProviderFamily::GenerativeText,
            "https://api.cohere.ai/v1/generate",
            "COHERE_API_KEY",
            "command",
            ShapeTag::GENERATION,
        ),
        ProviderDescriptor::new(
            "Llama-2",
            ProviderFamily::GenerativeText,
            "https://your-llama-2-endpoint.com/generate",
            "LLAMA_API_KEY",
            "llama-2-70b-chat",
            ShapeTag::TEXT_GENERATION,
        )
        .with_max_tokens(100),
        ProviderDescriptor::new(
            "Mistral-7B",
            ProviderFamily::GenerativeText,
            "https://api.mistral.ai/v1/chat/completions",
            "MISTRAL_API_KEY",
            "open-mistral-7b",
            ShapeTag::CHAT_MESSAGES,
        ),
        ProviderDescriptor::new(
            "Azure-OpenAI",
            ProviderFamily::OpenaiCompatible,
            "https://your-resource.openai.azure.com/openai/deployments/your-deployment/chat/completions?api-version=2023-05-15",
            "AZURE_OPENAI_API_KEY",
            "gpt-35-turbo",
            ShapeTag::API_KEY_HEADER,
        ),
    ]
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_pool_idle_timeout_secs() -> u64 {
    90
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_audit_capacity() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_audit_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for GatewayConfigSpec {
    fn default() -> Self {
        Self {
            providers: builtin_providers(),
            http: HttpConfig::default(),
            server: ServerConfig::default(),
            audit: AuditConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for GatewayConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "llm-gateway".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: GatewayConfigSpec::default(),
        }
    }
}

impl GatewayConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. LLM_GATEWAY_CONFIG_PATH environment variable
    /// 2. ./llm-gateway.yaml (working directory)
    /// 3. ~/.llm-gateway/config.yaml (user home)
    /// 4. /etc/llm-gateway/config.yaml (system, Unix) or C:\ProgramData\LlmGateway\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LLM_GATEWAY_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./llm-gateway.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".llm-gateway").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/llm-gateway/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\LlmGateway\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!(
                "No configuration file found in standard locations. Using built-in providers."
            );
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LLM_GATEWAY_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) if ms > 0 => {
                    tracing::info!("Environment override: LLM_GATEWAY_TIMEOUT_MS={}", ms);
                    self.spec.http.timeout_ms = ms;
                }
                _ => {
                    tracing::warn!(
                        "Invalid value for LLM_GATEWAY_TIMEOUT_MS: '{}'. Expected a positive integer. Ignoring.",
                        val
                    );
                }
            }
        }

        if let Ok(val) = std::env::var("LLM_GATEWAY_LOG_FORMAT") {
            match val.to_lowercase().as_str() {
                format @ ("json" | "text") => {
                    tracing::info!("Environment override: LLM_GATEWAY_LOG_FORMAT={}", format);
                    self.spec.observability.logging.format = format.to_string();
                }
                _ => {
                    tracing::warn!(
                        "Invalid value for LLM_GATEWAY_LOG_FORMAT: '{}'. Expected json/text. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        // Same rules the registry enforces; disabled entries are never registered.
        let mut seen = HashSet::new();
        for provider in self.spec.providers.iter().filter(|p| p.enabled) {
            check_descriptor(provider)?;

            if !seen.insert(provider.name.as_str()) {
                return Err(RegistryError::DuplicateProvider(provider.name.clone()).into());
            }
        }

        if self.spec.http.timeout_ms == 0 {
            anyhow::bail!("spec.http.timeout_ms must be greater than zero");
        }

        if self.spec.http.connect_timeout_ms == 0 {
            anyhow::bail!("spec.http.connect_timeout_ms must be greater than zero");
        }

        match self.spec.observability.logging.format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("Unknown log format '{}'. Expected json or text", other),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = GatewayConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, KIND);
        assert_eq!(manifest.spec.providers.len(), 7);
        assert_eq!(manifest.spec.http.timeout_ms, 30_000);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_minimal_yaml_uses_builtin_providers() {
        let yaml = r#"
apiVersion: llm-gateway/v1
kind: GatewayConfig
metadata:
  name: edge-gateway
spec: {}
"#;
        let manifest = GatewayConfigManifest::from_yaml_str(yaml).unwrap();
        let names: Vec<_> = manifest.spec.providers.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["GPT-3.5", "GPT-4", "Claude", "Cohere", "Llama-2", "Mistral-7B", "Azure-OpenAI"]
        );
        assert_eq!(manifest.spec.server.port, 8080);
        assert_eq!(manifest.spec.observability.logging.format, "text");
    }

    #[test]
    fn test_explicit_providers_replace_builtins() {
        let yaml = r#"
apiVersion: llm-gateway/v1
kind: GatewayConfig
metadata:
  name: staging
spec:
  providers:
    - name: Internal-Chat
      family: openai-compatible
      endpoint: http://10.0.0.12:8000/v1/chat/completions
      credential_key: env:INTERNAL_LLM_KEY
      model: qwen2.5-7b
      request_shape: chat-messages
      response_shape: chat-messages
      system_prompt: You are a helpful assistant.
  http:
    timeout_ms: 1500
"#;
        let manifest = GatewayConfigManifest::from_yaml_str(yaml).unwrap();

        assert_eq!(manifest.spec.providers.len(), 1);
        let provider = &manifest.spec.providers[0];
        assert_eq!(provider.family, ProviderFamily::OpenaiCompatible);
        assert_eq!(provider.credential_key, "env:INTERNAL_LLM_KEY");
        assert_eq!(manifest.spec.http.timeout(), Duration::from_millis(1500));
        assert_eq!(manifest.spec.http.connect_timeout_ms, 5_000);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut manifest = GatewayConfigManifest::default();
        assert!(manifest.validate().is_ok());

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        let duplicate = manifest.spec.providers[0].clone();
        manifest.spec.providers.push(duplicate);
        assert!(manifest.validate().is_err());
        manifest.spec.providers.pop();

        manifest.spec.providers[0].credential_key = String::new();
        assert!(manifest.validate().is_err());
        manifest.spec.providers[0].credential_key = "OPENAI_API_KEY".to_string();

        manifest.spec.providers[0].endpoint = "not a url".to_string();
        assert!(manifest.validate().is_err());
        manifest.spec.providers[0].endpoint = "https://api.openai.com/v1/chat/completions".to_string();

        manifest.spec.http.timeout_ms = 0;
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_disabled_placeholder_passes_validation() {
        let mut manifest = GatewayConfigManifest::default();
        let mut placeholder = manifest.spec.providers[0].clone();
        placeholder.name = "Self-Hosted".to_string();
        placeholder.endpoint = String::new();
        placeholder.enabled = false;
        manifest.spec.providers.push(placeholder.clone());
        assert!(manifest.validate().is_ok());

        // A disabled entry does not collide with an enabled one of the same name
        placeholder.name = manifest.spec.providers[0].name.clone();
        manifest.spec.providers.push(placeholder);
        assert!(manifest.validate().is_ok());

        manifest.spec.providers[7].enabled = true;
        let err = manifest.validate().unwrap_err();
        assert!(err.to_string().contains("Self-Hosted"));
    }

    #[test]
    fn test_validation_uses_registry_messages() {
        let mut manifest = GatewayConfigManifest::default();
        manifest.spec.providers[1].endpoint = "  ".to_string();

        let err = manifest.validate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<RegistryError>(),
            Some(&RegistryError::MissingEndpoint("GPT-4".to_string()))
        );
    }
}
