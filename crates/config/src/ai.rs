//! AI configuration and secrets management
//!
//! API keys are stored securely using:
//! 1. System keychain (preferred)
//! 2. Environment variables (fallback for CI/headless)
//!
//! Keys are NEVER stored in settings.json

use std::env;

use crate::settings::{AiProvider, Settings};

/// Service name for keychain storage
const KEYCHAIN_SERVICE: &str = "nestcalc";

/// Source of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Key retrieved from system keychain
    Keychain,
    /// Key retrieved from environment variable
    Environment,
    /// No key found
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Keychain => "keychain",
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Get the environment variable name for a provider
pub fn env_var_name(provider: AiProvider) -> String {
    format!("NESTCALC_{}_KEY", provider.name().to_uppercase())
}

/// Get the keychain account name for a provider
fn keychain_account(provider: AiProvider) -> String {
    format!("ai/{}", provider.name())
}

/// Get an API key for the specified provider
///
/// Checks in order:
/// 1. System keychain
/// 2. Environment variable (NESTCALC_OPENAI_KEY, etc.)
pub fn get_api_key(provider: AiProvider) -> KeyLookup {
    // Try keychain first
    #[cfg(feature = "keychain")]
    {
        if let Ok(entry) = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider)) {
            if let Ok(key) = entry.get_password() {
                return KeyLookup {
                    key: Some(key),
                    source: KeySource::Keychain,
                };
            }
        }
    }

    // Fall back to environment variable
    let env_name = env_var_name(provider);
    if let Ok(key) = env::var(&env_name) {
        if !key.is_empty() {
            return KeyLookup {
                key: Some(key),
                source: KeySource::Environment,
            };
        }
    }

    KeyLookup {
        key: None,
        source: KeySource::None,
    }
}

/// Store an API key in the system keychain
#[cfg(feature = "keychain")]
pub fn set_api_key(provider: AiProvider, key: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider))
        .map_err(|e| format!("Failed to create keychain entry: {}", e))?;

    entry
        .set_password(key)
        .map_err(|e| format!("Failed to store key in keychain: {}", e))
}

#[cfg(not(feature = "keychain"))]
pub fn set_api_key(provider: AiProvider, _key: &str) -> Result<(), String> {
    Err(format!(
        "Keychain support not enabled. Set {} environment variable instead.",
        env_var_name(provider)
    ))
}

/// Delete an API key from the system keychain
#[cfg(feature = "keychain")]
pub fn delete_api_key(provider: AiProvider) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider))
        .map_err(|e| format!("Failed to access keychain entry: {}", e))?;

    entry
        .delete_credential()
        .map_err(|e| format!("Failed to delete key from keychain: {}", e))
}

#[cfg(not(feature = "keychain"))]
pub fn delete_api_key(_provider: AiProvider) -> Result<(), String> {
    Err("Keychain support not enabled.".to_string())
}

/// Check if keychain support is available
pub fn keychain_available() -> bool {
    #[cfg(feature = "keychain")]
    {
        keyring::Entry::new(KEYCHAIN_SERVICE, "test").is_ok()
    }
    #[cfg(not(feature = "keychain"))]
    {
        false
    }
}

// ============================================================================
// Resolved AI Configuration (single source of truth)
// ============================================================================

/// The effective AI configuration, fully resolved from all sources.
/// This is the single source of truth for runtime advisor behavior.
#[derive(Debug, Clone)]
pub struct ResolvedAiConfig {
    /// Effective provider (None, OpenAI, Gemini, Local)
    pub provider: AiProvider,
    /// Effective model (resolved from settings or provider default)
    pub model: String,
    /// Custom endpoint (Ollama URL, proxy, or test server)
    pub endpoint: Option<String>,
    /// Privacy mode setting
    pub privacy_mode: bool,
    /// API key (if available and provider needs one)
    pub api_key: Option<String>,
    /// Source of the API key
    pub key_source: KeySource,
    /// Overall status
    pub status: AiConfigStatus,
    /// Human-readable reason if not ready
    pub blocking_reason: Option<String>,
}

/// Status of the AI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiConfigStatus {
    /// AI is disabled (provider = None)
    Disabled,
    /// Configuration is valid and provider is implemented
    Ready,
    /// Configuration is valid but provider not yet implemented
    NotImplemented,
    /// Provider is configured but API key is missing
    MissingKey,
}

impl AiConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Ready => "ready",
            Self::NotImplemented => "not_implemented",
            Self::MissingKey => "missing_key",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl ResolvedAiConfig {
    /// Resolve from settings on disk plus keychain/environment.
    pub fn load() -> Self {
        Self::from_settings(&Settings::load())
    }

    /// Resolve from an already-loaded settings struct.
    pub fn from_settings(settings: &Settings) -> Self {
        let ai = &settings.ai;
        let provider = ai.provider;

        if !provider.is_enabled() {
            return Self {
                provider,
                model: String::new(),
                endpoint: ai.endpoint.clone(),
                privacy_mode: ai.privacy_mode,
                api_key: None,
                key_source: KeySource::None,
                status: AiConfigStatus::Disabled,
                blocking_reason: Some("provider=none".to_string()),
            };
        }

        let lookup = get_api_key(provider);
        let model = ai.effective_model().to_string();

        let (status, blocking_reason) = if !provider.is_implemented() {
            (
                AiConfigStatus::NotImplemented,
                Some(format!("{} provider not yet implemented", provider.name())),
            )
        } else if lookup.key.is_none() {
            (
                AiConfigStatus::MissingKey,
                Some("missing_api_key".to_string()),
            )
        } else {
            (AiConfigStatus::Ready, None)
        };

        Self {
            provider,
            model,
            endpoint: ai.endpoint.clone(),
            privacy_mode: ai.privacy_mode,
            api_key: lookup.key,
            key_source: lookup.source,
            status,
            blocking_reason,
        }
    }

    /// Override the API key (e.g. from a --api-key flag).
    pub fn with_api_key(mut self, key: String) -> Self {
        self.api_key = Some(key);
        self.key_source = KeySource::Environment;
        if self.status == AiConfigStatus::MissingKey {
            self.status = AiConfigStatus::Ready;
            self.blocking_reason = None;
        }
        self
    }

    /// Override the endpoint (e.g. from a --endpoint flag).
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
}
