//! User settings persisted to `~/.config/nestcalc/settings.json`.
//!
//! The file is JSON with `//` comment lines allowed. Unknown or missing
//! fields fall back to defaults so older settings files keep working.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Supported AI providers for the advisor feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// AI features disabled (default)
    #[default]
    None,
    /// OpenAI API
    OpenAi,
    /// Google Gemini API
    Gemini,
    /// Local model via Ollama
    Local,
}

impl AiProvider {
    /// Returns true if AI features are enabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AiProvider::None)
    }

    /// Provider name as used in env vars and keychain accounts
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::None => "none",
            AiProvider::OpenAi => "openai",
            AiProvider::Gemini => "gemini",
            AiProvider::Local => "local",
        }
    }

    /// Returns the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::None => "",
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::Local => "llama3:8b",
        }
    }

    /// Whether the advisor has an implementation for this provider
    pub fn is_implemented(&self) -> bool {
        matches!(self, AiProvider::OpenAi | AiProvider::Gemini)
    }
}

/// AI-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Selected AI provider
    pub provider: AiProvider,

    /// Model identifier (provider-specific); empty = provider default
    pub model: String,

    /// Privacy mode: send derived metrics only, never raw inputs
    pub privacy_mode: bool,

    /// Custom API endpoint (Ollama URL, proxy, or test server)
    pub endpoint: Option<String>,

    /// Last time the API key was tested (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_key_test: Option<String>,

    /// Result of last key test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_key_test_result: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: AiProvider::None,
            model: String::new(),
            privacy_mode: true, // Privacy first
            endpoint: None,
            last_key_test: None,
            last_key_test_result: None,
        }
    }
}

impl AiSettings {
    /// Get the effective model (user-specified or provider default)
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }
}

/// Output formatting preferences for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Symbol prefixed to monetary values
    pub currency_symbol: String,
    /// Decimal places for monetary values
    pub decimal_places: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            decimal_places: 2,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ai: AiSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nestcalc");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error parsing {}: {}", path.display(), e);
                        eprintln!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_disabled_and_private() {
        let settings = Settings::default();
        assert_eq!(settings.ai.provider, AiProvider::None);
        assert!(settings.ai.privacy_mode);
        assert_eq!(settings.output.currency_symbol, "$");
    }

    #[test]
    fn effective_model_falls_back_to_provider_default() {
        let mut ai = AiSettings::default();
        ai.provider = AiProvider::OpenAi;
        assert_eq!(ai.effective_model(), "gpt-4o-mini");
        ai.model = "gpt-4o".to_string();
        assert_eq!(ai.effective_model(), "gpt-4o");
    }

    #[test]
    fn provider_serde_is_lowercase() {
        let json = serde_json::to_string(&AiProvider::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let back: AiProvider = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(back, AiProvider::Gemini);
    }

    #[test]
    fn round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.ai.provider = AiProvider::Gemini;
        settings.ai.model = "gemini-2.0-pro".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.ai.provider, AiProvider::Gemini);
        assert_eq!(loaded.ai.model, "gemini-2.0-pro");
    }

    #[test]
    fn comment_lines_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n// advisor settings\n\"ai\": {\"provider\": \"openai\"}\n}",
        )
        .unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.ai.provider, AiProvider::OpenAi);
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.ai.provider, AiProvider::None);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let loaded = Settings::load_from(Path::new("/nonexistent/settings.json"));
        assert_eq!(loaded.ai.provider, AiProvider::None);
    }
}
