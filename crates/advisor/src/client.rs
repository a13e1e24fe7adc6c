//! HTTP client for the advisor call.
//!
//! Supports OpenAI chat completions and Google Gemini generateContent.
//! Blocking calls with a 60 second timeout; run from a background thread
//! if the caller is interactive.

use serde::{Deserialize, Serialize};

use nestcalc_config::ai::ResolvedAiConfig;
use nestcalc_config::settings::AiProvider;

use crate::prompt;
use crate::{AdviceRequest, EMPTY_RESPONSE_FALLBACK};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const MAX_TOKENS: u32 = 512;

/// Advice returned by the model
#[derive(Debug, Clone)]
pub struct Advice {
    /// Natural-language summary
    pub text: String,
    /// Model that produced it
    pub model: String,
    /// Warnings about the response
    pub warnings: Vec<String>,
}

/// Error from the advisor call
#[derive(Debug, Clone)]
pub enum AdviseError {
    /// Provider not configured
    NotConfigured(String),
    /// Provider not implemented
    NotImplemented(String),
    /// API key missing
    MissingKey,
    /// Network error
    NetworkError(String),
    /// API error response
    ApiError { status: u16, message: String },
    /// Failed to parse response
    ParseError(String),
    /// Provider returned unexpected format
    InvalidResponse(String),
}

impl std::fmt::Display for AdviseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdviseError::NotConfigured(msg) => write!(f, "AI not configured: {}", msg),
            AdviseError::NotImplemented(msg) => write!(f, "Provider not implemented: {}", msg),
            AdviseError::MissingKey => write!(f, "API key not configured"),
            AdviseError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AdviseError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            AdviseError::ParseError(msg) => write!(f, "Failed to parse response: {}", msg),
            AdviseError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AdviseError {}

// ============================================================================
// OpenAI API types
// ============================================================================

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// Gemini API types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

// ============================================================================
// Main API
// ============================================================================

/// Ask the configured provider for advice on a calculator result.
///
/// This is a blocking call - use in a background task.
pub fn advise(config: &ResolvedAiConfig, request: &AdviceRequest) -> Result<Advice, AdviseError> {
    match config.provider {
        AiProvider::None => {
            return Err(AdviseError::NotConfigured("AI is disabled".to_string()));
        }
        AiProvider::OpenAi | AiProvider::Gemini => {
            // Continue below
        }
        AiProvider::Local => {
            return Err(AdviseError::NotImplemented(format!(
                "{} provider not yet implemented",
                config.provider.name()
            )));
        }
    }

    let api_key = config.api_key.as_ref().ok_or(AdviseError::MissingKey)?;

    let text = match config.provider {
        AiProvider::OpenAi => call_openai(config, api_key, request)?,
        AiProvider::Gemini => call_gemini(config, api_key, request)?,
        _ => unreachable!(),
    };

    let mut warnings = Vec::new();
    let text = if text.trim().is_empty() {
        warnings.push("Model returned empty text".to_string());
        EMPTY_RESPONSE_FALLBACK.to_string()
    } else {
        text.trim().to_string()
    };

    Ok(Advice {
        text,
        model: config.model.clone(),
        warnings,
    })
}

fn http_client() -> Result<reqwest::blocking::Client, AdviseError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .map_err(|e| AdviseError::NetworkError(e.to_string()))
}

fn call_openai(
    config: &ResolvedAiConfig,
    api_key: &str,
    request: &AdviceRequest,
) -> Result<String, AdviseError> {
    let client = http_client()?;

    let base = config.endpoint.as_deref().unwrap_or(OPENAI_API_BASE);
    let url = format!("{}/chat/completions", base);

    let body = OpenAiRequest {
        model: config.model.clone(),
        messages: vec![
            OpenAiMessage {
                role: "system".to_string(),
                content: prompt::system_prompt(),
            },
            OpenAiMessage {
                role: "user".to_string(),
                content: prompt::user_prompt(request),
            },
        ],
        temperature: TEMPERATURE,
        top_p: TOP_P,
        max_tokens: MAX_TOKENS,
    };

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .map_err(|e| AdviseError::NetworkError(e.to_string()))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().unwrap_or_default();
        if let Ok(error) = serde_json::from_str::<OpenAiError>(&error_text) {
            return Err(AdviseError::ApiError {
                status: status.as_u16(),
                message: error.error.message,
            });
        }
        return Err(AdviseError::ApiError {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let response_body: OpenAiResponse = response
        .json()
        .map_err(|e| AdviseError::ParseError(e.to_string()))?;

    response_body
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .ok_or_else(|| AdviseError::InvalidResponse("No choices in response".to_string()))
}

fn call_gemini(
    config: &ResolvedAiConfig,
    api_key: &str,
    request: &AdviceRequest,
) -> Result<String, AdviseError> {
    let client = http_client()?;

    let base = config.endpoint.as_deref().unwrap_or(GEMINI_API_BASE);
    let url = format!("{}/models/{}:generateContent", base, config.model);

    // Gemini has no system/user split in this endpoint; send one prompt
    let body = GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: prompt::combined_prompt(request),
            }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_output_tokens: MAX_TOKENS,
        },
    };

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .map_err(|e| AdviseError::NetworkError(e.to_string()))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().unwrap_or_default();
        if let Ok(error) = serde_json::from_str::<GeminiError>(&error_text) {
            return Err(AdviseError::ApiError {
                status: status.as_u16(),
                message: error.error.message,
            });
        }
        return Err(AdviseError::ApiError {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let response_body: GeminiResponse = response
        .json()
        .map_err(|e| AdviseError::ParseError(e.to_string()))?;

    let text = response_body
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .ok_or_else(|| AdviseError::InvalidResponse("No candidates in response".to_string()))?;

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalculatorKind;
    use httpmock::prelude::*;
    use nestcalc_config::ai::{AiConfigStatus, KeySource};

    fn config(provider: AiProvider, endpoint: &str) -> ResolvedAiConfig {
        ResolvedAiConfig {
            provider,
            model: provider.default_model().to_string(),
            endpoint: Some(endpoint.to_string()),
            privacy_mode: true,
            api_key: Some("test-key".to_string()),
            key_source: KeySource::Environment,
            status: AiConfigStatus::Ready,
            blocking_reason: None,
        }
    }

    fn request() -> AdviceRequest {
        AdviceRequest {
            kind: CalculatorKind::Mortgage,
            data: serde_json::json!({"monthly_payment": 2572.62}),
        }
    }

    #[test]
    fn openai_success_returns_text() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200).json_body(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "- Looks solid.\n- Rates are high."}}
                ]
            }));
        });

        let advice = advise(&config(AiProvider::OpenAi, &server.base_url()), &request()).unwrap();
        assert_eq!(advice.text, "- Looks solid.\n- Rates are high.");
        assert!(advice.warnings.is_empty());
        mock.assert();
    }

    #[test]
    fn openai_error_maps_to_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).json_body(serde_json::json!({
                "error": {"message": "Invalid API key"}
            }));
        });

        let err = advise(&config(AiProvider::OpenAi, &server.base_url()), &request()).unwrap_err();
        match err {
            AdviseError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn gemini_success_joins_parts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-2.0-flash:generateContent")
                .header("x-goog-api-key", "test-key");
            then.status(200).json_body(serde_json::json!({
                "candidates": [
                    {"content": {"parts": [{"text": "- Cap rate is "}, {"text": "healthy."}]}}
                ]
            }));
        });

        let advice = advise(&config(AiProvider::Gemini, &server.base_url()), &request()).unwrap();
        assert_eq!(advice.text, "- Cap rate is healthy.");
        mock.assert();
    }

    #[test]
    fn empty_model_text_falls_back_with_warning() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  "}}]
            }));
        });

        let advice = advise(&config(AiProvider::OpenAi, &server.base_url()), &request()).unwrap();
        assert_eq!(advice.text, EMPTY_RESPONSE_FALLBACK);
        assert_eq!(advice.warnings.len(), 1);
    }

    #[test]
    fn missing_key_errors_before_any_request() {
        let mut config = config(AiProvider::OpenAi, "http://127.0.0.1:1");
        config.api_key = None;
        let err = advise(&config, &request()).unwrap_err();
        assert!(matches!(err, AdviseError::MissingKey));
    }

    #[test]
    fn disabled_provider_is_not_configured() {
        let config = config(AiProvider::None, "http://127.0.0.1:1");
        let err = advise(&config, &request()).unwrap_err();
        assert!(matches!(err, AdviseError::NotConfigured(_)));
    }

    #[test]
    fn local_provider_is_not_implemented() {
        let config = config(AiProvider::Local, "http://127.0.0.1:1");
        let err = advise(&config, &request()).unwrap_err();
        assert!(matches!(err, AdviseError::NotImplemented(_)));
    }

    #[test]
    fn network_failure_maps_to_network_error() {
        // Nothing listens on this port
        let config = config(AiProvider::OpenAi, "http://127.0.0.1:9");
        let err = advise(&config, &request()).unwrap_err();
        assert!(matches!(err, AdviseError::NetworkError(_)));
    }
}
