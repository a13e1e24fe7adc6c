//! AI advisor adapter.
//!
//! Takes the numbers a calculator produced, asks a hosted model for a
//! short natural-language read on them, and hands the text back. This is
//! a thin pass-through: no retry, no backoff, no caching. Callers that
//! want the original app's degraded behavior (a fixed string instead of
//! an error) use [`advise_or_fallback`].

pub mod client;
pub mod prompt;

use serde::{Deserialize, Serialize};

pub use client::{advise, Advice, AdviseError};
use nestcalc_config::ai::ResolvedAiConfig;

/// Fixed string returned when the model replies with empty text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Unable to generate insights at this moment.";

/// Fixed string returned by [`advise_or_fallback`] on any error.
pub const ERROR_FALLBACK: &str = "Error connecting to AI advisor. Please try again later.";

/// Which calculator produced the numbers being summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorKind {
    Mortgage,
    Investment,
    Affordability,
}

impl CalculatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Mortgage => "mortgage",
            CalculatorKind::Investment => "rental investment",
            CalculatorKind::Affordability => "affordability",
        }
    }
}

/// A calculator result packaged for the advisor.
#[derive(Debug, Clone)]
pub struct AdviceRequest {
    pub kind: CalculatorKind,
    /// JSON payload embedded in the prompt. With privacy mode on, the
    /// caller passes derived metrics only, never the raw inputs.
    pub data: serde_json::Value,
}

impl AdviceRequest {
    pub fn new(kind: CalculatorKind, data: &impl Serialize) -> Result<Self, AdviseError> {
        let data = serde_json::to_value(data)
            .map_err(|e| AdviseError::ParseError(format!("failed to serialize data: {}", e)))?;
        Ok(Self { kind, data })
    }
}

/// Like [`advise`], but degrades to a fixed string on any failure.
pub fn advise_or_fallback(config: &ResolvedAiConfig, request: &AdviceRequest) -> String {
    match advise(config, request) {
        Ok(advice) => advice.text,
        Err(err) => {
            eprintln!("AI advisor error: {}", err);
            ERROR_FALLBACK.to_string()
        }
    }
}
