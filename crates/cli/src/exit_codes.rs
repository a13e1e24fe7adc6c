//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | calc             | Calculator input/evaluation codes        |
//! | 10-19   | ai               | AI provider/keychain codes               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use nestcalc_advisor::AdviseError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Calc (3-9)
// =============================================================================

/// Calculator rejected its inputs (negative money, division by zero,
/// non-finite value).
pub const EXIT_CALC_INVALID: u8 = 3;

// =============================================================================
// AI (10-19)
// =============================================================================

/// AI disabled (provider=none) or provider not implemented.
pub const EXIT_AI_DISABLED: u8 = 10;

/// AI provider configured but API key missing.
pub const EXIT_AI_MISSING_KEY: u8 = 11;

/// Keychain error (cannot read/write credentials).
pub const EXIT_AI_KEYCHAIN_ERR: u8 = 12;

/// Network failure reaching the provider.
pub const EXIT_AI_NETWORK: u8 = 13;

/// Provider returned an error response (4xx/5xx).
pub const EXIT_AI_PROVIDER: u8 = 14;

/// Provider response could not be parsed.
pub const EXIT_AI_PARSE: u8 = 15;

/// Map an AdviseError to its exit code.
pub fn advise_exit_code(err: &AdviseError) -> u8 {
    match err {
        AdviseError::NotConfigured(_) => EXIT_AI_DISABLED,
        AdviseError::NotImplemented(_) => EXIT_AI_DISABLED,
        AdviseError::MissingKey => EXIT_AI_MISSING_KEY,
        AdviseError::NetworkError(_) => EXIT_AI_NETWORK,
        AdviseError::ApiError { .. } => EXIT_AI_PROVIDER,
        AdviseError::ParseError(_) => EXIT_AI_PARSE,
        AdviseError::InvalidResponse(_) => EXIT_AI_PARSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advise_errors_map_into_the_ai_range() {
        let errors = [
            AdviseError::NotConfigured("off".into()),
            AdviseError::MissingKey,
            AdviseError::NetworkError("refused".into()),
            AdviseError::ApiError { status: 500, message: "boom".into() },
            AdviseError::ParseError("bad json".into()),
        ];
        for err in errors {
            let code = advise_exit_code(&err);
            assert!((10..20).contains(&code), "{:?} -> {}", err, code);
        }
    }
}
