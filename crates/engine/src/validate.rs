//! Input validation for calculator inputs
//!
//! Every calculator validates its inputs up front and returns a typed
//! error instead of letting NaN or Infinity leak into results. The
//! policy is strict: non-finite values and negative money are rejected,
//! and any field used as a divisor must be strictly positive.

use std::fmt;

/// Error from calculator input validation or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Field is NaN or infinite
    NotFinite { field: &'static str },
    /// Field is negative
    Negative { field: &'static str },
    /// Field is zero but used as a divisor
    Zero { field: &'static str },
    /// Down payment larger than the purchase price
    DownPaymentExceedsPrice,
    /// Percentage field outside its allowed range
    RateOutOfRange { field: &'static str, max: f64 },
    /// Loan term of zero years
    ZeroTerm,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::NotFinite { field } => {
                write!(f, "{} must be a finite number", field)
            }
            CalcError::Negative { field } => {
                write!(f, "{} cannot be negative", field)
            }
            CalcError::Zero { field } => {
                write!(f, "{} must be greater than zero", field)
            }
            CalcError::DownPaymentExceedsPrice => {
                write!(f, "down payment cannot exceed the purchase price")
            }
            CalcError::RateOutOfRange { field, max } => {
                write!(f, "{} must be between 0 and {}", field, max)
            }
            CalcError::ZeroTerm => {
                write!(f, "loan term must be at least 1 year")
            }
        }
    }
}

impl std::error::Error for CalcError {}

/// Reject NaN/infinite values.
pub(crate) fn finite(value: f64, field: &'static str) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite { field })
    }
}

/// Reject NaN/infinite and negative values. Zero is allowed.
pub(crate) fn non_negative(value: f64, field: &'static str) -> Result<f64, CalcError> {
    let value = finite(value, field)?;
    if value < 0.0 {
        Err(CalcError::Negative { field })
    } else {
        Ok(value)
    }
}

/// Reject anything that is not strictly positive. Used for divisors.
pub(crate) fn positive(value: f64, field: &'static str) -> Result<f64, CalcError> {
    let value = non_negative(value, field)?;
    if value == 0.0 {
        Err(CalcError::Zero { field })
    } else {
        Ok(value)
    }
}

/// Percentage in [0, max].
pub(crate) fn percentage(value: f64, field: &'static str, max: f64) -> Result<f64, CalcError> {
    let value = non_negative(value, field)?;
    if value > max {
        Err(CalcError::RateOutOfRange { field, max })
    } else {
        Ok(value)
    }
}
