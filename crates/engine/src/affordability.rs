//! Affordability calculator: how much house a gross income can carry.
//!
//! Uses the conventional 28% front-end ratio: at most 28% of gross
//! monthly income goes to the mortgage payment, after existing monthly
//! debt obligations. The payment ceiling is inverted through the
//! annuity formula over a standard 30-year term.

use serde::{Deserialize, Serialize};

use crate::annuity;
use crate::mortgage::MAX_ANNUAL_RATE_PCT;
use crate::validate::{self, CalcError};

/// Share of gross monthly income available for the mortgage payment.
pub const FRONT_END_RATIO: f64 = 0.28;

/// Term assumed when sizing the maximum loan.
pub const AFFORDABILITY_TERM_YEARS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInputs {
    /// Gross annual income
    pub annual_income: f64,
    /// Existing monthly debt payments (cars, cards, student loans)
    pub monthly_debts: f64,
    /// Cash available for a down payment
    pub down_payment: f64,
    /// Annual interest rate as a percent
    pub annual_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResults {
    /// Maximum purchase price: max loan + down payment
    pub max_home_price: f64,
    /// Maximum loan the payment ceiling can service
    pub max_loan: f64,
    /// Monthly payment ceiling after debts
    pub max_monthly_payment: f64,
}

fn validate(inputs: &AffordabilityInputs) -> Result<(), CalcError> {
    validate::positive(inputs.annual_income, "annual income")?;
    validate::non_negative(inputs.monthly_debts, "monthly debts")?;
    validate::non_negative(inputs.down_payment, "down payment")?;
    validate::percentage(inputs.annual_rate_pct, "interest rate", MAX_ANNUAL_RATE_PCT)?;
    Ok(())
}

pub fn calculate(inputs: &AffordabilityInputs) -> Result<AffordabilityResults, CalcError> {
    validate(inputs)?;

    let monthly_income = inputs.annual_income / 12.0;
    let ceiling = monthly_income * FRONT_END_RATIO - inputs.monthly_debts;

    // Debts already consume the whole budget: floor at zero rather than
    // reporting a negative price.
    if ceiling <= 0.0 {
        return Ok(AffordabilityResults {
            max_home_price: inputs.down_payment,
            max_loan: 0.0,
            max_monthly_payment: 0.0,
        });
    }

    let rate = annuity::monthly_rate(inputs.annual_rate_pct);
    let months = AFFORDABILITY_TERM_YEARS * 12;
    let max_loan = annuity::principal_for_payment(rate, months, ceiling);

    Ok(AffordabilityResults {
        max_home_price: max_loan + inputs.down_payment,
        max_loan,
        max_monthly_payment: ceiling,
    })
}
