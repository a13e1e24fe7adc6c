//! Mortgage calculator: level-payment amortization with yearly schedule
//! samples, plus property tax and insurance folded into the monthly
//! payment.

use serde::{Deserialize, Serialize};

use crate::annuity;
use crate::validate::{self, CalcError};

/// Annual rate cap. Anything above this is a data-entry error.
pub const MAX_ANNUAL_RATE_PCT: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInputs {
    /// Purchase price of the home
    pub home_price: f64,
    /// Cash paid up front
    pub down_payment: f64,
    /// Loan term in years
    pub loan_term_years: u32,
    /// Annual interest rate as a percent (e.g. 6.5)
    pub annual_rate_pct: f64,
    /// Annual property tax
    pub annual_property_tax: f64,
    /// Annual homeowner's insurance
    pub annual_insurance: f64,
}

/// One yearly sample of the amortization schedule.
///
/// `principal` and `interest` are the split of the payment made in the
/// sampled month, matching what a payment-breakdown chart plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePoint {
    pub year: u32,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageResults {
    /// Full monthly payment: loan payment + tax/12 + insurance/12
    pub monthly_payment: f64,
    /// Principal + interest portion only
    pub loan_payment: f64,
    /// Interest paid over the life of the loan
    pub total_interest: f64,
    /// Principal + total interest
    pub total_cost: f64,
    /// Yearly amortization samples (last point is the final month)
    pub schedule: Vec<SchedulePoint>,
}

fn validate(inputs: &MortgageInputs) -> Result<(), CalcError> {
    let home_price = validate::positive(inputs.home_price, "home price")?;
    let down_payment = validate::non_negative(inputs.down_payment, "down payment")?;
    if down_payment > home_price {
        return Err(CalcError::DownPaymentExceedsPrice);
    }
    if inputs.loan_term_years == 0 {
        return Err(CalcError::ZeroTerm);
    }
    validate::percentage(inputs.annual_rate_pct, "interest rate", MAX_ANNUAL_RATE_PCT)?;
    validate::non_negative(inputs.annual_property_tax, "property tax")?;
    validate::non_negative(inputs.annual_insurance, "insurance")?;
    Ok(())
}

pub fn calculate(inputs: &MortgageInputs) -> Result<MortgageResults, CalcError> {
    validate(inputs)?;

    let principal = inputs.home_price - inputs.down_payment;
    let rate = annuity::monthly_rate(inputs.annual_rate_pct);
    let total_months = inputs.loan_term_years * 12;

    let loan_payment = annuity::payment(rate, total_months, principal);

    let mut schedule = Vec::with_capacity(inputs.loan_term_years as usize);
    let mut remaining = principal;
    let mut total_interest = 0.0;

    for month in 1..=total_months {
        let interest = remaining * rate;
        let principal_paid = loan_payment - interest;
        remaining -= principal_paid;
        total_interest += interest;

        if month % 12 == 0 || month == total_months {
            schedule.push(SchedulePoint {
                year: month.div_ceil(12),
                principal: principal_paid,
                interest,
                remaining_balance: remaining.max(0.0),
            });
        }
    }

    Ok(MortgageResults {
        monthly_payment: loan_payment
            + inputs.annual_property_tax / 12.0
            + inputs.annual_insurance / 12.0,
        loan_payment,
        total_interest,
        total_cost: principal + total_interest,
        schedule,
    })
}
