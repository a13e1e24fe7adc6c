//! Rental investment calculator: net operating income, cap rate,
//! cash-on-cash return, and monthly cash flow.
//!
//! Cap rate and cash-on-cash divide by purchase price and down payment
//! respectively, so both must be strictly positive.

use serde::{Deserialize, Serialize};

use crate::validate::{self, CalcError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInputs {
    /// Purchase price of the property
    pub purchase_price: f64,
    /// Expected monthly rent
    pub monthly_rent: f64,
    /// Other monthly income (parking, laundry, storage)
    pub other_monthly_income: f64,
    /// Monthly property management fee
    pub monthly_management_fee: f64,
    /// Monthly maintenance reserve
    pub monthly_maintenance: f64,
    /// Expected vacancy as a percent of gross rent (e.g. 5.0)
    pub vacancy_rate_pct: f64,
    /// Cash invested up front
    pub down_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResults {
    /// Annual rent plus other income before vacancy
    pub gross_annual_income: f64,
    /// Gross income minus vacancy loss
    pub effective_gross_income: f64,
    /// Annual management and maintenance costs
    pub operating_expenses: f64,
    /// Net operating income (annual)
    pub noi: f64,
    /// NOI / purchase price, as a percent
    pub cap_rate_pct: f64,
    /// NOI / down payment, as a percent
    pub cash_on_cash_pct: f64,
    /// NOI / 12
    pub monthly_cash_flow: f64,
}

fn validate(inputs: &InvestmentInputs) -> Result<(), CalcError> {
    validate::positive(inputs.purchase_price, "purchase price")?;
    validate::non_negative(inputs.monthly_rent, "monthly rent")?;
    validate::non_negative(inputs.other_monthly_income, "other income")?;
    validate::non_negative(inputs.monthly_management_fee, "management fee")?;
    validate::non_negative(inputs.monthly_maintenance, "maintenance")?;
    validate::percentage(inputs.vacancy_rate_pct, "vacancy rate", 100.0)?;
    validate::positive(inputs.down_payment, "down payment")?;
    Ok(())
}

pub fn calculate(inputs: &InvestmentInputs) -> Result<InvestmentResults, CalcError> {
    validate(inputs)?;

    let gross_annual_income = (inputs.monthly_rent + inputs.other_monthly_income) * 12.0;
    let vacancy_loss = gross_annual_income * (inputs.vacancy_rate_pct / 100.0);
    let effective_gross_income = gross_annual_income - vacancy_loss;

    let operating_expenses =
        (inputs.monthly_management_fee + inputs.monthly_maintenance) * 12.0;
    let noi = effective_gross_income - operating_expenses;

    Ok(InvestmentResults {
        gross_annual_income,
        effective_gross_income,
        operating_expenses,
        noi,
        cap_rate_pct: noi / inputs.purchase_price * 100.0,
        cash_on_cash_pct: noi / inputs.down_payment * 100.0,
        monthly_cash_flow: noi / 12.0,
    })
}
