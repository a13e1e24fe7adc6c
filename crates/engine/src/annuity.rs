//! Level-payment annuity math shared by the mortgage and affordability
//! calculators.
//!
//! `rate` is the periodic (monthly) rate as a fraction, not a percent.
//! Both functions carry an explicit zero-rate branch; the closed-form
//! annuity factor divides by `(1+r)^n - 1`, which is 0 when r = 0.

/// Payment per period for a loan of `principal` over `months` periods.
pub fn payment(rate: f64, months: u32, principal: f64) -> f64 {
    let n = months as f64;
    if rate == 0.0 {
        principal / n
    } else {
        let pow = (1.0 + rate).powf(n);
        principal * (rate * pow) / (pow - 1.0)
    }
}

/// Largest principal that a fixed per-period `payment` can service over
/// `months` periods. Inverse of [`payment`].
pub fn principal_for_payment(rate: f64, months: u32, payment: f64) -> f64 {
    let n = months as f64;
    if rate == 0.0 {
        payment * n
    } else {
        let pow = (1.0 + rate).powf(n);
        payment * (pow - 1.0) / (rate * pow)
    }
}

/// Convert an annual percentage rate (e.g. 6.5) to a monthly fraction.
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) {
        assert!((a - b).abs() < 0.01, "{} != {}", a, b);
    }

    #[test]
    fn payment_matches_known_value() {
        // $320,000 at 6.5%/yr over 30 years: $2,022.62/mo
        let pmt = payment(monthly_rate(6.5), 360, 320_000.0);
        close(pmt, 2022.62);
    }

    #[test]
    fn zero_rate_divides_evenly() {
        close(payment(0.0, 360, 360_000.0), 1000.0);
        close(principal_for_payment(0.0, 360, 1000.0), 360_000.0);
    }

    #[test]
    fn principal_for_payment_inverts_payment() {
        let rate = monthly_rate(7.25);
        let pmt = payment(rate, 360, 250_000.0);
        close(principal_for_payment(rate, 360, pmt), 250_000.0);
    }

    #[test]
    fn one_month_loan_pays_principal_plus_interest() {
        let rate = monthly_rate(12.0); // 1%/mo
        close(payment(rate, 1, 1000.0), 1010.0);
    }
}
