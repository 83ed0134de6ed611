//! Fixed-rate, fixed-term loan amortization
//!
//! Closed-form payment and outstanding balance for a loan repaid in equal
//! monthly installments.

use serde::{Deserialize, Serialize};

use crate::error::{InvestmentError, InvestmentResult};

/// Below this monthly rate the loan is treated as interest free
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Principal, annual nominal rate and term of a mortgage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Annual nominal rate (e.g. 0.0329 for 3.29%)
    pub annual_rate: f64,

    /// Term in whole years
    pub years: u32,
}

impl LoanTerms {
    /// Build loan terms, rejecting values the amortization formulas cannot handle
    pub fn new(principal: f64, annual_rate: f64, years: u32) -> InvestmentResult<Self> {
        if !principal.is_finite() || principal < 0.0 {
            return Err(InvestmentError::invalid(
                "principal",
                format!("must be a finite non-negative amount, got {principal}"),
            ));
        }
        if !annual_rate.is_finite() || !(0.0..1.0).contains(&annual_rate) {
            return Err(InvestmentError::invalid(
                "annual_rate",
                format!("must be in [0, 1), got {annual_rate}"),
            ));
        }
        if years == 0 {
            return Err(InvestmentError::invalid("years", "loan term must be at least 1 year"));
        }
        // Month counts feed `powi`, so they must fit in an i32
        if years.checked_mul(12).filter(|&n| n <= i32::MAX as u32).is_none() {
            return Err(InvestmentError::invalid(
                "years",
                format!("loan term of {years} years is too long to amortize monthly"),
            ));
        }

        Ok(Self {
            principal,
            annual_rate,
            years,
        })
    }

    /// Monthly rate i = annual / 12
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    /// Number of monthly installments n = years * 12
    pub fn total_months(&self) -> u32 {
        self.years * 12
    }

    /// Fixed monthly payment (principal and interest)
    ///
    /// payment = P * i / (1 - (1+i)^-n), or P / n for an interest-free loan
    pub fn monthly_payment(&self) -> f64 {
        let i = self.monthly_rate();
        let n = self.total_months() as i32;

        if i.abs() < ZERO_RATE_EPSILON {
            return self.principal / n as f64;
        }

        self.principal * i / (1.0 - (1.0 + i).powi(-n))
    }

    /// Balance still owed after `months_paid` installments
    ///
    /// balance = P(1+i)^k - A((1+i)^k - 1)/i with A the monthly payment
    pub fn outstanding_balance(&self, months_paid: u32) -> InvestmentResult<f64> {
        if months_paid > self.total_months() {
            return Err(InvestmentError::invalid(
                "months_paid",
                format!(
                    "{months_paid} months exceeds the loan term of {} months",
                    self.total_months()
                ),
            ));
        }

        let i = self.monthly_rate();
        let payment = self.monthly_payment();

        if i.abs() < ZERO_RATE_EPSILON {
            return Ok(self.principal - payment * months_paid as f64);
        }

        let growth = (1.0 + i).powi(months_paid as i32);
        Ok(self.principal * growth - payment * (growth - 1.0) / i)
    }

    /// Year-end balances for years 0..=`years`
    pub fn yearly_balances(&self, years: u32) -> InvestmentResult<Vec<f64>> {
        (0..=years)
            .map(|year| self.outstanding_balance(year * 12))
            .collect()
    }
}

/// Fixed monthly payment for a loan
pub fn monthly_payment(principal: f64, annual_rate: f64, years: u32) -> InvestmentResult<f64> {
    Ok(LoanTerms::new(principal, annual_rate, years)?.monthly_payment())
}

/// Outstanding balance after `months_paid` payments
pub fn outstanding_balance(
    principal: f64,
    annual_rate: f64,
    years: u32,
    months_paid: u32,
) -> InvestmentResult<f64> {
    LoanTerms::new(principal, annual_rate, years)?.outstanding_balance(months_paid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monthly_payment_reference_loan() {
        // 150k at 3.29% over 25 years; 734.15 is what the payment formula yields
        let payment = monthly_payment(150_000.0, 0.0329, 25).unwrap();
        assert!((payment - 734.15).abs() < 0.01, "got {}", payment);
    }

    #[test]
    fn test_default_scenario_payment() {
        let payment = monthly_payment(166_000.0, 0.0329, 25).unwrap();
        assert!((payment - 812.46).abs() < 0.01, "got {}", payment);
    }

    #[test]
    fn test_balance_before_first_payment_is_principal() {
        let balance = outstanding_balance(150_000.0, 0.0329, 25, 0).unwrap();
        assert_eq!(balance, 150_000.0);
    }

    #[test]
    fn test_full_term_amortizes_to_zero() {
        for &(principal, rate, years) in &[
            (150_000.0, 0.0329, 25),
            (10_000.0, 0.12, 5),
            (500_000.0, 0.0075, 30),
            (1_000.0, 0.5, 1),
        ] {
            let balance = outstanding_balance(principal, rate, years, years * 12).unwrap();
            assert!(
                balance.abs() <= principal * 1e-6,
                "balance {} for {} at {} over {}y",
                balance, principal, rate, years
            );
        }
    }

    #[test]
    fn test_balance_after_ten_years_is_between_zero_and_principal() {
        let balance = outstanding_balance(150_000.0, 0.0329, 25, 120).unwrap();
        assert!(balance > 0.0 && balance < 150_000.0);
        assert!((balance - 104_191.41).abs() < 0.01);
    }

    #[test]
    fn test_balance_decreases_monotonically() {
        let loan = LoanTerms::new(166_000.0, 0.0329, 25).unwrap();
        let balances = loan.yearly_balances(25).unwrap();

        assert_eq!(balances.len(), 26);
        assert!(balances.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let loan = LoanTerms::new(120_000.0, 0.0, 10).unwrap();

        assert_relative_eq!(loan.monthly_payment(), 1_000.0);
        assert_relative_eq!(loan.outstanding_balance(60).unwrap(), 60_000.0);
        assert_relative_eq!(loan.outstanding_balance(120).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_terms_rejected() {
        assert!(monthly_payment(100_000.0, -0.01, 20).is_err());
        assert!(monthly_payment(100_000.0, 0.03, 0).is_err());
        assert!(monthly_payment(f64::NAN, 0.03, 20).is_err());
        assert!(monthly_payment(100_000.0, f64::INFINITY, 20).is_err());
    }

    #[test]
    fn test_month_count_must_fit_in_i32() {
        let err = monthly_payment(100_000.0, 0.03, 400_000_000).unwrap_err();
        assert!(matches!(err, InvestmentError::InvalidParameter { field: "years", .. }));
        assert!(monthly_payment(100_000.0, 0.03, 200_000_000).is_err());

        // Longest accepted term behaves like an interest-only loan
        let payment = monthly_payment(100_000.0, 0.03, (i32::MAX / 12) as u32).unwrap();
        assert!((payment - 250.0).abs() < 1e-9, "got {}", payment);
    }

    #[test]
    fn test_balance_beyond_term_rejected() {
        let err = outstanding_balance(100_000.0, 0.03, 10, 121).unwrap_err();
        assert!(matches!(
            err,
            InvestmentError::InvalidParameter { field: "months_paid", .. }
        ));
    }
}
