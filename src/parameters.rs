//! Scenario parameters for a single financed property purchase

use serde::{Deserialize, Serialize};

use crate::error::{InvestmentError, InvestmentResult, ParameterIssue};
use crate::loan::LoanTerms;

/// Inputs describing the property, the buyer and the mortgage
///
/// All rates and fractions are decimals (0.0329 = 3.29%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Purchase price
    pub price: f64,

    /// Living area in m²
    pub area: f64,

    /// Cash contributed by the buyer
    pub down_payment: f64,

    /// Net monthly income of the borrower
    pub net_monthly_income: f64,

    /// Acquisition fees as a fraction of price
    pub fee_fraction: f64,

    /// Annual nominal loan rate
    pub annual_rate: f64,

    /// Loan term in years
    pub years: u32,

    /// Annual borrower insurance rate on the loan amount
    pub insurance_rate: f64,

    /// Monthly rent per m²
    pub rent_per_m2: f64,

    /// Operating charges as a fraction of gross rent
    pub charges_fraction: f64,

    /// Vacancy as a fraction of the year
    pub vacancy_fraction: f64,

    /// Annual appreciation, base case
    pub growth_base: f64,

    /// Annual appreciation, best case
    pub growth_best: f64,

    /// Annual inflation used to deflate the IRR
    pub inflation: f64,

    /// Sale transaction costs as a fraction of sale price
    pub sale_cost_fraction: f64,

    /// Explicit loan amount; derived from price, fees and down payment when absent
    #[serde(default)]
    pub loan_amount: Option<f64>,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            price: 200_000.0,
            area: 57.0,
            down_payment: 50_000.0,
            net_monthly_income: 2_200.0,
            fee_fraction: 0.08,
            annual_rate: 0.0329,
            years: 25,
            insurance_rate: 0.0015,
            rent_per_m2: 15.0,
            charges_fraction: 0.3,
            vacancy_fraction: 0.0,
            growth_base: 0.025,
            growth_best: 0.045,
            inflation: 0.02,
            sale_cost_fraction: 0.07,
            loan_amount: None,
        }
    }
}

impl ScenarioParameters {
    /// Acquisition fees
    pub fn fees(&self) -> f64 {
        self.price * self.fee_fraction
    }

    /// Amount borrowed: explicit, or price - (down payment - fees)
    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
            .unwrap_or_else(|| self.price - (self.down_payment - self.fees()))
    }

    pub fn loan_terms(&self) -> InvestmentResult<LoanTerms> {
        LoanTerms::new(self.loan_amount(), self.annual_rate, self.years)
    }

    /// Borrower insurance per month
    pub fn monthly_insurance(&self) -> f64 {
        self.loan_amount() * self.insurance_rate / 12.0
    }

    /// Annual rent after vacancy, before charges
    pub fn gross_annual_rent(&self) -> f64 {
        self.area * self.rent_per_m2 * 12.0 * (1.0 - self.vacancy_fraction)
    }

    /// Annual net operating income (rent after charges)
    pub fn annual_noi(&self) -> f64 {
        self.gross_annual_rent() * (1.0 - self.charges_fraction)
    }

    /// Check every field, reporting all problems at once
    pub fn validate(&self) -> InvestmentResult<()> {
        let mut issues = Vec::new();
        let mut check = |field: &'static str, value: f64, ok: bool, reason: &str| {
            if !value.is_finite() {
                issues.push(ParameterIssue {
                    field,
                    reason: "invalid number".into(),
                });
            } else if !ok {
                issues.push(ParameterIssue {
                    field,
                    reason: reason.into(),
                });
            }
        };

        check("price", self.price, self.price > 0.0, "must be greater than 0");
        check("area", self.area, self.area > 0.0, "must be greater than 0");
        check(
            "down_payment",
            self.down_payment,
            self.down_payment >= 0.0,
            "cannot be negative",
        );
        check(
            "fee_fraction",
            self.fee_fraction,
            (0.0..=1.0).contains(&self.fee_fraction),
            "must be between 0% and 100%",
        );
        check(
            "net_monthly_income",
            self.net_monthly_income,
            self.net_monthly_income > 0.0,
            "must be greater than 0",
        );
        check(
            "annual_rate",
            self.annual_rate,
            (0.0..=0.2).contains(&self.annual_rate),
            "must be between 0% and 20%",
        );
        check(
            "years",
            self.years as f64,
            (1..=50).contains(&self.years),
            "must be between 1 and 50 years",
        );
        check(
            "insurance_rate",
            self.insurance_rate,
            (0.0..=0.1).contains(&self.insurance_rate),
            "must be between 0% and 10%",
        );
        check(
            "rent_per_m2",
            self.rent_per_m2,
            self.rent_per_m2 > 0.0,
            "must be greater than 0",
        );
        check(
            "charges_fraction",
            self.charges_fraction,
            (0.0..=1.0).contains(&self.charges_fraction),
            "must be between 0% and 100%",
        );
        check(
            "vacancy_fraction",
            self.vacancy_fraction,
            (0.0..=1.0).contains(&self.vacancy_fraction),
            "must be between 0% and 100%",
        );
        check(
            "growth_base",
            self.growth_base,
            (-0.05..=0.2).contains(&self.growth_base),
            "must be between -5% and 20%",
        );
        check(
            "growth_best",
            self.growth_best,
            (-0.05..=0.2).contains(&self.growth_best),
            "must be between -5% and 20%",
        );
        check(
            "inflation",
            self.inflation,
            self.inflation > -1.0,
            "must be above -100%",
        );
        check(
            "sale_cost_fraction",
            self.sale_cost_fraction,
            (0.0..1.0).contains(&self.sale_cost_fraction),
            "must be at least 0% and below 100%",
        );
        if let Some(amount) = self.loan_amount {
            check("loan_amount", amount, amount > 0.0, "must be greater than 0");
        }

        let total_cost = self.price + self.fees();
        if total_cost.is_finite() && self.down_payment.is_finite() && self.down_payment >= total_cost {
            issues.push(ParameterIssue {
                field: "down_payment",
                reason: "cannot exceed property price plus fees".into(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(InvestmentError::InvalidParameters { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_loan_amount_is_exact() {
        let params = ScenarioParameters::default();
        assert_eq!(params.fees(), 16_000.0);
        assert_eq!(params.loan_amount(), 166_000.0);
    }

    #[test]
    fn test_explicit_loan_amount_wins() {
        let params = ScenarioParameters {
            loan_amount: Some(150_000.0),
            ..Default::default()
        };
        assert_eq!(params.loan_amount(), 150_000.0);
        assert!((params.monthly_insurance() - 18.75).abs() < 1e-9);
    }

    #[test]
    fn test_rent_and_noi() {
        let params = ScenarioParameters::default();
        assert!((params.gross_annual_rent() - 10_260.0).abs() < 1e-9);
        assert!((params.annual_noi() - 7_182.0).abs() < 1e-9);

        let vacant = ScenarioParameters {
            vacancy_fraction: 0.1,
            ..Default::default()
        };
        assert!((vacant.gross_annual_rent() - 9_234.0).abs() < 1e-9);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ScenarioParameters::default().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_issues() {
        let params = ScenarioParameters {
            price: -1.0,
            area: f64::NAN,
            years: 0,
            ..Default::default()
        };

        match params.validate() {
            Err(InvestmentError::InvalidParameters { issues }) => {
                let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
                assert!(fields.contains(&"price"));
                assert!(fields.contains(&"area"));
                assert!(fields.contains(&"years"));
                let area = issues.iter().find(|i| i.field == "area").unwrap();
                assert_eq!(area.reason, "invalid number");
            }
            other => panic!("expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_down_payment_above_total_cost_rejected() {
        let params = ScenarioParameters {
            down_payment: 216_000.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_rate_is_valid() {
        let params = ScenarioParameters {
            annual_rate: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
        assert!(params.loan_terms().is_ok());
    }
}
