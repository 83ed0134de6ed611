//! Annual investor cashflows over the holding period
//!
//! Year 0 is the cash put in at purchase. Every later year pays the full
//! mortgage and insurance, collects NOI when the timing policy says so, and
//! the final year adds the net sale proceeds less the loan payoff.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{InvestmentError, InvestmentResult};
use crate::loan::LoanTerms;
use crate::scenario::projected_value;

/// Years between purchase and resale
pub const HOLDING_PERIOD_YEARS: u32 = 10;

/// When net operating income starts flowing to the investor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiTiming {
    /// NOI counted from this holding year onward (1-indexed)
    DeferredFromYear(u32),
    /// NOI counted in every holding year
    EveryYear,
}

impl NoiTiming {
    /// Reference sequence: five years of pure debt service, NOI from year 6
    pub const REFERENCE_FIRST_YEAR: u32 = 6;

    /// Whether NOI is received in `year` (year 0 is the purchase)
    pub fn includes(&self, year: u32) -> bool {
        match *self {
            NoiTiming::DeferredFromYear(first) => year >= 1 && year >= first,
            NoiTiming::EveryYear => year >= 1,
        }
    }
}

impl Default for NoiTiming {
    fn default() -> Self {
        NoiTiming::DeferredFromYear(Self::REFERENCE_FIRST_YEAR)
    }
}

/// Everything the builder needs about the purchase, loan and resale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowInputs {
    pub loan: LoanTerms,

    /// Annual insurance rate charged on the original principal
    pub insurance_rate: f64,

    /// Purchase price of the property
    pub price: f64,

    /// Annual appreciation used to project the sale price
    pub growth_rate: f64,

    /// Annual net operating income
    pub noi: f64,

    /// Fraction of the sale price lost to transaction costs
    pub sale_cost_fraction: f64,

    /// Cash paid at purchase (down payment)
    pub initial_outlay: f64,

    pub holding_years: u32,

    pub noi_timing: NoiTiming,
}

/// One year of the investor's cashflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    pub year: u32,
    pub debt_service: f64,
    pub noi: f64,
    pub sale_proceeds: f64,
    pub loan_payoff: f64,
    /// Loan balance at year end
    pub loan_balance: f64,
    pub net_cashflow: f64,
}

impl CashflowRow {
    fn new(year: u32) -> Self {
        Self {
            year,
            debt_service: 0.0,
            noi: 0.0,
            sale_proceeds: 0.0,
            loan_payoff: 0.0,
            loan_balance: 0.0,
            net_cashflow: 0.0,
        }
    }
}

/// Complete annual schedule, year 0 through the sale year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSchedule {
    pub rows: Vec<CashflowRow>,

    /// Mortgage payment plus insurance, times 12
    pub annual_debt_service: f64,

    /// Projected price at the end of the holding period
    pub sale_price: f64,

    /// Sale price net of transaction costs
    pub net_sale_proceeds: f64,

    /// Balance repaid out of the sale
    pub payoff_balance: f64,

    /// Net sale proceeds less payoff
    pub terminal_net_cash: f64,
}

impl CashflowSchedule {
    /// Net cashflow per year, index = year
    pub fn net_cashflows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_cashflow).collect()
    }

    /// Sum of all net cashflows (undiscounted profit)
    pub fn total_net(&self) -> f64 {
        self.rows.iter().map(|r| r.net_cashflow).sum()
    }
}

impl CashflowInputs {
    /// Build the annual cashflow schedule
    pub fn build(&self) -> InvestmentResult<CashflowSchedule> {
        if self.holding_years == 0 {
            return Err(InvestmentError::invalid("holding_years", "must be at least 1"));
        }
        let sale_month = self.holding_years * 12;
        if sale_month > self.loan.total_months() {
            return Err(InvestmentError::invalid(
                "holding_years",
                format!(
                    "sale after {} years falls beyond the {}-year loan term",
                    self.holding_years, self.loan.years
                ),
            ));
        }

        let monthly_insurance = self.loan.principal * self.insurance_rate / 12.0;
        let annual_debt_service = (self.loan.monthly_payment() + monthly_insurance) * 12.0;

        let payoff_balance = self.loan.outstanding_balance(sale_month)?;
        let sale_price = projected_value(self.price, self.growth_rate, self.holding_years);
        let net_sale_proceeds = sale_price * (1.0 - self.sale_cost_fraction);
        let terminal_net_cash = net_sale_proceeds - payoff_balance;

        let mut rows = Vec::with_capacity(self.holding_years as usize + 1);

        let mut purchase = CashflowRow::new(0);
        purchase.loan_balance = self.loan.principal;
        purchase.net_cashflow = -self.initial_outlay;
        rows.push(purchase);

        for year in 1..=self.holding_years {
            let mut row = CashflowRow::new(year);
            row.debt_service = annual_debt_service;
            row.loan_balance = self.loan.outstanding_balance(year * 12)?;

            if self.noi_timing.includes(year) {
                row.noi = self.noi;
            }

            if year == self.holding_years {
                row.sale_proceeds = net_sale_proceeds;
                row.loan_payoff = payoff_balance;
                row.loan_balance = 0.0;
            }

            row.net_cashflow =
                row.noi - row.debt_service + (row.sale_proceeds - row.loan_payoff);
            rows.push(row);
        }

        debug!(
            "Built {} annual cashflows: debt service {:.2}/yr, terminal net {:.2}",
            rows.len(),
            annual_debt_service,
            terminal_net_cash
        );

        Ok(CashflowSchedule {
            rows,
            annual_debt_service,
            sale_price,
            net_sale_proceeds,
            payoff_balance,
            terminal_net_cash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_inputs() -> CashflowInputs {
        CashflowInputs {
            loan: LoanTerms::new(166_000.0, 0.0329, 25).unwrap(),
            insurance_rate: 0.0015,
            price: 200_000.0,
            growth_rate: 0.025,
            noi: 7_182.0,
            sale_cost_fraction: 0.07,
            initial_outlay: 50_000.0,
            holding_years: HOLDING_PERIOD_YEARS,
            noi_timing: NoiTiming::default(),
        }
    }

    #[test]
    fn test_eleven_entries_with_reference_shape() {
        let schedule = reference_inputs().build().unwrap();
        let flows = schedule.net_cashflows();
        let debt = schedule.annual_debt_service;

        assert_eq!(flows.len(), 11);
        assert_eq!(flows[0], -50_000.0);
        for year in 1..=5 {
            assert_relative_eq!(flows[year], -debt);
        }
        for year in 6..=9 {
            assert_relative_eq!(flows[year], -debt + 7_182.0);
        }
        assert_relative_eq!(
            flows[10],
            -debt + 7_182.0 + schedule.terminal_net_cash,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_reference_figures() {
        let schedule = reference_inputs().build().unwrap();

        assert!((schedule.annual_debt_service - 9_998.48).abs() < 0.01);
        assert!((schedule.payoff_balance - 115_305.16).abs() < 0.01);
        assert!((schedule.sale_price - 256_016.91).abs() < 0.01);
        assert_relative_eq!(schedule.net_sale_proceeds, schedule.sale_price * 0.93);
        assert_relative_eq!(
            schedule.terminal_net_cash,
            schedule.net_sale_proceeds - schedule.payoff_balance
        );
    }

    #[test]
    fn test_every_year_timing() {
        let inputs = CashflowInputs {
            noi_timing: NoiTiming::EveryYear,
            ..reference_inputs()
        };
        let schedule = inputs.build().unwrap();

        assert!(schedule.rows[1..].iter().all(|r| r.noi == 7_182.0));
        assert_eq!(schedule.rows[0].noi, 0.0);
    }

    #[test]
    fn test_timing_policy() {
        let deferred = NoiTiming::default();
        assert!(!deferred.includes(0));
        assert!(!deferred.includes(5));
        assert!(deferred.includes(6));
        assert!(deferred.includes(10));

        assert!(!NoiTiming::EveryYear.includes(0));
        assert!(NoiTiming::EveryYear.includes(1));

        // A first year of 0 still never pays NOI at purchase
        assert!(!NoiTiming::DeferredFromYear(0).includes(0));
    }

    #[test]
    fn test_loan_balances_recorded() {
        let schedule = reference_inputs().build().unwrap();

        assert_eq!(schedule.rows[0].loan_balance, 166_000.0);
        assert!(schedule.rows[1].loan_balance < 166_000.0);
        assert_eq!(schedule.rows[10].loan_balance, 0.0);
        assert_relative_eq!(schedule.rows[10].loan_payoff, schedule.payoff_balance);
    }

    #[test]
    fn test_holding_period_beyond_loan_term_rejected() {
        let inputs = CashflowInputs {
            loan: LoanTerms::new(100_000.0, 0.03, 8).unwrap(),
            ..reference_inputs()
        };
        assert!(inputs.build().is_err());

        let inputs = CashflowInputs {
            holding_years: 0,
            ..reference_inputs()
        };
        assert!(inputs.build().is_err());
    }
}
