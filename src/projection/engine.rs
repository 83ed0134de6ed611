//! End-to-end evaluation of one financed property purchase

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::InvestmentResult;
use crate::loan::{debt_to_income, DtiCheck};
use crate::parameters::ScenarioParameters;
use crate::scenario::{projected_value, value_path, GrowthScenario, ValuePoint};
use super::cashflows::{CashflowInputs, CashflowRow, NoiTiming, HOLDING_PERIOD_YEARS};
use super::irr::{solve_irr, IrrConfig};
use super::real_rate::real_rate_of;

/// Configuration for an evaluation run
#[derive(Debug, Clone, Default)]
pub struct EvaluationConfig {
    /// Appreciation scenario used for the resale price and IRR
    pub scenario: GrowthScenario,

    /// When NOI starts counting in the cashflow sequence
    pub noi_timing: NoiTiming,

    /// IRR solver settings
    pub irr: IrrConfig,
}

/// Every figure the report shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentReport {
    pub scenario: GrowthScenario,
    pub noi_timing: NoiTiming,

    // Financing
    pub fees: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub monthly_insurance: f64,
    pub monthly_total: f64,
    pub dti: DtiCheck,

    // Property
    pub projected_value_5y: f64,
    pub projected_value_10y: f64,
    pub value_path: Vec<ValuePoint>,

    // Income
    pub gross_annual_rent: f64,
    pub annual_noi: f64,
    /// NOI less a full year of mortgage and insurance payments
    pub annual_rental_cashflow: f64,

    // Holding-period cashflows
    pub cashflows: Vec<CashflowRow>,
    pub terminal_net_cash: f64,

    // Returns
    pub nominal_irr: Option<f64>,
    pub real_irr: Option<f64>,
    pub irr_converged: bool,
    pub irr_iterations: u32,
    /// Why the IRR is undefined, when it is
    pub irr_failure: Option<String>,
}

/// Main evaluation engine
pub struct InvestmentEngine {
    params: ScenarioParameters,
    config: EvaluationConfig,
}

impl InvestmentEngine {
    pub fn new(params: ScenarioParameters, config: EvaluationConfig) -> Self {
        Self { params, config }
    }

    pub fn params(&self) -> &ScenarioParameters {
        &self.params
    }

    /// Validate the parameters and compute the full report
    ///
    /// An IRR that cannot be located is reported as undefined rather than
    /// failing the evaluation.
    pub fn evaluate(&self) -> InvestmentResult<InvestmentReport> {
        let params = &self.params;
        params.validate()?;

        let loan = params.loan_terms()?;
        let monthly_payment = loan.monthly_payment();
        let monthly_insurance = params.monthly_insurance();
        let monthly_total = monthly_payment + monthly_insurance;

        let dti = DtiCheck::evaluate(debt_to_income(monthly_total, params.net_monthly_income)?);
        if !dti.compliant {
            warn!("{}", dti.message());
        }

        let growth_rate = self.config.scenario.growth_rate(params);
        let annual_noi = params.annual_noi();

        let inputs = CashflowInputs {
            loan,
            insurance_rate: params.insurance_rate,
            price: params.price,
            growth_rate,
            noi: annual_noi,
            sale_cost_fraction: params.sale_cost_fraction,
            initial_outlay: params.down_payment,
            holding_years: HOLDING_PERIOD_YEARS,
            noi_timing: self.config.noi_timing,
        };
        let schedule = inputs.build()?;
        let flows = schedule.net_cashflows();
        debug!("Cashflow sequence: {:?}", flows);

        let (nominal_irr, irr_converged, irr_iterations, irr_failure) =
            match solve_irr(&flows, &self.config.irr) {
                Ok(solution) => (
                    Some(solution.rate),
                    solution.converged,
                    solution.iterations,
                    None,
                ),
                Err(e) => {
                    warn!("IRR undefined: {}", e);
                    (None, false, 0, Some(e.to_string()))
                }
            };
        let real_irr = real_rate_of(nominal_irr, params.inflation);

        if let (Some(nominal), Some(real)) = (nominal_irr, real_irr) {
            info!(
                "{} scenario IRR: nominal {:.4}%, real {:.4}%",
                self.config.scenario.label(),
                nominal * 100.0,
                real * 100.0
            );
        }

        Ok(InvestmentReport {
            scenario: self.config.scenario,
            noi_timing: self.config.noi_timing,
            fees: params.fees(),
            loan_amount: loan.principal,
            monthly_payment,
            monthly_insurance,
            monthly_total,
            dti,
            projected_value_5y: projected_value(params.price, growth_rate, 5),
            projected_value_10y: projected_value(params.price, growth_rate, 10),
            value_path: value_path(params, HOLDING_PERIOD_YEARS),
            gross_annual_rent: params.gross_annual_rent(),
            annual_noi,
            annual_rental_cashflow: annual_noi - monthly_total * 12.0,
            cashflows: schedule.rows,
            terminal_net_cash: schedule.terminal_net_cash,
            nominal_irr,
            real_irr,
            irr_converged,
            irr_iterations,
            irr_failure,
        })
    }
}
