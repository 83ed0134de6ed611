//! Holding-period projection: cashflows, IRR and real returns

mod cashflows;
mod engine;
mod irr;
mod real_rate;

pub use cashflows::{CashflowInputs, CashflowRow, CashflowSchedule, NoiTiming, HOLDING_PERIOD_YEARS};
pub use engine::{EvaluationConfig, InvestmentEngine, InvestmentReport};
pub use irr::{calculate_irr, npv, solve_irr, IrrConfig, IrrSolution};
pub use real_rate::{real_rate, real_rate_of};
