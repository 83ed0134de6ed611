//! Mortgage calculations: amortization and affordability

mod amortization;
mod affordability;

pub use amortization::{LoanTerms, monthly_payment, outstanding_balance};
pub use affordability::{DtiCheck, DTI_CEILING, debt_to_income};
