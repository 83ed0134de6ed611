//! Property Investment - financed rental property calculator
//!
//! This library provides:
//! - Fixed-rate mortgage amortization (payment and outstanding balance)
//! - Debt-to-income ratio and the lending ceiling check
//! - Annual investor cashflows over a 10-year hold ending in a sale
//! - IRR by bracketed bisection, nominal and inflation-adjusted

pub mod error;
pub mod loan;
pub mod parameters;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{InvestmentError, InvestmentResult};
pub use parameters::ScenarioParameters;
pub use projection::{EvaluationConfig, InvestmentEngine, InvestmentReport, NoiTiming};
pub use scenario::GrowthScenario;
