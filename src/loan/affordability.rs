//! Borrower affordability: debt-to-income ratio against the lending ceiling

use serde::{Deserialize, Serialize};

use crate::error::{InvestmentError, InvestmentResult};

/// Maximum DTI allowed without a derogation (French HCSF rule)
pub const DTI_CEILING: f64 = 0.35;

/// Outcome of the DTI ceiling check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DtiCheck {
    pub dti: f64,
    pub ceiling: f64,
    pub compliant: bool,
}

impl DtiCheck {
    /// Compare a DTI against the default ceiling
    pub fn evaluate(dti: f64) -> Self {
        Self::with_ceiling(dti, DTI_CEILING)
    }

    pub fn with_ceiling(dti: f64, ceiling: f64) -> Self {
        Self {
            dti,
            ceiling,
            compliant: dti <= ceiling,
        }
    }

    /// Short human-readable verdict
    pub fn message(&self) -> String {
        if self.compliant {
            format!("compliant (DTI at or below {:.0}%)", self.ceiling * 100.0)
        } else {
            format!(
                "DTI of {:.1}% exceeds {:.0}%, derogation required",
                self.dti * 100.0,
                self.ceiling * 100.0
            )
        }
    }
}

/// Total monthly debt obligation divided by net monthly income
pub fn debt_to_income(monthly_obligation: f64, monthly_income: f64) -> InvestmentResult<f64> {
    if !monthly_income.is_finite() || monthly_income <= 0.0 {
        return Err(InvestmentError::invalid(
            "net_monthly_income",
            format!("must be a positive amount, got {monthly_income}"),
        ));
    }
    Ok(monthly_obligation / monthly_income)
}
