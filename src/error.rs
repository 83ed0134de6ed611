//! Error types shared by the calculation pipeline

use thiserror::Error;

/// Result alias used by every fallible calculation
pub type InvestmentResult<T> = Result<T, InvestmentError>;

/// A single failed parameter check
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParameterIssue {
    pub field: &'static str,
    pub reason: String,
}

impl std::fmt::Display for ParameterIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Errors raised while computing investment metrics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvestmentError {
    /// A single argument is out of its domain
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// One or more scenario parameters failed validation
    #[error("invalid scenario parameters: {}", join_issues(.issues))]
    InvalidParameters { issues: Vec<ParameterIssue> },

    /// IRR needs an outlay and at least one later flow
    #[error("IRR requires at least 2 cash flows, got {count}")]
    InsufficientCashflows { count: usize },

    /// NPV never changed sign between `low` and the expanded `high`
    #[error("no IRR in [{low}, {high}] after {expansions} bracket expansions")]
    NoRootInDomain { low: f64, high: f64, expansions: u32 },

    /// NPV evaluated to NaN or infinity
    #[error("NPV is not finite at rate {rate}")]
    NonFiniteNpv { rate: f64 },
}

impl InvestmentError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        InvestmentError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

fn join_issues(issues: &[ParameterIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters_message_lists_every_issue() {
        let err = InvestmentError::InvalidParameters {
            issues: vec![
                ParameterIssue { field: "price", reason: "must be greater than 0".into() },
                ParameterIssue { field: "area", reason: "must be greater than 0".into() },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("price: must be greater than 0"));
        assert!(msg.contains("area: must be greater than 0"));
    }

    #[test]
    fn test_no_root_message() {
        let err = InvestmentError::NoRootInDomain { low: -0.9, high: 51.0, expansions: 50 };
        assert_eq!(err.to_string(), "no IRR in [-0.9, 51] after 50 bracket expansions");
    }
}
