//! Internal Rate of Return (IRR) calculation
//!
//! Bracketed bisection on the NPV of a periodic cash-flow sequence. The upper
//! bound is pushed out in fixed steps until NPV changes sign, which covers
//! high-return sequences whose root lies far above the default bracket.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{InvestmentError, InvestmentResult};

/// Solver bracket, tolerance and iteration limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrConfig {
    /// Lower bound of the initial bracket (must stay above -1)
    pub low: f64,

    /// Upper bound of the initial bracket
    pub high: f64,

    /// Stop once |NPV(mid)| falls below this
    pub tolerance: f64,

    /// Bisection iteration cap
    pub max_iterations: u32,

    /// Amount added to `high` on each bracket expansion
    pub expansion_step: f64,

    /// Bracket expansion cap
    pub max_expansions: u32,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            low: -0.9,
            high: 1.0,
            tolerance: 1e-7,
            max_iterations: 10_000,
            expansion_step: 1.0,
            max_expansions: 50,
        }
    }
}

impl IrrConfig {
    fn validate(&self) -> InvestmentResult<()> {
        if !self.low.is_finite() || self.low <= -1.0 {
            return Err(InvestmentError::invalid(
                "low",
                format!("lower bracket must be finite and above -1, got {}", self.low),
            ));
        }
        if !self.high.is_finite() || self.high <= self.low {
            return Err(InvestmentError::invalid(
                "high",
                format!("upper bracket {} must exceed lower bracket {}", self.high, self.low),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(InvestmentError::invalid("tolerance", "must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(InvestmentError::invalid("max_iterations", "must be at least 1"));
        }
        if !(self.expansion_step > 0.0) || !self.expansion_step.is_finite() {
            return Err(InvestmentError::invalid("expansion_step", "must be positive"));
        }
        Ok(())
    }
}

/// A located (or best-effort) IRR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSolution {
    /// Periodic rate at which NPV is (approximately) zero
    pub rate: f64,

    /// Bisection iterations performed
    pub iterations: u32,

    /// NPV at `rate`
    pub residual: f64,

    /// False when the iteration cap was hit before |NPV| < tolerance
    pub converged: bool,
}

/// Net present value of `cashflows` at a periodic `rate`, first flow at t = 0
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// IRR with the default bracket and tolerance
pub fn calculate_irr(cashflows: &[f64]) -> InvestmentResult<f64> {
    solve_irr(cashflows, &IrrConfig::default()).map(|solution| solution.rate)
}

/// Find the rate that zeroes the NPV of `cashflows`
///
/// Returns `NoRootInDomain` when no sign change is found after expanding the
/// bracket. Hitting `max_iterations` is not an error: the last midpoint is
/// returned with `converged = false`.
pub fn solve_irr(cashflows: &[f64], config: &IrrConfig) -> InvestmentResult<IrrSolution> {
    if cashflows.len() < 2 {
        return Err(InvestmentError::InsufficientCashflows {
            count: cashflows.len(),
        });
    }
    config.validate()?;

    let mut low = config.low;
    let mut high = config.high;

    let mut f_low = finite_npv(cashflows, low)?;
    let mut f_high = finite_npv(cashflows, high)?;

    let mut expansions = 0;
    while f_low * f_high > 0.0 && expansions < config.max_expansions {
        high += config.expansion_step;
        f_high = finite_npv(cashflows, high)?;
        expansions += 1;
        debug!("IRR bracket expanded to [{}, {}], NPV(high) = {:.6}", low, high, f_high);
    }

    if f_low * f_high > 0.0 {
        return Err(InvestmentError::NoRootInDomain {
            low,
            high,
            expansions,
        });
    }

    for (rate, value) in [(low, f_low), (high, f_high)] {
        if value.abs() < config.tolerance {
            return Ok(IrrSolution {
                rate,
                iterations: 0,
                residual: value,
                converged: true,
            });
        }
    }

    let mut mid = (low + high) / 2.0;
    let mut f_mid = f64::NAN;

    for iteration in 1..=config.max_iterations {
        mid = (low + high) / 2.0;
        f_mid = npv(cashflows, mid);

        if f_mid.abs() < config.tolerance {
            return Ok(IrrSolution {
                rate: mid,
                iterations: iteration,
                residual: f_mid,
                converged: true,
            });
        }

        // A zero product keeps the lower half
        if f_low * f_mid <= 0.0 {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }

    warn!(
        "IRR bisection hit {} iterations without |NPV| < {:e}; using last midpoint {} (NPV {:e})",
        config.max_iterations, config.tolerance, mid, f_mid
    );

    Ok(IrrSolution {
        rate: mid,
        iterations: config.max_iterations,
        residual: f_mid,
        converged: false,
    })
}

fn finite_npv(cashflows: &[f64], rate: f64) -> InvestmentResult<f64> {
    let value = npv(cashflows, rate);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvestmentError::NonFiniteNpv { rate })
    }
}
