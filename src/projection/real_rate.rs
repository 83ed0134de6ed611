//! Nominal to real (inflation-adjusted) rate conversion

/// Exact Fisher relation: (1 + nominal) / (1 + inflation) - 1
pub fn real_rate(nominal_rate: f64, inflation_rate: f64) -> f64 {
    (1.0 + nominal_rate) / (1.0 + inflation_rate) - 1.0
}

/// Deflate an optional nominal rate; an undefined nominal rate stays undefined
pub fn real_rate_of(nominal_rate: Option<f64>, inflation_rate: f64) -> Option<f64> {
    nominal_rate.map(|nominal| real_rate(nominal, inflation_rate))
}
