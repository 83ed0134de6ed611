//! Appreciation scenarios and projected property values

use serde::{Deserialize, Serialize};

use crate::parameters::ScenarioParameters;

/// Which appreciation assumption drives the resale price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthScenario {
    #[default]
    Base,
    Best,
}

impl GrowthScenario {
    /// Annual growth rate this scenario selects from the parameters
    pub fn growth_rate(&self, params: &ScenarioParameters) -> f64 {
        match self {
            GrowthScenario::Base => params.growth_base,
            GrowthScenario::Best => params.growth_best,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthScenario::Base => "Base",
            GrowthScenario::Best => "Best",
        }
    }
}

/// Value after `years` of compound growth
pub fn projected_value(initial_value: f64, growth_rate: f64, years: u32) -> f64 {
    initial_value * (1.0 + growth_rate).powi(years as i32)
}

/// Projected value in one year under both scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub year: u32,
    pub base: f64,
    pub best: f64,
}

/// Year-by-year property value for years 0..=`years`
pub fn value_path(params: &ScenarioParameters, years: u32) -> Vec<ValuePoint> {
    (0..=years)
        .map(|year| ValuePoint {
            year,
            base: projected_value(params.price, params.growth_base, year),
            best: projected_value(params.price, params.growth_best, year),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projected_value() {
        let params = ScenarioParameters::default();

        let v5 = projected_value(params.price, params.growth_base, 5);
        let v10 = projected_value(params.price, params.growth_base, 10);

        assert!((v5 - 226_281.64).abs() < 0.01, "got {}", v5);
        assert!((v10 - 256_016.91).abs() < 0.01, "got {}", v10);
        assert_eq!(projected_value(params.price, 0.04, 0), params.price);
    }

    #[test]
    fn test_value_path_best_dominates_base() {
        let params = ScenarioParameters::default();
        let path = value_path(&params, 10);

        assert_eq!(path.len(), 11);
        assert_eq!(path[0].base, params.price);
        assert_eq!(path[0].best, params.price);
        assert!(path[1..].iter().all(|p| p.best > p.base));
    }

    #[test]
    fn test_scenario_selects_growth() {
        let params = ScenarioParameters::default();
        assert_eq!(GrowthScenario::Base.growth_rate(&params), 0.025);
        assert_eq!(GrowthScenario::Best.growth_rate(&params), 0.045);
        assert_eq!(GrowthScenario::default(), GrowthScenario::Base);
    }
}
