//! Outcome of a successful prediction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit suffix shown next to every emissions value.
pub const EMISSIONS_UNIT: &str = "tonnes/year";

/// Format an emissions estimate the way the output surface shows it.
pub fn format_emissions(tonnes_per_year: f64) -> String {
    format!("{:.2} {}", tonnes_per_year, EMISSIONS_UNIT)
}

/// Predicted annual methane emissions for one form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Identifier used to correlate log lines
    pub prediction_id: String,

    /// Predicted annual CH4 emissions in tonnes
    pub emissions_tonnes: f64,

    /// Time spent assembling and evaluating, in microseconds
    pub latency_us: u64,

    /// When the prediction was made
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    pub fn new(emissions_tonnes: f64, latency_us: u64) -> Self {
        Self {
            prediction_id: Uuid::new_v4().to_string(),
            emissions_tonnes,
            latency_us,
            timestamp: Utc::now(),
        }
    }

    /// Display string, e.g. `162.50 tonnes/year`.
    pub fn formatted(&self) -> String {
        format_emissions(self.emissions_tonnes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_two_decimals() {
        assert_eq!(format_emissions(162.5), "162.50 tonnes/year");
        assert_eq!(format_emissions(0.004), "0.00 tonnes/year");
        assert_eq!(format_emissions(-3.456), "-3.46 tonnes/year");
    }

    #[test]
    fn test_prediction_ids_are_unique() {
        let a = Prediction::new(1.0, 10);
        let b = Prediction::new(1.0, 10);
        assert_ne!(a.prediction_id, b.prediction_id);
        assert_eq!(a.formatted(), "1.00 tonnes/year");
    }
}
