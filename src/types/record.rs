//! Fixed-shape prediction record handed to the predictor

use crate::types::inputs::{Sector, UkRegion};
use serde::{Deserialize, Serialize};

/// Column names of the prediction record, exactly as the model was trained on.
pub const FEATURE_NAMES: [&str; 14] = [
    "Year",
    "Latitude",
    "Longitude",
    "Sector",
    "UK_Region",
    "mean_temperature_winter",
    "mean_wind_winter",
    "total_rainfall_winter",
    "mean_temperature_annual",
    "mean_wind_annual",
    "total_rainfall_annual",
    "mean_temperature_winter_X_total_rainfall_winter",
    "mean_pressure_annual_X_mean_wind_annual",
    "Facility_Count_25km",
];

/// A single column value as the trees see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(u32),
}

impl FeatureValue {
    pub fn is_categorical(&self) -> bool {
        matches!(self, FeatureValue::Categorical(_))
    }

    /// Value fed to split comparisons; categories are passed as their code.
    pub fn as_f32(&self) -> f32 {
        match *self {
            FeatureValue::Numeric(v) => v as f32,
            FeatureValue::Categorical(code) => code as f32,
        }
    }
}

/// Single-row record with the fourteen model columns.
///
/// Built fresh for every prediction and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Latitude")]
    pub latitude: f64,

    #[serde(rename = "Longitude")]
    pub longitude: f64,

    #[serde(rename = "Sector")]
    pub sector: Sector,

    #[serde(rename = "UK_Region")]
    pub uk_region: UkRegion,

    pub mean_temperature_winter: f64,
    pub mean_wind_winter: f64,
    pub total_rainfall_winter: f64,
    pub mean_temperature_annual: f64,
    pub mean_wind_annual: f64,
    pub total_rainfall_annual: f64,

    /// Winter temperature times winter rainfall
    #[serde(rename = "mean_temperature_winter_X_total_rainfall_winter")]
    pub temp_rain_winter_interaction: f64,

    /// Annual pressure times annual wind
    #[serde(rename = "mean_pressure_annual_X_mean_wind_annual")]
    pub pressure_wind_annual_interaction: f64,

    #[serde(rename = "Facility_Count_25km")]
    pub facility_count_25km: u32,
}

impl PredictionRecord {
    /// Look up a column by its exact (case-sensitive) name.
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        let value = match name {
            "Year" => FeatureValue::Numeric(self.year as f64),
            "Latitude" => FeatureValue::Numeric(self.latitude),
            "Longitude" => FeatureValue::Numeric(self.longitude),
            "Sector" => FeatureValue::Categorical(self.sector.category_code()),
            "UK_Region" => FeatureValue::Categorical(self.uk_region.category_code()),
            "mean_temperature_winter" => FeatureValue::Numeric(self.mean_temperature_winter),
            "mean_wind_winter" => FeatureValue::Numeric(self.mean_wind_winter),
            "total_rainfall_winter" => FeatureValue::Numeric(self.total_rainfall_winter),
            "mean_temperature_annual" => FeatureValue::Numeric(self.mean_temperature_annual),
            "mean_wind_annual" => FeatureValue::Numeric(self.mean_wind_annual),
            "total_rainfall_annual" => FeatureValue::Numeric(self.total_rainfall_annual),
            "mean_temperature_winter_X_total_rainfall_winter" => {
                FeatureValue::Numeric(self.temp_rain_winter_interaction)
            }
            "mean_pressure_annual_X_mean_wind_annual" => {
                FeatureValue::Numeric(self.pressure_wind_annual_interaction)
            }
            "Facility_Count_25km" => FeatureValue::Numeric(self.facility_count_25km as f64),
            _ => return None,
        };
        Some(value)
    }

    /// All columns in canonical order.
    pub fn features(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> + '_ {
        FEATURE_NAMES
            .iter()
            .filter_map(move |&name| self.feature(name).map(|value| (name, value)))
    }
}
