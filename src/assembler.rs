//! Record assembly and prediction.
//!
//! This module turns the values collected by the form into the fourteen
//! model columns, including the two derived interaction terms, and runs the
//! loaded predictor on the result.

use crate::error::PredictionError;
use crate::models::predictor::{Predictor, PredictorHandle};
use crate::types::inputs::FieldValues;
use crate::types::prediction::Prediction;
use crate::types::record::{PredictionRecord, FEATURE_NAMES};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Winter temperature times winter rainfall.
pub fn temp_rain_winter_interaction(mean_temperature_winter: f64, total_rainfall_winter: f64) -> f64 {
    mean_temperature_winter * total_rainfall_winter
}

/// Annual pressure times annual wind.
pub fn pressure_wind_annual_interaction(mean_pressure_annual: f64, mean_wind_annual: f64) -> f64 {
    mean_pressure_annual * mean_wind_annual
}

/// Builds prediction records from form values.
///
/// Range limits are the form's job; values are copied through as given.
pub struct RecordAssembler;

impl RecordAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the record for one prediction.
    pub fn assemble(&self, inputs: &FieldValues) -> PredictionRecord {
        PredictionRecord {
            year: inputs.year,
            latitude: inputs.latitude,
            longitude: inputs.longitude,
            sector: inputs.sector,
            uk_region: inputs.uk_region,
            mean_temperature_winter: inputs.mean_temperature_winter,
            mean_wind_winter: inputs.mean_wind_winter,
            total_rainfall_winter: inputs.total_rainfall_winter,
            mean_temperature_annual: inputs.mean_temperature_annual,
            mean_wind_annual: inputs.mean_wind_annual,
            total_rainfall_annual: inputs.total_rainfall_annual,
            temp_rain_winter_interaction: temp_rain_winter_interaction(
                inputs.mean_temperature_winter,
                inputs.total_rainfall_winter,
            ),
            pressure_wind_annual_interaction: pressure_wind_annual_interaction(
                inputs.mean_pressure_annual,
                inputs.mean_wind_annual,
            ),
            facility_count_25km: inputs.facility_count_25km,
        }
    }

    /// Number of columns in every record
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble a record from `inputs` and return the predicted emissions.
///
/// The predictor returns one value per output; the first is the estimate.
pub fn predict(inputs: &FieldValues, predictor: &dyn Predictor) -> Result<f64, PredictionError> {
    let record = RecordAssembler::new().assemble(inputs);
    debug!(record = ?record, "Assembled prediction record");

    let outputs = predictor.predict(&record)?;
    let value = outputs
        .first()
        .copied()
        .ok_or(PredictionError::EmptyOutput)?;

    if !value.is_finite() {
        return Err(PredictionError::NonFinite(value));
    }

    Ok(value)
}

/// Runs predictions against the process-wide predictor and tags each
/// result with an id and latency for logging.
#[derive(Clone)]
pub struct PredictionAssembler {
    predictor: PredictorHandle,
}

impl PredictionAssembler {
    pub fn new(predictor: PredictorHandle) -> Self {
        Self { predictor }
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.predictor.name()
    }

    /// Run one prediction from the current form values.
    pub fn run(&self, inputs: &FieldValues) -> Result<Prediction, PredictionError> {
        let start = Instant::now();

        match predict(inputs, self.predictor.as_ref()) {
            Ok(value) => {
                let prediction = Prediction::new(value, start.elapsed().as_micros() as u64);
                info!(
                    prediction_id = %prediction.prediction_id,
                    model = %self.model_name(),
                    emissions_tonnes = prediction.emissions_tonnes,
                    latency_us = prediction.latency_us,
                    "Prediction complete"
                );
                Ok(prediction)
            }
            Err(e) => {
                warn!(
                    model = %self.model_name(),
                    error = %e,
                    "Prediction failed"
                );
                Err(e)
            }
        }
    }
}
