//! Type definitions for the predictor

pub mod inputs;
pub mod prediction;
pub mod record;

pub use inputs::{FieldValues, Sector, UkRegion};
pub use prediction::Prediction;
pub use record::PredictionRecord;
