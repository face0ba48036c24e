//! Predictor abstraction shared by the loader and the assembler

use crate::error::PredictionError;
use crate::types::record::PredictionRecord;
use std::sync::Arc;

/// A loaded, read-only regression model.
///
/// Implementations are immutable after construction so one instance can be
/// shared across every prediction for the life of the process.
pub trait Predictor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Evaluate the model on one record.
    ///
    /// Returns one value per model output; single-target regressors return a
    /// one-element vector.
    fn predict(&self, record: &PredictionRecord) -> Result<Vec<f64>, PredictionError>;
}

/// Shared handle to the process-wide predictor.
pub type PredictorHandle = Arc<dyn Predictor>;
