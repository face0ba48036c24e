//! Methane Emissions Predictor Library
//!
//! Collects facility and climate parameters through a terminal form, builds
//! the fourteen-column record the model was trained on, and evaluates a
//! gradient-boosted tree ensemble loaded from an XGBoost JSON artifact.

pub mod assembler;
pub mod config;
pub mod error;
pub mod form;
pub mod metrics;
pub mod models;
pub mod types;

pub use assembler::{predict, PredictionAssembler, RecordAssembler};
pub use config::AppConfig;
pub use error::{ArtifactError, ModelError, PredictionError};
pub use form::PredictionForm;
pub use models::{ModelLoader, Predictor, PredictorHandle, XgbModel};
pub use types::{FieldValues, Prediction, PredictionRecord, Sector, UkRegion};
