//! Model loading and inference components

pub mod loader;
pub mod objective;
pub mod predictor;
pub mod xgboost;

pub use loader::{ModelLoader, DEFAULT_MODEL_PATH};
pub use predictor::{Predictor, PredictorHandle};
pub use xgboost::XgbModel;
