//! Error taxonomy for model loading and prediction.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while obtaining the predictor.
///
/// Either variant means no prediction is possible; the caller halts the
/// interface instead of continuing in a degraded state.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact does not exist at the expected path.
    #[error(
        "Model file not found. Please ensure '{}' is in the same directory as this app.",
        path.display()
    )]
    NotFound { path: PathBuf },

    /// The artifact exists but could not be read or deserialized.
    #[error(
        "Failed to load the model from '{}': {source}. This might be due to compatibility \
         issues. Please ensure the model was saved with a compatible version.",
        path.display()
    )]
    Load {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },
}

/// Reasons an artifact is rejected after it was found on disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported booster '{0}'")]
    UnsupportedBooster(String),

    #[error("unsupported objective '{0}'")]
    UnsupportedObjective(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

/// Non-fatal errors raised by a single prediction.
///
/// The form reports these to the user and stays usable.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("predictor returned no output")]
    EmptyOutput,

    #[error("predictor produced a non-finite value ({0})")]
    NonFinite(f64),

    #[error("inference failed: {0}")]
    Inference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_file() {
        let err = ModelError::NotFound {
            path: PathBuf::from("xgb_strategic_optuna.json"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Model file not found."));
        assert!(msg.contains("'xgb_strategic_optuna.json'"));
    }

    #[test]
    fn test_load_error_keeps_source() {
        let err = ModelError::Load {
            path: PathBuf::from("model.json"),
            source: ArtifactError::UnsupportedObjective("rank:pairwise".to_string()),
        };
        assert!(err.to_string().contains("unsupported objective 'rank:pairwise'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
