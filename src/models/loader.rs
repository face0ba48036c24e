//! Model artifact loader

use crate::error::{ArtifactError, ModelError};
use crate::models::predictor::PredictorHandle;
use crate::models::xgboost::XgbModel;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// File name the artifact is expected under, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "xgb_strategic_optuna.json";

/// Loads the predictor once and hands out the same instance afterwards.
///
/// The first successful load is cached. Initialization is serialized behind
/// a mutex, so concurrent first calls read the file once. Failures are not
/// cached; the caller is expected to halt on them.
pub struct ModelLoader {
    path: PathBuf,
    cached: Mutex<Option<PredictorHandle>>,
}

impl ModelLoader {
    /// Create a loader for the artifact at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cached: Mutex::new(None),
        }
    }

    /// Artifact path this loader reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a predictor has already been loaded
    pub fn is_loaded(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// Return the cached predictor, reading the artifact on first use.
    pub fn load(&self) -> Result<PredictorHandle, ModelError> {
        let mut cached = self.cached.lock();
        if let Some(predictor) = cached.as_ref() {
            debug!(path = %self.path.display(), "Using cached model");
            return Ok(Arc::clone(predictor));
        }

        let model = Self::load_model(&self.path)?;
        let handle: PredictorHandle = Arc::new(model);
        *cached = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Read and compile a model file without caching.
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<XgbModel, ModelError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), "Loading model");

        let load_error = |source: ArtifactError| ModelError::Load {
            path: path.to_path_buf(),
            source,
        };

        let bytes = fs::read(path).map_err(|e| load_error(e.into()))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let model = XgbModel::from_slice(&name, &bytes).map_err(load_error)?;

        info!(
            model = %name,
            trees = model.num_trees(),
            features = model.num_feature(),
            targets = model.num_target(),
            objective = %model.objective(),
            xgboost_version = model.version().unwrap_or("unknown"),
            "Model loaded successfully"
        );

        Ok(model)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH)
    }
}
