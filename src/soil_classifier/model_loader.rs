use crate::error::SoilError;
use crate::library::logger::interface::Logger;
use crate::soil_classifier::impl_tract_onnx::SoilClassifierTractOnnx;
use crate::soil_classifier::interface::SoilClassifier;
use crate::soil_classifier::models::model_config::ModelConfig;
use std::sync::{Arc, Mutex};

pub type SharedSoilClassifier = Arc<dyn SoilClassifier + Send + Sync>;

type LoadFn = dyn Fn(&ModelConfig, Arc<dyn Logger + Send + Sync>) -> Result<SharedSoilClassifier, SoilError>
    + Send
    + Sync;

/// Loads the classifier on first use and hands out the same handle afterwards.
///
/// Only successful loads are cached, so a failed load can be retried by calling
/// [`ModelLoader::load`] again. The lock is held while loading, so concurrent
/// callers never deserialize the model twice.
pub struct ModelLoader {
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    load_fn: Box<LoadFn>,
    loaded: Mutex<Option<SharedSoilClassifier>>,
}

impl ModelLoader {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_load_fn(config, logger, |config, logger| {
            let classifier = SoilClassifierTractOnnx::new(config.clone(), logger)?;
            Ok(Arc::new(classifier) as SharedSoilClassifier)
        })
    }

    pub fn with_load_fn<F>(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>, load_fn: F) -> Self
    where
        F: Fn(&ModelConfig, Arc<dyn Logger + Send + Sync>) -> Result<SharedSoilClassifier, SoilError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            config,
            logger: logger.with_namespace("model_loader"),
            load_fn: Box::new(load_fn),
            loaded: Mutex::new(None),
        }
    }

    pub fn load(&self) -> Result<SharedSoilClassifier, SoilError> {
        let mut loaded = self
            .loaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(classifier) = loaded.as_ref() {
            return Ok(Arc::clone(classifier));
        }

        let _ = self.logger.info(&format!(
            "Loading model from {}",
            self.config.onnx_model_path.display()
        ));

        match (self.load_fn)(&self.config, Arc::clone(&self.logger)) {
            Ok(classifier) => {
                *loaded = Some(Arc::clone(&classifier));
                Ok(classifier)
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Model load failed: {}", e));
                Err(e)
            }
        }
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.loaded
            .lock()
            .map(|loaded| loaded.is_some())
            .unwrap_or(false)
    }
}
