use crate::error::SoilError;
use crate::library::logger::interface::Logger;
use crate::prediction::Prediction;
use crate::soil_classifier::interface::SoilClassifier;
use crate::soil_classifier::models::model_config::ModelConfig;
use crate::soil_classifier::tract::image::resize_image_to_tensor;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tract_onnx::prelude::*;

pub struct SoilClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl SoilClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, SoilError> {
        if !config.onnx_model_path.exists() {
            return Err(SoilError::ModelNotFound {
                path: config.onnx_model_path.clone(),
            });
        }

        let started = Instant::now();
        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .map_err(|e| SoilError::ModelLoad(format!("{:#}", e)))?;
        let classifier = Self::from_model(model, config, logger)?;

        let _ = classifier.logger.info(&format!(
            "Loaded {} in {:?}",
            classifier.config.onnx_model_path.display(),
            started.elapsed()
        ));

        Ok(classifier)
    }

    /// Pins the input shape of a parsed graph and makes it runnable.
    fn from_model(
        model: InferenceModel,
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, SoilError> {
        let (width, height) = config.input_shape;

        // The network takes NHWC input: [batch, height, width, channels]
        let model = model
            .with_input_fact(
                0,
                f32::fact([1, height as usize, width as usize, 3]).into(),
            )
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| SoilError::ModelLoad(format!("{:#}", e)))?;

        Ok(Self {
            model,
            config,
            logger: logger.with_namespace("tract_onnx"),
        })
    }
}

impl SoilClassifier for SoilClassifierTractOnnx {
    fn classify(&self, image: &DynamicImage) -> Result<Prediction, SoilError> {
        let (width, height) = self.config.input_shape;
        let input = resize_image_to_tensor(image, width, height);

        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| SoilError::Inference(format!("{:#}", e)))?;

        let output = outputs
            .first()
            .ok_or_else(|| SoilError::Inference("model produced no outputs".to_string()))?;

        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| SoilError::Inference(format!("{:#}", e)))?
            .iter()
            .copied()
            .collect();

        let prediction = Prediction::from_scores(&scores)?;

        let _ = self.logger.info(&format!(
            "Predicted {} ({:.3})",
            prediction.predicted_class(),
            prediction.confidence()
        ));

        Ok(prediction)
    }
}
