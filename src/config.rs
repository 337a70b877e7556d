use crate::soil_classifier::models::model_config::ModelConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub logger_timezone: chrono::FixedOffset,
    pub accepted_extensions: Vec<String>,
    pub window_size: [f32; 2],
    /// Longest side of the on-screen preview; the model still sees the full image.
    pub preview_max_side: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                onnx_model_path: PathBuf::from("Model_Terbaik.onnx"),
                input_shape: (299, 299),
            },
            logger_timezone: western_indonesia_time(),
            accepted_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            window_size: [760.0, 820.0],
            preview_max_side: 1024,
        }
    }
}

fn western_indonesia_time() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(7 * 3600).unwrap()
}
