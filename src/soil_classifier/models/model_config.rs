use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    /// (width, height) the network was trained on.
    pub input_shape: (u32, u32),
}
