use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoilError {
    #[error("File model '{}' tidak ditemukan!", path.display())]
    ModelNotFound { path: PathBuf },
    #[error("Gagal memuat model: {0}")]
    ModelLoad(String),
    #[error("Format file '{file_name}' tidak didukung, gunakan salah satu dari: {expected}")]
    UnsupportedFormat { file_name: String, expected: String },
    #[error("Gagal membaca file gambar: {0}")]
    ImageRead(#[from] std::io::Error),
    #[error("Gagal membuka gambar: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Prediksi gagal: {0}")]
    Inference(String),
    #[error("Model menghasilkan {len} nilai, seharusnya {expected}")]
    UnexpectedOutput { len: usize, expected: usize },
}

impl SoilError {
    /// Model errors end the session; everything else is scoped to one upload.
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            SoilError::ModelNotFound { .. } | SoilError::ModelLoad(_)
        )
    }
}
