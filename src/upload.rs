use crate::error::SoilError;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// A user-selected image file, held in memory for a single analysis.
#[derive(Clone, PartialEq)]
pub struct Upload {
    pub id: u64,
    pub file_name: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(id: u64, file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(id: u64, path: &Path) -> Result<Self, SoilError> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(id, file_name, bytes))
    }

    pub fn validate(&self, accepted_extensions: &[String]) -> Result<(), SoilError> {
        let extension = Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match extension {
            Some(ext) if accepted_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(()),
            _ => Err(SoilError::UnsupportedFormat {
                file_name: self.file_name.clone(),
                expected: accepted_extensions
                    .iter()
                    .map(|ext| ext.to_uppercase())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn decode(&self) -> Result<DynamicImage, SoilError> {
        Ok(image::load_from_memory(&self.bytes)?)
    }
}
