use crate::error::SoilError;
use crate::prediction::Prediction;
use image::DynamicImage;

pub trait SoilClassifier {
    /// Scores one decoded photo against every soil class.
    fn classify(&self, image: &DynamicImage) -> Result<Prediction, SoilError>;
}
