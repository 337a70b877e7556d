use crate::error::SoilError;
use crate::library::logger::interface::Logger;
use crate::prediction::Prediction;
use crate::soil_classifier::interface::SoilClassifier;
use crate::soil_class::SOIL_CLASS_COUNT;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum FakeScores {
    Fixed([f32; SOIL_CLASS_COUNT]),
    Random,
    Failing(String),
    Panicking(String),
}

pub struct SoilClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scores: FakeScores,
}

impl SoilClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, scores: FakeScores) -> Self {
        Self {
            logger: logger.with_namespace("fake"),
            scores,
        }
    }

    fn random_distribution() -> Result<[f32; SOIL_CLASS_COUNT], SoilError> {
        let dist = Uniform::new(0.0f32, 1.0)
            .map_err(|e| SoilError::Inference(e.to_string()))?;
        let mut rng = rand::rng();

        let mut scores = [0.0f32; SOIL_CLASS_COUNT];
        for score in scores.iter_mut() {
            *score = dist.sample(&mut rng).exp();
        }

        let total: f32 = scores.iter().sum();
        for score in scores.iter_mut() {
            *score /= total;
        }

        Ok(scores)
    }
}

impl SoilClassifier for SoilClassifierFake {
    fn classify(&self, image: &DynamicImage) -> Result<Prediction, SoilError> {
        let _ = self.logger.info(&format!(
            "Classifying {}x{} image with fake classifier...",
            image.width(),
            image.height()
        ));

        match &self.scores {
            FakeScores::Fixed(scores) => Ok(Prediction::new(*scores)),
            FakeScores::Random => Ok(Prediction::new(Self::random_distribution()?)),
            FakeScores::Failing(message) => Err(SoilError::Inference(message.clone())),
            FakeScores::Panicking(message) => panic!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;
    use image::{ImageBuffer, Rgb};

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(
            chrono::FixedOffset::east_opt(7 * 3600).unwrap(),
        ))
    }

    fn photo() -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 48, Rgb([90u8, 60, 30])))
    }

    #[test]
    fn test_random_scores_form_a_distribution() {
        let classifier = SoilClassifierFake::new(logger(), FakeScores::Random);

        for _ in 0..20 {
            let prediction = classifier.classify(&photo()).unwrap();
            let probabilities = prediction.probabilities();

            assert_eq!(probabilities.len(), SOIL_CLASS_COUNT);
            assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
            let total: f32 = probabilities.iter().sum();
            assert!((total - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_fixed_scores_are_deterministic() {
        let scores = [0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.1, 0.6];
        let classifier = SoilClassifierFake::new(logger(), FakeScores::Fixed(scores));

        let first = classifier.classify(&photo()).unwrap();
        let second = classifier.classify(&photo()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.probabilities(), &scores);
    }

    #[test]
    fn test_failing_classifier() {
        let classifier =
            SoilClassifierFake::new(logger(), FakeScores::Failing("boom".to_string()));

        let result = classifier.classify(&photo());

        assert!(matches!(result, Err(SoilError::Inference(message)) if message == "boom"));
    }
}
