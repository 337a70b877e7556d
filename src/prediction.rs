use crate::error::SoilError;
use crate::soil_class::{SoilClass, SOIL_CLASS_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbability {
    pub class: SoilClass,
    pub probability: f32,
}

impl ClassProbability {
    /// e.g. `Pasir: 0.820 (82.0%)`
    pub fn to_display_string(&self) -> String {
        format!(
            "{}: {:.3} ({:.1}%)",
            self.class.label(),
            self.probability,
            self.probability * 100.0
        )
    }
}

/// Scores for every soil class, index-aligned with `SoilClass::ALL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    probabilities: [f32; SOIL_CLASS_COUNT],
}

impl Prediction {
    pub fn new(probabilities: [f32; SOIL_CLASS_COUNT]) -> Self {
        Self { probabilities }
    }

    pub fn from_scores(scores: &[f32]) -> Result<Self, SoilError> {
        let probabilities: [f32; SOIL_CLASS_COUNT] =
            scores
                .try_into()
                .map_err(|_| SoilError::UnexpectedOutput {
                    len: scores.len(),
                    expected: SOIL_CLASS_COUNT,
                })?;

        Ok(Self { probabilities })
    }

    #[cfg(test)]
    pub fn probabilities(&self) -> &[f32; SOIL_CLASS_COUNT] {
        &self.probabilities
    }

    /// Index of the highest score. Ties go to the first occurrence and NaN never wins.
    pub fn predicted_index(&self) -> usize {
        let mut best = 0;
        for (i, &p) in self.probabilities.iter().enumerate().skip(1) {
            if p > self.probabilities[best] || (self.probabilities[best].is_nan() && !p.is_nan()) {
                best = i;
            }
        }
        best
    }

    pub fn predicted_class(&self) -> SoilClass {
        SoilClass::ALL[self.predicted_index()]
    }

    pub fn confidence(&self) -> f32 {
        self.probabilities[self.predicted_class().index()]
    }

    pub fn breakdown(&self) -> Vec<ClassProbability> {
        SoilClass::ALL
            .iter()
            .zip(self.probabilities.iter())
            .map(|(&class, &probability)| ClassProbability { class, probability })
            .collect()
    }

    pub fn headline(&self) -> String {
        format!("Jenis Tanah: {}", self.predicted_class().label())
    }

    pub fn confidence_text(&self) -> String {
        format!("Confidence: {}", format_percent(self.confidence()))
    }
}

/// Two-decimal percentage, `0.82` becomes `82.00%`.
pub fn format_percent(value: f32) -> String {
    format!("{:.2}%", value * 100.0)
}
