//! Boundary to the classifier that consumes feature tensors.

use crate::error::{MfccError, Result};
use crate::layout::FeatureTensor;
use tracing::debug;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// A model returning the probability that the audio is genuine.
pub trait Classifier {
    fn predict(&self, tensor: &FeatureTensor) -> Result<f32>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub probability: f32,
    pub genuine: bool,
}

impl Verdict {
    /// `genuine` when `probability > threshold`. The probability is clamped to `[0, 1]`.
    pub fn new(probability: f32, threshold: f32) -> Result<Self> {
        if !probability.is_finite() {
            return Err(MfccError::inference(format!(
                "classifier returned {}",
                probability
            )));
        }
        let probability = probability.clamp(0.0, 1.0);
        Ok(Self {
            probability,
            genuine: probability > threshold,
        })
    }
}

pub fn classify<C: Classifier + ?Sized>(
    classifier: &C,
    tensor: &FeatureTensor,
    threshold: f32,
) -> Result<Verdict> {
    let verdict = Verdict::new(classifier.predict(tensor)?, threshold)?;
    debug!(
        shape = ?tensor.shape(),
        probability = verdict.probability,
        genuine = verdict.genuine,
        "classified features"
    );
    Ok(verdict)
}
