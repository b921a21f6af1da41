use crate::error::{MfccError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SAMPLE_RATE: usize = 44100;
pub const FRAME_SIZE: usize = 1024;
pub const FFT_SIZE: usize = 2048;
pub const SPECTRUM_SIZE: usize = FFT_SIZE / 2;
pub const MEL_BANDS: usize = 13;
pub const MEL_FILTER_POINTS: usize = MEL_BANDS + 2;
pub const DEFAULT_EPSILON: f32 = 1e-6;

const _: () = assert!(FRAME_SIZE <= FFT_SIZE);

/// Window applied to each frame before the FFT.
///
/// Classifiers downstream were trained on unwindowed frames, so anything other
/// than `Rectangular` changes the features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    #[default]
    Rectangular,
    Hann,
    Hamming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    /// Stabilizer added before `log10`. `1.0` gives `log10(1 + energy)`.
    pub epsilon: f32,
    pub window: WindowKind,
    /// Worker threads for parallel extraction, 0 picks the available parallelism.
    pub workers: usize,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            window: WindowKind::Rectangular,
            workers: 0,
        }
    }
}

impl MfccConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: MfccConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(MfccError::invalid_config(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
