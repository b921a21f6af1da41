use crate::config::{DEFAULT_EPSILON, MEL_BANDS};
use crate::error::{ensure_len, Result};

/// `log10(max(energy, 0) + epsilon)` per band. NaN energies count as zero.
///
/// Samples far outside `[-1, 1]` (e.g. `f32::MAX`) overflow the FFT to NaN, so
/// such frames come out as the silence row rather than an error.
pub fn log_compress(energies: &[f32], epsilon: f32) -> Vec<f32> {
    energies
        .iter()
        .map(|&e| (e.max(0.0) + epsilon).log10())
        .collect()
}

/// Log compression followed by a `MEL_BANDS`-point DCT-II scaled by `sqrt(2 / MEL_BANDS)`.
#[derive(Debug, Clone)]
pub struct CepstralTransform {
    epsilon: f32,
    basis: Vec<[f32; MEL_BANDS]>,
}

impl Default for CepstralTransform {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl CepstralTransform {
    pub fn new(epsilon: f32) -> Self {
        let n = MEL_BANDS as f64;
        let scale = (2.0 / n).sqrt();
        let basis = (0..MEL_BANDS)
            .map(|k| {
                let mut row = [0.0f32; MEL_BANDS];
                for (i, slot) in row.iter_mut().enumerate() {
                    let angle = std::f64::consts::PI * k as f64 * (i as f64 + 0.5) / n;
                    *slot = (scale * angle.cos()) as f32;
                }
                row
            })
            .collect();

        Self { epsilon, basis }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn dct_ii(&self, values: &[f32]) -> Result<[f32; MEL_BANDS]> {
        ensure_len("log-mel vector", MEL_BANDS, values.len())?;

        let mut out = [0.0f32; MEL_BANDS];
        for (coeff, row) in out.iter_mut().zip(&self.basis) {
            *coeff = row.iter().zip(values).map(|(b, v)| b * v).sum();
        }
        Ok(out)
    }

    /// Mel-band energies to MFCCs.
    pub fn transform(&self, energies: &[f32]) -> Result<[f32; MEL_BANDS]> {
        ensure_len("mel energy vector", MEL_BANDS, energies.len())?;
        self.dct_ii(&log_compress(energies, self.epsilon))
    }
}
