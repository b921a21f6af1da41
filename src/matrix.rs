use crate::config::MEL_BANDS;
use crate::error::{MfccError, Result};

pub type MfccVector = [f32; MEL_BANDS];

/// Per-frame MFCC rows in temporal order, `[num_frames][MEL_BANDS]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<MfccVector>,
}

impl FeatureMatrix {
    pub fn new(rows: Vec<MfccVector>) -> Self {
        Self { rows }
    }

    /// Rebuild a matrix from a row-major buffer.
    pub fn from_flat(values: &[f32]) -> Result<Self> {
        if values.len() % MEL_BANDS != 0 {
            return Err(MfccError::shape(
                "flat feature buffer",
                values.len() / MEL_BANDS * MEL_BANDS,
                values.len(),
            ));
        }
        let rows = values
            .chunks_exact(MEL_BANDS)
            .map(|chunk| {
                let mut row = [0.0; MEL_BANDS];
                row.copy_from_slice(chunk);
                row
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn num_frames(&self) -> usize {
        self.rows.len()
    }

    pub fn num_coefficients(&self) -> usize {
        MEL_BANDS
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[MfccVector] {
        &self.rows
    }

    pub fn row(&self, frame: usize) -> Option<&MfccVector> {
        self.rows.get(frame)
    }

    pub fn push(&mut self, row: MfccVector) {
        self.rows.push(row);
    }

    pub fn extend<I: IntoIterator<Item = MfccVector>>(&mut self, rows: I) {
        self.rows.extend(rows);
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Row-major copy of the matrix.
    pub fn to_flat(&self) -> Vec<f32> {
        self.values().collect()
    }

    pub fn is_finite(&self) -> bool {
        self.values().all(f32::is_finite)
    }

    /// Mean of each coefficient over all frames. Zeros for an empty matrix.
    pub fn coefficient_means(&self) -> MfccVector {
        let mut means = [0.0; MEL_BANDS];
        if self.rows.is_empty() {
            return means;
        }
        for row in &self.rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        let n = self.rows.len() as f32;
        means.iter_mut().for_each(|m| *m /= n);
        means
    }
}
