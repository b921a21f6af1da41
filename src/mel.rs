use crate::config::{MEL_BANDS, MEL_FILTER_POINTS, SAMPLE_RATE, SPECTRUM_SIZE};
use crate::error::{ensure_len, Result};
use crate::spectrum::{bin_to_hz, hz_to_bin};
use tracing::debug;

pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular filter with boundaries given as fractional spectrum bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelFilter {
    pub left: f32,
    pub center: f32,
    pub right: f32,
}

impl MelFilter {
    /// Weight of spectrum bin `bin` under this filter.
    ///
    /// Bins below `center` belong to the rising edge, bins from `center` up
    /// belong to the falling edge, so no bin is counted on both. An edge with
    /// zero width contributes nothing.
    pub fn weight(&self, bin: usize) -> f32 {
        let f = bin as f32;
        if f < self.left || f > self.right {
            return 0.0;
        }
        if f < self.center {
            let span = self.center - self.left;
            if span > 0.0 {
                (f - self.left) / span
            } else {
                0.0
            }
        } else {
            let span = self.right - self.center;
            if span > 0.0 {
                (self.right - f) / span
            } else {
                0.0
            }
        }
    }

    pub fn center_hz(&self) -> f32 {
        bin_to_hz(self.center)
    }
}

#[derive(Debug, Clone)]
struct WeightRow {
    start: usize,
    weights: Vec<f32>,
}

impl WeightRow {
    fn new(filter: &MelFilter) -> Self {
        let start = filter.left.max(0.0).ceil() as usize;
        let end = (filter.right.floor().max(0.0) as usize).min(SPECTRUM_SIZE - 1);
        let weights = if start <= end {
            (start..=end).map(|bin| filter.weight(bin)).collect()
        } else {
            Vec::new()
        };
        Self { start, weights }
    }

    fn energy(&self, spectrum: &[f32]) -> f32 {
        self.weights
            .iter()
            .zip(&spectrum[self.start.min(spectrum.len())..])
            .map(|(w, s)| w * s)
            .sum()
    }
}

/// Mel filters between 0 Hz and Nyquist, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    boundaries_hz: Vec<f32>,
    filters: Vec<MelFilter>,
    rows: Vec<WeightRow>,
}

impl Default for MelFilterbank {
    fn default() -> Self {
        Self::new()
    }
}

impl MelFilterbank {
    pub fn new() -> Self {
        let mel_max = hz_to_mel(SAMPLE_RATE as f32 / 2.0);
        let boundaries_hz: Vec<f32> = (0..MEL_FILTER_POINTS)
            .map(|i| mel_to_hz(mel_max * i as f32 / (MEL_FILTER_POINTS - 1) as f32))
            .collect();

        let filters: Vec<MelFilter> = boundaries_hz
            .windows(3)
            .map(|w| MelFilter {
                left: hz_to_bin(w[0]),
                center: hz_to_bin(w[1]),
                right: hz_to_bin(w[2]),
            })
            .collect();

        let rows = filters.iter().map(WeightRow::new).collect();

        debug!(
            bands = filters.len(),
            first_center_hz = boundaries_hz[1],
            last_center_hz = boundaries_hz[MEL_BANDS],
            "built mel filterbank"
        );

        Self {
            boundaries_hz,
            filters,
            rows,
        }
    }

    /// The `MEL_BANDS + 2` boundary frequencies in Hz.
    pub fn boundaries_hz(&self) -> &[f32] {
        &self.boundaries_hz
    }

    pub fn filters(&self) -> &[MelFilter] {
        &self.filters
    }

    /// Band whose center frequency lies closest to `hz`.
    pub fn closest_band(&self, hz: f32) -> usize {
        self.filters
            .iter()
            .enumerate()
            .min_by(|a, b| {
                (a.1.center_hz() - hz)
                    .abs()
                    .total_cmp(&(b.1.center_hz() - hz).abs())
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Project a magnitude spectrum onto the filters.
    pub fn apply(&self, spectrum: &[f32]) -> Result<Vec<f32>> {
        ensure_len("spectrum", SPECTRUM_SIZE, spectrum.len())?;
        Ok(self.rows.iter().map(|row| row.energy(spectrum)).collect())
    }
}
