use crate::config::{WindowKind, FFT_SIZE, FRAME_SIZE, SAMPLE_RATE, SPECTRUM_SIZE};
use crate::error::{ensure_len, Result};
use core::f32::consts::PI;
use num_complex::Complex;
use num_traits::Zero;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (size as f32 - 1.0)).cos()))
        .collect()
}

pub fn hamming_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f32 / (size as f32 - 1.0)).cos())
        .collect()
}

/// Center frequency in Hz of spectrum bin `bin`.
pub fn bin_to_hz(bin: f32) -> f32 {
    bin * SAMPLE_RATE as f32 / FFT_SIZE as f32
}

/// Fractional spectrum bin position of `hz`.
pub fn hz_to_bin(hz: f32) -> f32 {
    hz * FFT_SIZE as f32 / SAMPLE_RATE as f32
}

/// Magnitude spectrum of a zero-padded frame.
///
/// The FFT plan is built once and shared; `analyze` takes `&self` so one
/// analyzer serves every worker thread.
pub struct SpectralAnalyzer {
    window: Option<Vec<f32>>,
    fft: Arc<dyn Fft<f32>>,
}

impl SpectralAnalyzer {
    pub fn new(window: WindowKind) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        let window = match window {
            WindowKind::Rectangular => None,
            WindowKind::Hann => Some(hann_window(FRAME_SIZE)),
            WindowKind::Hamming => Some(hamming_window(FRAME_SIZE)),
        };

        Self { window, fft }
    }

    /// Returns the first `FFT_SIZE / 2` magnitudes of the frame's spectrum.
    pub fn analyze(&self, frame: &[f32]) -> Result<Vec<f32>> {
        ensure_len("frame", FRAME_SIZE, frame.len())?;

        let mut buffer = vec![Complex::<f32>::zero(); FFT_SIZE];
        for (slot, &sample) in buffer.iter_mut().zip(frame) {
            slot.re = sample;
        }
        if let Some(window) = &self.window {
            for (slot, w) in buffer.iter_mut().zip(window) {
                slot.re *= w;
            }
        }

        self.fft.process(&mut buffer);

        Ok(buffer[..SPECTRUM_SIZE].iter().map(|c| c.norm()).collect())
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new(WindowKind::Rectangular)
    }
}
