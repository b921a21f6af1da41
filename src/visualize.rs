//! Pseudo-color rendering of a feature matrix.
//!
//! Each value goes through `ln(1 + max(epsilon, v))`, the result is min-max
//! normalized over the whole matrix, and level `v` maps to
//! `(255 v, 128 v, 255 (1 - v))`.

use crate::config::MEL_BANDS;
use crate::error::{MfccError, Result};
use crate::matrix::FeatureMatrix;
use plotters::prelude::*;
use std::path::Path;

pub type Rgb = [u8; 3];

/// Display levels in `[0, 1]`, row-major. A constant matrix maps to all zeros.
pub fn display_levels(matrix: &FeatureMatrix, epsilon: f32) -> Vec<f32> {
    let scaled: Vec<f32> = matrix.values().map(|v| v.max(epsilon).ln_1p()).collect();

    let (min, max) = scaled
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    scaled
        .iter()
        .map(|&v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}

pub fn pseudo_color(level: f32) -> Rgb {
    let v = level.clamp(0.0, 1.0);
    [
        (255.0 * v).round() as u8,
        (128.0 * v).round() as u8,
        (255.0 * (1.0 - v)).round() as u8,
    ]
}

/// `[num_frames][MEL_BANDS]` colors.
pub fn colorize(matrix: &FeatureMatrix, epsilon: f32) -> Vec<[Rgb; MEL_BANDS]> {
    display_levels(matrix, epsilon)
        .chunks_exact(MEL_BANDS)
        .map(|levels| {
            let mut row = [[0u8; 3]; MEL_BANDS];
            for (px, &v) in row.iter_mut().zip(levels) {
                *px = pseudo_color(v);
            }
            row
        })
        .collect()
}

/// Write the colorized matrix as a PNG, one `cell_px` square per value.
/// Frames run top to bottom, coefficients left to right.
pub fn render_png<P: AsRef<Path>>(
    matrix: &FeatureMatrix,
    path: P,
    epsilon: f32,
    cell_px: u32,
) -> Result<()> {
    if matrix.is_empty() {
        return Err(MfccError::render("nothing to draw, feature matrix is empty"));
    }
    if cell_px == 0 {
        return Err(MfccError::invalid_config("cell size must be at least one pixel"));
    }

    let width = MEL_BANDS as u32 * cell_px;
    let height = matrix.num_frames() as u32 * cell_px;
    let root = BitMapBackend::new(path.as_ref(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| MfccError::render(e.to_string()))?;

    let cell = cell_px as i32;
    for (y, row) in colorize(matrix, epsilon).iter().enumerate() {
        for (x, rgb) in row.iter().enumerate() {
            let (x0, y0) = (x as i32 * cell, y as i32 * cell);
            let color = RGBColor(rgb[0], rgb[1], rgb[2]);
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell - 1, y0 + cell - 1)],
                color.filled(),
            ))
            .map_err(|e| MfccError::render(e.to_string()))?;
        }
    }

    root.present().map_err(|e| MfccError::render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod visualize_tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> FeatureMatrix {
        let flat: Vec<f32> = (0..MEL_BANDS * 2).map(|i| i as f32 - 5.0).collect();
        FeatureMatrix::from_flat(&flat).unwrap()
    }

    #[test]
    fn test_levels_are_normalized() {
        let levels = display_levels(&ramp(), 1e-6);
        assert_eq!(levels.len(), MEL_BANDS * 2);
        assert_relative_eq!(levels.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_relative_eq!(levels.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        // Negative coefficients clamp to epsilon and share the lowest level.
        assert_eq!(levels[0], levels[5]);
    }

    #[test]
    fn test_constant_matrix_maps_to_zero() {
        let matrix = FeatureMatrix::new(vec![[2.0; MEL_BANDS]; 3]);
        assert!(display_levels(&matrix, 1e-6).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_pseudo_color_endpoints() {
        assert_eq!(pseudo_color(0.0), [0, 0, 255]);
        assert_eq!(pseudo_color(1.0), [255, 128, 0]);
        assert_eq!(pseudo_color(0.5), [128, 64, 128]);
    }

    #[test]
    fn test_colorize_shape() {
        let colors = colorize(&ramp(), 1e-6);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[1][MEL_BANDS - 1], [255, 128, 0]);
    }

    #[test]
    fn test_render_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfcc.png");
        render_png(&ramp(), &path, 1e-6, 4).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_empty_matrix_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_png(&FeatureMatrix::default(), dir.path().join("x.png"), 1e-6, 4);
        assert!(matches!(result, Err(MfccError::Render(_))));
    }
}
