//! Tensor layouts expected by downstream classifiers.

use crate::config::MEL_BANDS;
use crate::matrix::FeatureMatrix;
use crate::visualize::display_levels;

pub const IMAGE_SIDE: usize = 224;
pub const IMAGE_CHANNELS: usize = 3;
pub const DEFAULT_TIME_STEPS: usize = 216;

/// `[1, time_steps, MEL_BANDS]`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceTensor {
    time_steps: usize,
    data: Vec<f32>,
}

impl SequenceTensor {
    pub fn shape(&self) -> [usize; 3] {
        [1, self.time_steps, MEL_BANDS]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn step(&self, t: usize) -> Option<&[f32]> {
        self.data.get(t * MEL_BANDS..(t + 1) * MEL_BANDS)
    }
}

/// `[IMAGE_SIDE, IMAGE_SIDE, IMAGE_CHANNELS]`, row-major, channels last.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 3] {
        [IMAGE_SIDE, IMAGE_SIDE, IMAGE_CHANNELS]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn pixel(&self, y: usize, x: usize) -> Option<&[f32]> {
        if y >= IMAGE_SIDE || x >= IMAGE_SIDE {
            return None;
        }
        let start = (y * IMAGE_SIDE + x) * IMAGE_CHANNELS;
        Some(&self.data[start..start + IMAGE_CHANNELS])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureTensor {
    Sequence(SequenceTensor),
    Image(ImageTensor),
}

impl FeatureTensor {
    pub fn shape(&self) -> [usize; 3] {
        match self {
            FeatureTensor::Sequence(t) => t.shape(),
            FeatureTensor::Image(t) => t.shape(),
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        match self {
            FeatureTensor::Sequence(t) => t.as_slice(),
            FeatureTensor::Image(t) => t.as_slice(),
        }
    }
}

/// Pad with zero frames or drop trailing frames to get exactly `time_steps` rows.
pub fn to_sequence_tensor(matrix: &FeatureMatrix, time_steps: usize) -> SequenceTensor {
    let mut data = vec![0.0; time_steps * MEL_BANDS];
    for (dst, row) in data.chunks_exact_mut(MEL_BANDS).zip(matrix.rows()) {
        dst.copy_from_slice(row);
    }
    SequenceTensor { time_steps, data }
}

/// Nearest-neighbour resample of the pseudo-colored matrix onto a square
/// image. Frames map to rows, coefficients to columns, and channels hold the
/// display colors scaled to `[0, 1]`. An empty matrix gives a black image.
pub fn to_image_tensor(matrix: &FeatureMatrix, epsilon: f32) -> ImageTensor {
    let mut data = vec![0.0; IMAGE_SIDE * IMAGE_SIDE * IMAGE_CHANNELS];
    let frames = matrix.num_frames();
    if frames == 0 {
        return ImageTensor { data };
    }

    let levels = display_levels(matrix, epsilon);
    for (y, line) in data.chunks_exact_mut(IMAGE_SIDE * IMAGE_CHANNELS).enumerate() {
        let src_row = y * frames / IMAGE_SIDE;
        for (x, px) in line.chunks_exact_mut(IMAGE_CHANNELS).enumerate() {
            let src_col = x * MEL_BANDS / IMAGE_SIDE;
            let v = levels[src_row * MEL_BANDS + src_col];
            px.copy_from_slice(&[v, v * 128.0 / 255.0, 1.0 - v]);
        }
    }
    ImageTensor { data }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use approx::assert_relative_eq;

    fn numbered(frames: usize) -> FeatureMatrix {
        FeatureMatrix::new((0..frames).map(|i| [i as f32 + 1.0; MEL_BANDS]).collect())
    }

    #[test]
    fn test_sequence_pads_with_zeros() {
        let tensor = to_sequence_tensor(&numbered(3), 5);
        assert_eq!(tensor.shape(), [1, 5, MEL_BANDS]);
        assert_eq!(tensor.as_slice().len(), 5 * MEL_BANDS);
        assert_eq!(tensor.step(2).unwrap(), &[3.0; MEL_BANDS]);
        assert!(tensor.step(3).unwrap().iter().all(|&v| v == 0.0));
        assert!(tensor.step(5).is_none());
    }

    #[test]
    fn test_sequence_truncates() {
        let tensor = to_sequence_tensor(&numbered(300), DEFAULT_TIME_STEPS);
        assert_eq!(tensor.shape(), [1, DEFAULT_TIME_STEPS, MEL_BANDS]);
        assert_eq!(
            tensor.step(DEFAULT_TIME_STEPS - 1).unwrap(),
            &[DEFAULT_TIME_STEPS as f32; MEL_BANDS]
        );
    }

    #[test]
    fn test_image_shape_and_range() {
        let image = to_image_tensor(&numbered(10), 1e-6);
        assert_eq!(image.as_slice().len(), IMAGE_SIDE * IMAGE_SIDE * IMAGE_CHANNELS);
        assert!(image.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));

        // First frame is the minimum, last frame the maximum.
        assert_eq!(image.pixel(0, 0).unwrap(), &[0.0, 0.0, 1.0]);
        let last = image.pixel(IMAGE_SIDE - 1, IMAGE_SIDE - 1).unwrap();
        assert_relative_eq!(last[0], 1.0);
        assert_relative_eq!(last[1], 128.0 / 255.0);
        assert_relative_eq!(last[2], 0.0);
        assert!(image.pixel(IMAGE_SIDE, 0).is_none());
    }

    #[test]
    fn test_empty_matrix_image_is_black() {
        let image = to_image_tensor(&FeatureMatrix::default(), 1e-6);
        assert!(image.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_feature_tensor_shape() {
        let tensor = FeatureTensor::Sequence(to_sequence_tensor(&numbered(1), 4));
        assert_eq!(tensor.shape(), [1, 4, MEL_BANDS]);
        assert_eq!(tensor.as_slice().len(), 4 * MEL_BANDS);
    }
}
