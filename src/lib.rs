pub mod audio;
pub mod cepstrum;
pub mod config;
pub mod error;
pub mod extractor;
pub mod framer;
pub mod helpers;
pub mod inference;
pub mod layout;
pub mod matrix;
pub mod mel;
pub mod spectrum;
pub mod stream;
pub mod visualize;
mod test_spectrum;

pub use crate::config::{MfccConfig, WindowKind, FFT_SIZE, FRAME_SIZE, MEL_BANDS, SAMPLE_RATE};
pub use crate::error::{MfccError, Result};
pub use crate::extractor::{extract, CancelToken, MfccExtractor};
pub use crate::matrix::{FeatureMatrix, MfccVector};
pub use crate::stream::MfccStream;
