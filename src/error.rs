//! Error types for MFCC extraction

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MfccError>;

#[derive(Error, Debug)]
pub enum MfccError {
    #[error("Signal is empty")]
    EmptySignal,

    #[error("Shape mismatch: {what} has length {actual}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Extraction cancelled after {completed} frames")]
    Cancelled { completed: usize },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MfccError {
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }

    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }
}

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn ensure_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(MfccError::shape(what, expected, actual));
    }
    Ok(())
}
