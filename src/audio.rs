//! Turning raw audio into a normalized mono signal.

use crate::config::SAMPLE_RATE;
use crate::error::{MfccError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Little-endian signed 16-bit PCM to samples in `[-1, 1)`.
pub fn decode_pcm16_le(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(MfccError::decode(format!(
            "PCM16 data has odd length {}",
            bytes.len()
        )));
    }
    if bytes.is_empty() {
        return Err(MfccError::EmptySignal);
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect())
}

/// Average interleaved channels down to one.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Read a WAV file as a mono signal.
///
/// No resampling happens; input recorded at another rate is accepted with a
/// warning since the filterbank assumes 44100 Hz.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    if spec.sample_rate as usize != SAMPLE_RATE {
        warn!(
            sample_rate = spec.sample_rate,
            expected = SAMPLE_RATE,
            "wav sample rate differs from the analysis rate"
        );
    }

    let signal = downmix(&interleaved, spec.channels as usize);
    if signal.is_empty() {
        return Err(MfccError::EmptySignal);
    }

    debug!(
        path = %path.as_ref().display(),
        channels = spec.channels,
        samples = signal.len(),
        "loaded wav"
    );
    Ok(signal)
}
