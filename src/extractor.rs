use crate::cepstrum::CepstralTransform;
use crate::config::MfccConfig;
use crate::error::{ensure_len, MfccError, Result};
use crate::framer::frames;
use crate::matrix::{FeatureMatrix, MfccVector};
use crate::mel::MelFilterbank;
use crate::spectrum::SpectralAnalyzer;
use crossbeam_channel as channel;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

static DEFAULT_EXTRACTOR: Lazy<MfccExtractor> = Lazy::new(MfccExtractor::default);

/// Extract MFCCs with the default configuration.
pub fn extract(signal: &[f32]) -> Result<FeatureMatrix> {
    DEFAULT_EXTRACTOR.extract(signal)
}

/// Stops a running extraction before its next frame is scheduled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Framer, spectral analyzer, mel filterbank and cepstral transform wired
/// together. Every stage is read-only after construction, so one extractor can
/// be shared across threads and calls.
pub struct MfccExtractor {
    config: MfccConfig,
    analyzer: SpectralAnalyzer,
    filterbank: MelFilterbank,
    cepstrum: CepstralTransform,
}

impl Default for MfccExtractor {
    fn default() -> Self {
        Self::build(MfccConfig::default())
    }
}

impl MfccExtractor {
    pub fn new(config: MfccConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MfccConfig) -> Self {
        Self {
            analyzer: SpectralAnalyzer::new(config.window),
            filterbank: MelFilterbank::new(),
            cepstrum: CepstralTransform::new(config.epsilon),
            config,
        }
    }

    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    pub fn filterbank(&self) -> &MelFilterbank {
        &self.filterbank
    }

    /// Mel-band energies of one frame, before log compression.
    pub fn mel_energies(&self, frame: &[f32]) -> Result<Vec<f32>> {
        let spectrum = self.analyzer.analyze(frame)?;
        self.filterbank.apply(&spectrum)
    }

    pub fn extract_frame(&self, frame: &[f32]) -> Result<MfccVector> {
        self.cepstrum.transform(&self.mel_energies(frame)?)
    }

    /// Frame-by-frame extraction on the calling thread.
    ///
    /// Input is expected in `[-1, 1]`. Frames whose spectrum overflows `f32`
    /// yield the same row as silence; see [`log_compress`](crate::cepstrum::log_compress).
    pub fn extract(&self, signal: &[f32]) -> Result<FeatureMatrix> {
        let frames = frames(signal)?;
        if !frames.remainder().is_empty() {
            debug!(dropped = frames.remainder().len(), "trailing partial frame");
        }

        let rows = frames
            .map(|frame| self.extract_frame(frame))
            .collect::<Result<Vec<_>>>()?;

        debug!(frames = rows.len(), "extracted mfcc features");
        Ok(FeatureMatrix::new(rows))
    }

    /// Same result as [`extract`](Self::extract), computed on a worker pool.
    pub fn extract_parallel(&self, signal: &[f32]) -> Result<FeatureMatrix> {
        self.run_pool(signal, None, &|| {})
    }

    /// Parallel extraction that checks `token` before scheduling each frame.
    ///
    /// A cancelled run returns `Cancelled` and no rows.
    pub fn extract_cancellable(
        &self,
        signal: &[f32],
        token: &CancelToken,
    ) -> Result<FeatureMatrix> {
        self.run_pool(signal, Some(token), &|| {})
    }

    /// Worker pool behind the parallel entry points. `on_frame` runs on the
    /// worker thread after each frame is computed.
    pub(crate) fn run_pool(
        &self,
        signal: &[f32],
        cancel: Option<&CancelToken>,
        on_frame: &(dyn Fn() + Sync),
    ) -> Result<FeatureMatrix> {
        let frames = frames(signal)?;
        let total = frames.len();
        if total == 0 {
            return Ok(FeatureMatrix::default());
        }

        let workers = self.config.worker_count().min(total);
        debug!(frames = total, workers, "starting worker pool");

        let (job_tx, job_rx) = channel::bounded::<(usize, &[f32])>(workers * 2);
        let (result_tx, result_rx) = channel::unbounded::<(usize, Result<MfccVector>)>();

        let scheduled = thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, frame) in job_rx.iter() {
                        let result = self.extract_frame(frame);
                        on_frame();
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            let mut scheduled = 0;
            for job in frames.enumerate() {
                if cancel.is_some_and(CancelToken::is_cancelled) {
                    break;
                }
                if job_tx.send(job).is_err() {
                    break;
                }
                scheduled += 1;
            }
            drop(job_tx);
            scheduled
        });

        let mut rows: Vec<Option<MfccVector>> = vec![None; total];
        for (index, result) in result_rx.iter() {
            rows[index] = Some(result?);
        }

        if scheduled < total {
            warn!(completed = scheduled, total, "mfcc extraction cancelled");
            return Err(MfccError::Cancelled {
                completed: scheduled,
            });
        }

        let rows: Vec<MfccVector> = rows.into_iter().flatten().collect();
        ensure_len("feature rows", total, rows.len())?;
        Ok(FeatureMatrix::new(rows))
    }
}
