use crate::error::Result;
use crate::extractor::MfccExtractor;
use crate::framer::StreamingFramer;
use crate::matrix::{FeatureMatrix, MfccVector};
use crossbeam_channel as channel;
use std::sync::{Arc, RwLock};
use std::thread;
use tracing::{debug, error};

pub type ReadFn = Box<dyn Fn() -> FeatureMatrix + Send + Sync>;

/// Incremental extraction over sample chunks of any size, e.g. from a live
/// capture callback.
pub struct MfccStream {
    framer: StreamingFramer,
    extractor: Arc<MfccExtractor>,
}

impl MfccStream {
    pub fn new(extractor: Arc<MfccExtractor>) -> Self {
        Self {
            framer: StreamingFramer::new(),
            extractor,
        }
    }

    /// Rows for every frame completed by `samples`.
    pub fn push(&mut self, samples: &[f32]) -> Result<Vec<MfccVector>> {
        self.framer
            .push(samples)
            .iter()
            .map(|frame| self.extractor.extract_frame(frame))
            .collect()
    }

    pub fn pending_samples(&self) -> usize {
        self.framer.pending()
    }

    /// Run extraction on a background thread fed by `receiver`.
    ///
    /// Returns a reader that snapshots the rows produced so far, and the thread
    /// handle. The thread exits once every sender is dropped, or on the first
    /// extraction error, which the handle yields. Rows appended before the
    /// error stay readable.
    pub fn spawn(
        extractor: Arc<MfccExtractor>,
        receiver: channel::Receiver<Vec<f32>>,
    ) -> (ReadFn, thread::JoinHandle<Result<()>>) {
        let features = Arc::new(RwLock::new(FeatureMatrix::default()));
        let features_clone = features.clone();

        let read_fn: ReadFn = Box::new(move || match features.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        });

        let handle = thread::spawn(move || {
            let mut stream = MfccStream::new(extractor);
            for chunk in receiver.iter() {
                let rows = match stream.push(&chunk) {
                    Ok(rows) => rows,
                    Err(e) => {
                        error!("mfcc stream stopped: {}", e);
                        return Err(e);
                    }
                };
                if rows.is_empty() {
                    continue;
                }
                let mut matrix = match features_clone.write() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                matrix.extend(rows);
            }
            debug!(pending = stream.pending_samples(), "mfcc stream closed");
            Ok(())
        });

        (read_fn, handle)
    }
}
