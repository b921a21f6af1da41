use crate::config::FRAME_SIZE;
use crate::error::{MfccError, Result};
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::slice::ChunksExact;

/// Non-overlapping `FRAME_SIZE` frames over a signal, in temporal order.
///
/// A clone resumes from the same position; clone before iterating to walk the
/// frames more than once.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    chunks: ChunksExact<'a, f32>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl<'a> Frames<'a> {
    /// Samples after the last complete frame, which never reach the pipeline.
    pub fn remainder(&self) -> &'a [f32] {
        self.chunks.remainder()
    }
}

/// Slice `signal` into frames, dropping the trailing partial frame.
pub fn frames(signal: &[f32]) -> Result<Frames<'_>> {
    if signal.is_empty() {
        return Err(MfccError::EmptySignal);
    }
    Ok(Frames {
        chunks: signal.chunks_exact(FRAME_SIZE),
    })
}

pub fn frame_count(signal_len: usize) -> usize {
    signal_len / FRAME_SIZE
}

/// Accumulates arbitrarily sized chunks and hands out complete frames.
pub struct StreamingFramer {
    producer: HeapProducer<f32>,
    consumer: HeapConsumer<f32>,
}

impl Default for StreamingFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingFramer {
    pub fn new() -> Self {
        let (producer, consumer) = HeapRb::<f32>::new(FRAME_SIZE * 2).split();
        Self { producer, consumer }
    }

    /// Samples buffered but not yet part of a complete frame.
    pub fn pending(&self) -> usize {
        self.consumer.len()
    }

    pub fn push(&mut self, mut samples: &[f32]) -> Vec<Vec<f32>> {
        let mut ready = Vec::new();
        while !samples.is_empty() {
            let written = self.producer.push_slice(samples);
            samples = &samples[written..];

            while self.consumer.len() >= FRAME_SIZE {
                let mut frame = vec![0.0; FRAME_SIZE];
                self.consumer.pop_slice(&mut frame);
                ready.push(frame);
            }
        }
        ready
    }
}

#[cfg(test)]
mod framer_tests {
    use super::*;

    #[test]
    fn test_empty_signal_fails() {
        assert!(matches!(frames(&[]), Err(MfccError::EmptySignal)));
    }

    #[test]
    fn test_short_signal_yields_no_frames() {
        let signal = vec![0.5; 1000];
        let it = frames(&signal).unwrap();
        assert_eq!(it.len(), 0);
        assert_eq!(it.remainder().len(), 1000);
    }

    #[test]
    fn test_trailing_partial_frame_dropped() {
        let signal: Vec<f32> = (0..FRAME_SIZE * 3 + 17).map(|i| i as f32).collect();
        let collected: Vec<_> = frames(&signal).unwrap().collect();

        assert_eq!(collected.len(), 3);
        assert_eq!(frame_count(signal.len()), 3);
        for (i, frame) in collected.iter().enumerate() {
            assert_eq!(frame.len(), FRAME_SIZE);
            assert_eq!(frame[0], (i * FRAME_SIZE) as f32);
        }
    }

    #[test]
    fn test_frames_restart_from_signal() {
        let signal = vec![0.25; FRAME_SIZE * 2];
        let first: Vec<_> = frames(&signal).unwrap().collect();
        let second: Vec<_> = frames(&signal).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_streaming_matches_batch() {
        let signal: Vec<f32> = (0..FRAME_SIZE * 4 + 100)
            .map(|i| (i as f32 * 0.001).sin())
            .collect();

        let mut framer = StreamingFramer::new();
        let mut streamed = Vec::new();
        for chunk in signal.chunks(700) {
            streamed.extend(framer.push(chunk));
        }

        let batch: Vec<_> = frames(&signal).unwrap().collect();
        assert_eq!(streamed.len(), batch.len());
        for (a, b) in streamed.iter().zip(batch) {
            assert_eq!(a.as_slice(), b);
        }
        assert_eq!(framer.pending(), 100);
    }

    #[test]
    fn test_streaming_large_chunk() {
        let mut framer = StreamingFramer::new();
        let ready = framer.push(&vec![1.0; FRAME_SIZE * 5]);
        assert_eq!(ready.len(), 5);
        assert_eq!(framer.pending(), 0);
    }
}
