//! Lock-free ring buffer between the capture collaborator and the worker
//!
//! The producer end decodes raw PCM and never blocks; samples that do not
//! fit are dropped and counted.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::pcm::PcmDecoder;
use crate::diagnostics::DiagnosticSink;

const COMPONENT: &str = "sample_buffer";

/// Thread-safe mono sample ring buffer
pub struct SampleRingBuffer {
    producer: HeapProducer<f32>,
    consumer: HeapConsumer<f32>,
    capacity: usize,
}

impl SampleRingBuffer {
    /// Create new ring buffer with given capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f32>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(
        self,
        decoder: PcmDecoder,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> (SampleProducer, SampleConsumer) {
        let dropped = Arc::new(AtomicU64::new(0));
        (
            SampleProducer {
                producer: self.producer,
                decoder,
                scratch: Vec::new(),
                dropped: Arc::clone(&dropped),
                diagnostics,
                capacity: self.capacity,
            },
            SampleConsumer {
                consumer: self.consumer,
                dropped,
                capacity: self.capacity,
            },
        )
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Producer end, owned by the capture collaborator
pub struct SampleProducer {
    producer: HeapProducer<f32>,
    decoder: PcmDecoder,
    scratch: Vec<f32>,
    dropped: Arc<AtomicU64>,
    diagnostics: Arc<dyn DiagnosticSink>,
    capacity: usize,
}

impl SampleProducer {
    /// Write decoded mono samples
    ///
    /// # Returns
    /// Number of samples actually written (less if the buffer is full)
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let written = self.producer.push_slice(samples);
        let overflow = samples.len() - written;
        if overflow > 0 {
            self.dropped.fetch_add(overflow as u64, Ordering::Relaxed);
            self.diagnostics.warn(
                COMPONENT,
                &format!("ring buffer full, dropped {overflow} samples"),
            );
        }
        written
    }

    /// Decode raw PCM bytes in the stream's format and write them
    pub fn write_pcm(&mut self, bytes: &[u8]) -> usize {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        self.decoder.decode_into(bytes, &mut scratch);
        let written = self.write(&scratch);
        self.scratch = scratch;
        written
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer end, owned by the analysis worker
pub struct SampleConsumer {
    consumer: HeapConsumer<f32>,
    dropped: Arc<AtomicU64>,
    capacity: usize,
}

impl SampleConsumer {
    /// Move every available sample to the end of `out`
    ///
    /// # Returns
    /// Number of samples moved
    pub fn drain_into(&mut self, out: &mut Vec<f32>) -> usize {
        let available = self.consumer.len();
        let start = out.len();
        out.resize(start + available, 0.0);
        let read = self.consumer.pop_slice(&mut out[start..]);
        out.truncate(start + read);
        read
    }

    /// Samples dropped by the producer because the buffer was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Get number of available samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
