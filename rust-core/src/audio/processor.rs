//! Streaming processor - keeps the analysis loop on its own thread
//!
//! The capture collaborator pushes PCM into a lock-free ring buffer and never
//! waits on analysis. Every `interval` the worker drains the buffer, runs the
//! window analyzer, merges the batch into the shared record and publishes it.
//! Publication is lossy: when nobody drains [`StreamProcessor::batches`] the
//! queue fills and further batches only reach the shared record.

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::buffer::{SampleConsumer, SampleProducer, SampleRingBuffer};
use super::pcm::PcmDecoder;
use crate::analysis::{
    AnalysisBatch, AudioAnalysisData, SharedAnalysis, SpeakerClassifier, WindowAnalyzer,
};
use crate::config::RecordingConfig;
use crate::diagnostics::DiagnosticSink;
use crate::error::StreamError;

const COMPONENT: &str = "stream_processor";

/// Minimum amount of audio the ring buffer holds
const MIN_BUFFER_MS: u64 = 2000;

/// Published batches kept for a slow or absent reader
pub const BATCH_QUEUE_LEN: usize = 16;

/// Handle to a running analysis stream
pub struct StreamProcessor {
    shared: SharedAnalysis,
    batches: Receiver<AnalysisBatch>,
    dropped_batches: Arc<AtomicU64>,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl StreamProcessor {
    /// Validate `config` and start the worker
    ///
    /// # Returns
    /// The processor handle and the producer end the capture side writes to
    pub fn start(
        config: RecordingConfig,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<(Self, SampleProducer), StreamError> {
        let analyzer = WindowAnalyzer::new(config, Arc::clone(&diagnostics))?;
        Self::spawn(analyzer, diagnostics)
    }

    /// Like [`StreamProcessor::start`], labelling segments with `classifier`
    pub fn start_with_classifier(
        config: RecordingConfig,
        classifier: Box<dyn SpeakerClassifier>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<(Self, SampleProducer), StreamError> {
        let analyzer = WindowAnalyzer::new(config, Arc::clone(&diagnostics))?
            .with_speaker_classifier(classifier);
        Self::spawn(analyzer, diagnostics)
    }

    fn spawn(
        analyzer: WindowAnalyzer,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<(Self, SampleProducer), StreamError> {
        let config = analyzer.config().clone();
        let decoder = PcmDecoder::new(config.bit_depth, config.number_of_channels)?;
        let interval = Duration::from_millis(config.interval_ms);

        let buffered_ms = config.interval_ms.saturating_mul(4).max(MIN_BUFFER_MS);
        let capacity = (config.sample_rate as u64).saturating_mul(buffered_ms) / 1000;
        let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);
        let (producer, consumer) =
            SampleRingBuffer::new(capacity).split(decoder, Arc::clone(&diagnostics));

        let shared = SharedAnalysis::new(AudioAnalysisData::new(&config));
        let (batch_tx, batches) = bounded(BATCH_QUEUE_LEN);
        let (stop_tx, stop_rx) = bounded(1);
        let dropped_batches = Arc::new(AtomicU64::new(0));

        let worker = {
            let publisher = BatchPublisher {
                tx: batch_tx,
                dropped: Arc::clone(&dropped_batches),
            };
            let shared = shared.clone();
            let diagnostics = Arc::clone(&diagnostics);
            std::thread::spawn(move || {
                run_worker(
                    analyzer,
                    consumer,
                    shared,
                    publisher,
                    stop_rx,
                    interval,
                    diagnostics,
                )
            })
        };

        diagnostics.debug(
            COMPONENT,
            &format!(
                "started: {} Hz, {} points/s, interval {} ms, buffer {capacity} samples",
                config.sample_rate, config.points_per_second, config.interval_ms
            ),
        );

        Ok((
            Self {
                shared,
                batches,
                dropped_batches,
                stop_tx: Some(stop_tx),
                worker: Some(worker),
                diagnostics,
            },
            producer,
        ))
    }

    /// Batches in emission order, one per interval that produced output
    ///
    /// Holds at most [`BATCH_QUEUE_LEN`] batches; later ones are dropped from
    /// the queue until the reader catches up.
    pub fn batches(&self) -> &Receiver<AnalysisBatch> {
        &self.batches
    }

    /// Batches merged into the record but not queued because the queue was full
    pub fn dropped_batches(&self) -> u64 {
        self.dropped_batches.load(Ordering::Relaxed)
    }

    /// Consistent copy of the cumulative record
    pub fn snapshot(&self) -> AudioAnalysisData {
        self.shared.snapshot()
    }

    /// Shared handle for concurrent readers
    pub fn shared(&self) -> SharedAnalysis {
        self.shared.clone()
    }

    /// Stop the worker and hand back the final record
    ///
    /// Samples not yet drained from the buffer and any partial trailing
    /// segment are dropped.
    pub fn stop(mut self) -> Result<AudioAnalysisData, StreamError> {
        self.shutdown()?;
        Ok(self.shared.snapshot())
    }

    fn shutdown(&mut self) -> Result<(), StreamError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The worker may already be gone; a closed channel is fine
            let _ = stop_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            worker.join().map_err(|_| StreamError::WorkerPanicked)?;
            self.diagnostics.debug(COMPONENT, "stopped");
        }
        Ok(())
    }
}

impl Drop for StreamProcessor {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            self.diagnostics.warn(COMPONENT, &format!("shutdown failed: {e}"));
        }
    }
}

/// Sending side of the batch queue
struct BatchPublisher {
    tx: Sender<AnalysisBatch>,
    dropped: Arc<AtomicU64>,
}

impl BatchPublisher {
    /// Queue `batch` without blocking; returns false if it was dropped
    fn publish(&self, batch: AnalysisBatch) -> bool {
        match self.tx.try_send(batch) {
            Ok(()) => true,
            // Receiver gone with the handle; the record still has the batch
            Err(TrySendError::Disconnected(_)) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

fn run_worker(
    mut analyzer: WindowAnalyzer,
    mut consumer: SampleConsumer,
    shared: SharedAnalysis,
    publisher: BatchPublisher,
    stop_rx: Receiver<()>,
    interval: Duration,
    diagnostics: Arc<dyn DiagnosticSink>,
) {
    let ticker = tick(interval);
    let mut samples = Vec::new();
    let mut reported_drops = 0u64;
    let mut queue_full = false;

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {
                samples.clear();
                consumer.drain_into(&mut samples);

                let dropped = consumer.dropped();
                if dropped > reported_drops {
                    diagnostics.warn(
                        COMPONENT,
                        &format!("{} samples lost to buffer overflow", dropped - reported_drops),
                    );
                    reported_drops = dropped;
                }

                if samples.is_empty() {
                    continue;
                }

                let batch = analyzer.process(&samples);
                if batch.data_points.is_empty() {
                    continue;
                }

                shared.merge(&batch);
                let queued = publisher.publish(batch);
                if !queued && !queue_full {
                    diagnostics.warn(
                        COMPONENT,
                        "batch queue full, publishing paused until the reader catches up",
                    );
                }
                queue_full = !queued;
            }
        }
    }

    let discarded = consumer.len() + analyzer.discard_pending();
    if discarded > 0 {
        diagnostics.debug(
            COMPONENT,
            &format!("discarded {discarded} unprocessed samples at stop"),
        );
    }
}
