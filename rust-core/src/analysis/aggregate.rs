//! Folding batches into the cumulative record
//!
//! Merges are append-only and widen-only. `SharedAnalysis` adds the
//! single-writer discipline: one merge at a time under a write lock, so a
//! reader either sees a batch fully applied or not at all.

use parking_lot::RwLock;
use std::sync::Arc;

use super::types::{AnalysisBatch, AudioAnalysisData};

impl AudioAnalysisData {
    /// Fold one batch into the record
    ///
    /// Points and speaker changes are appended in order, the amplitude range
    /// is widened, and the duration moves to the batch's cumulative total.
    /// A batch reporting a smaller total than already merged leaves the
    /// duration unchanged.
    pub fn merge(&mut self, batch: &AnalysisBatch) {
        self.data_points.extend_from_slice(&batch.data_points);
        self.speaker_changes.extend_from_slice(&batch.speaker_changes);

        if let Some(range) = batch.amplitude_range {
            self.amplitude_range = Some(match self.amplitude_range {
                Some(current) => current.union(range),
                None => range,
            });
        }

        self.duration_ms = self.duration_ms.max(batch.duration_ms);
        self.extraction_time_ms = batch.extraction_time_ms;
    }
}

/// Cumulative record shared between the worker and readers
#[derive(Clone)]
pub struct SharedAnalysis {
    inner: Arc<RwLock<AudioAnalysisData>>,
}

impl SharedAnalysis {
    pub fn new(data: AudioAnalysisData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Apply one batch atomically with respect to readers
    pub fn merge(&self, batch: &AnalysisBatch) {
        self.inner.write().merge(batch);
    }

    /// Copy of the current record
    pub fn snapshot(&self) -> AudioAnalysisData {
        self.inner.read().clone()
    }

    /// Run `f` against the current record without copying it
    pub fn read<R>(&self, f: impl FnOnce(&AudioAnalysisData) -> R) -> R {
        f(&self.inner.read())
    }

    /// Take the record out, cloning only if other handles remain
    pub fn into_inner(self) -> AudioAnalysisData {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        }
    }
}
