//! Window analyzer: sample batches in, data points out
//!
//! Samples are cut into consecutive non-overlapping segments of
//! `sample_rate / points_per_second` samples (floored). A trailing partial
//! segment is buffered and completed by the next batch, so timestamps and
//! ids stay continuous across batch boundaries.

use std::sync::Arc;
use std::time::Instant;

use super::speaker::{
    detect_speaker_changes, NoSpeakerClassifier, SpeakerClassifier, SpeakerTracker,
};
use super::types::{AmplitudeRange, AnalysisBatch, DataPoint, Features};
use crate::audio::amplitude::amplitude_to_db;
use crate::audio::gate::SpeechGate;
use crate::config::RecordingConfig;
use crate::diagnostics::DiagnosticSink;
use crate::error::{AnalysisError, ConfigError};
use crate::features::{build_extractor, FeatureExtractor, SegmentView};
use crate::spectrum::{Spectrum, SpectrumAnalyzer};

const COMPONENT: &str = "window_analyzer";

/// Turns raw sample batches into data points for one stream
pub struct WindowAnalyzer {
    config: RecordingConfig,
    segment_len: usize,
    spectrum: SpectrumAnalyzer,
    extractors: Vec<Box<dyn FeatureExtractor>>,
    needs_spectrum: bool,
    gate: SpeechGate,
    classifier: Box<dyn SpeakerClassifier>,
    speakers: SpeakerTracker,
    pending: Vec<f32>,
    next_id: u64,
    emitted_samples: u64,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl WindowAnalyzer {
    /// Create an analyzer; configuration errors surface here, before any
    /// sample is processed
    pub fn new(
        config: RecordingConfig,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let segment_len = config.segment_length();
        let spectrum = SpectrumAnalyzer::new(segment_len, config.sample_rate, config.window)
            .map_err(|_| ConfigError::InvalidPointsPerSecond {
                points_per_second: config.points_per_second,
                sample_rate: config.sample_rate,
            })?;

        let extractors: Vec<Box<dyn FeatureExtractor>> = config
            .features
            .iter()
            .map(|&feature| build_extractor(feature, spectrum.fft_size(), config.sample_rate))
            .collect();

        for extractor in extractors.iter().filter(|e| !e.is_implemented()) {
            diagnostics.warn(
                COMPONENT,
                &format!(
                    "feature `{}` has no implementation and will be absent",
                    extractor.feature()
                ),
            );
        }

        let needs_spectrum = extractors
            .iter()
            .any(|e| e.is_implemented() && e.needs_spectrum());

        diagnostics.debug(
            COMPONENT,
            &format!(
                "segment length {segment_len} samples, fft size {}, {} extractors",
                spectrum.fft_size(),
                extractors.len()
            ),
        );

        Ok(Self {
            gate: SpeechGate::new(config.speech_threshold_db),
            config,
            segment_len,
            spectrum,
            extractors,
            needs_spectrum,
            classifier: Box::new(NoSpeakerClassifier),
            speakers: SpeakerTracker::new(),
            pending: Vec::with_capacity(segment_len),
            next_id: 0,
            emitted_samples: 0,
            diagnostics,
        })
    }

    /// Replace the speaker classifier
    pub fn with_speaker_classifier(mut self, classifier: Box<dyn SpeakerClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Analyze one batch of mono samples
    ///
    /// Emits one data point per completed segment. Leftover samples wait for
    /// the next call.
    pub fn process(&mut self, samples: &[f32]) -> AnalysisBatch {
        let started = Instant::now();

        let mut buffer = std::mem::take(&mut self.pending);
        buffer.extend_from_slice(samples);

        let mut data_points = Vec::with_capacity(buffer.len() / self.segment_len);

        let segments = buffer.chunks_exact(self.segment_len);
        let remainder = segments.remainder().to_vec();
        for segment in segments {
            data_points.push(self.analyze_segment(segment));
        }
        let speaker_changes = detect_speaker_changes(&mut self.speakers, &data_points);

        buffer.clear();
        buffer.extend_from_slice(&remainder);
        self.pending = buffer;

        AnalysisBatch {
            amplitude_range: AmplitudeRange::of_points(&data_points),
            data_points,
            speaker_changes,
            duration_ms: self.duration_ms(),
            extraction_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    fn analyze_segment(&mut self, segment: &[f32]) -> DataPoint {
        let sample_rate = self.config.sample_rate;
        let amplitude = self.config.algorithm.measure(segment);
        let db = amplitude_to_db(amplitude);
        let active_speech = self.gate.update(db);
        let features = self.extract_features(segment);
        let speaker = self.classifier.classify(segment, sample_rate);

        let point = DataPoint {
            id: self.next_id,
            amplitude,
            db: Some(db),
            active_speech: Some(active_speech),
            silent: Some(db < self.config.silence_threshold_db),
            features,
            timestamp: self.emitted_samples as f64 / sample_rate as f64,
            speaker,
        };

        self.next_id += 1;
        self.emitted_samples += segment.len() as u64;
        point
    }

    /// DSP failures degrade the affected features to absent
    fn extract_features(&mut self, segment: &[f32]) -> Option<Features> {
        if self.extractors.is_empty() {
            return None;
        }

        let spectrum: Option<Spectrum> = if self.needs_spectrum {
            match self.spectrum.analyze(segment) {
                Ok(spectrum) => Some(spectrum),
                Err(e) => {
                    self.diagnostics.warn(
                        COMPONENT,
                        &format!("segment {}: spectrum failed: {e}", self.next_id),
                    );
                    None
                }
            }
        } else {
            None
        };

        let view = SegmentView::new(segment, self.config.sample_rate, spectrum.as_ref());
        let mut features = Features::default();
        for extractor in self.extractors.iter().filter(|e| e.is_implemented()) {
            match extractor.extract(&view) {
                Ok(value) => features.set(extractor.feature(), value),
                Err(AnalysisError::SpectrumUnavailable) => {}
                Err(e) => self.diagnostics.warn(
                    COMPONENT,
                    &format!(
                        "segment {}: {} unavailable: {e}",
                        self.next_id,
                        extractor.feature()
                    ),
                ),
            }
        }
        Some(features)
    }

    /// Duration covered by emitted segments in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.emitted_samples as f64 * 1000.0 / self.config.sample_rate as f64
    }

    /// Samples waiting for the rest of their segment
    pub fn pending_samples(&self) -> usize {
        self.pending.len()
    }

    /// Drop the buffered partial segment
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn segment_length(&self) -> usize {
        self.segment_len
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }
}
