//! Speaker labelling seam and speaker-change detection
//!
//! Classification itself is opaque to the pipeline; it only consumes the
//! discrete labels a classifier produces.

use super::types::{DataPoint, SpeakerChange};

/// Assigns a speaker-cluster label to a segment
pub trait SpeakerClassifier: Send {
    fn classify(&mut self, segment: &[f32], sample_rate: u32) -> Option<u32>;
}

/// Classifier that never labels segments
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeakerClassifier;

impl SpeakerClassifier for NoSpeakerClassifier {
    fn classify(&mut self, _segment: &[f32], _sample_rate: u32) -> Option<u32> {
        None
    }
}

/// Tracks the last labelled speaker across batches
#[derive(Debug, Default, Clone)]
pub struct SpeakerTracker {
    last: Option<u32>,
}

impl SpeakerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a labelled point, returning a change if the label differs
    /// from the previous labelled point
    ///
    /// Unlabelled points neither trigger nor reset a change.
    pub fn observe(&mut self, timestamp: f64, speaker: Option<u32>) -> Option<SpeakerChange> {
        let current = speaker?;
        let previous = self.last.replace(current);
        match previous {
            Some(previous) if previous != current => Some(SpeakerChange {
                timestamp,
                speaker: current,
            }),
            _ => None,
        }
    }

    /// Last observed label
    pub fn current(&self) -> Option<u32> {
        self.last
    }
}

/// Speaker changes across `points`, continuing from `tracker`'s state
pub fn detect_speaker_changes(
    tracker: &mut SpeakerTracker,
    points: &[DataPoint],
) -> Vec<SpeakerChange> {
    points
        .iter()
        .filter_map(|p| tracker.observe(p.timestamp, p.speaker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(id: u64, timestamp: f64, speaker: Option<u32>) -> DataPoint {
        DataPoint {
            id,
            amplitude: 0.1,
            db: None,
            active_speech: None,
            silent: None,
            features: None,
            timestamp,
            speaker,
        }
    }

    #[test]
    fn test_label_sequence() {
        let labels = [0, 0, 1, 1, 0];
        let points: Vec<DataPoint> = labels
            .iter()
            .enumerate()
            .map(|(i, &s)| labelled(i as u64, i as f64 * 0.2, Some(s)))
            .collect();

        let mut tracker = SpeakerTracker::new();
        let changes = detect_speaker_changes(&mut tracker, &points);
        assert_eq!(
            changes,
            vec![
                SpeakerChange {
                    timestamp: 0.4,
                    speaker: 1
                },
                SpeakerChange {
                    timestamp: 0.8,
                    speaker: 0
                },
            ]
        );
    }

    #[test]
    fn test_changes_span_batches() {
        let mut tracker = SpeakerTracker::new();
        let first = [labelled(0, 0.0, Some(2))];
        let second = [labelled(1, 0.05, None), labelled(2, 0.1, Some(3))];

        assert!(detect_speaker_changes(&mut tracker, &first).is_empty());
        assert_eq!(
            detect_speaker_changes(&mut tracker, &second),
            vec![SpeakerChange {
                timestamp: 0.1,
                speaker: 3
            }]
        );
        assert_eq!(tracker.current(), Some(3));
    }

    #[test]
    fn test_unlabelled_stream_has_no_changes() {
        let mut classifier = NoSpeakerClassifier;
        assert_eq!(classifier.classify(&[0.0; 4], 16000), None);

        let points: Vec<DataPoint> = (0..5).map(|i| labelled(i, i as f64, None)).collect();
        assert!(detect_speaker_changes(&mut SpeakerTracker::new(), &points).is_empty());
    }
}
