//! Segment analysis and the cumulative per-stream record

pub mod aggregate;
pub mod speaker;
pub mod types;
pub mod window;

pub use aggregate::SharedAnalysis;
pub use speaker::{detect_speaker_changes, NoSpeakerClassifier, SpeakerClassifier, SpeakerTracker};
pub use types::{AmplitudeRange, AnalysisBatch, AudioAnalysisData, DataPoint, Features, SpeakerChange};
pub use window::WindowAnalyzer;
