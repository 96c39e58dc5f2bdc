//! Feature Stream - streaming audio feature extraction core
//!
//! Cuts a live sample stream into fixed-rate segments and turns each one
//! into a data point: amplitude, level, speech activity and an optional set
//! of spectral features. Batches are folded into a cumulative record that
//! readers can snapshot while the stream runs.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod spectrum;

pub use analysis::{AnalysisBatch, AudioAnalysisData, DataPoint, SharedAnalysis, WindowAnalyzer};
pub use audio::{SampleProducer, StreamProcessor};
pub use config::RecordingConfig;
pub use diagnostics::{tracing_sink, DiagnosticSink, NullSink, TracingSink};
pub use error::{AnalysisError, ConfigError, StreamError};
pub use features::{Feature, FeatureExtractor};
pub use spectrum::{FftEngine, SpectrumAnalyzer, WindowType};
