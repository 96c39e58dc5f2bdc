//! Data points and the cumulative analysis record

use serde::Serialize;

use crate::config::RecordingConfig;
use crate::features::{Feature, FeatureValue};

/// Optional per-segment features; `None` means not requested or not available
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mel_energies: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfcc: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_centroid: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_flatness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_rolloff: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_bandwidth: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromagram: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hnr: Option<f32>,
}

impl Features {
    /// Store an extracted value under its feature
    ///
    /// A value whose shape does not match the feature is ignored.
    pub fn set(&mut self, feature: Feature, value: FeatureValue) {
        match (feature, value) {
            (Feature::MelEnergies, FeatureValue::Vector(v)) => self.mel_energies = Some(v),
            (Feature::Mfcc, FeatureValue::Vector(v)) => self.mfcc = Some(v),
            (Feature::Chromagram, FeatureValue::Vector(v)) => self.chromagram = Some(v),
            (Feature::SpectralCentroid, FeatureValue::Scalar(x)) => self.spectral_centroid = Some(x),
            (Feature::SpectralFlatness, FeatureValue::Scalar(x)) => self.spectral_flatness = Some(x),
            (Feature::SpectralRolloff, FeatureValue::Scalar(x)) => self.spectral_rolloff = Some(x),
            (Feature::SpectralBandwidth, FeatureValue::Scalar(x)) => {
                self.spectral_bandwidth = Some(x)
            }
            (Feature::Tempo, FeatureValue::Scalar(x)) => self.tempo = Some(x),
            (Feature::Hnr, FeatureValue::Scalar(x)) => self.hnr = Some(x),
            _ => {}
        }
    }

    /// Whether the feature holds a value
    pub fn contains(&self, feature: Feature) -> bool {
        match feature {
            Feature::MelEnergies => self.mel_energies.is_some(),
            Feature::Mfcc => self.mfcc.is_some(),
            Feature::SpectralCentroid => self.spectral_centroid.is_some(),
            Feature::SpectralFlatness => self.spectral_flatness.is_some(),
            Feature::SpectralRolloff => self.spectral_rolloff.is_some(),
            Feature::SpectralBandwidth => self.spectral_bandwidth.is_some(),
            Feature::Chromagram => self.chromagram.is_some(),
            Feature::Tempo => self.tempo.is_some(),
            Feature::Hnr => self.hnr.is_some(),
        }
    }
}

/// Feature summary of one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Emission order, starting at 0 for the stream
    pub id: u64,
    pub amplitude: f32,
    #[serde(rename = "dB")]
    pub db: Option<f32>,
    pub active_speech: Option<bool>,
    pub silent: Option<bool>,
    pub features: Option<Features>,
    /// Segment start in seconds from the start of the stream
    pub timestamp: f64,
    pub speaker: Option<u32>,
}

/// Running amplitude bounds, only ever widened
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmplitudeRange {
    pub min: f32,
    pub max: f32,
}

impl AmplitudeRange {
    /// Range of a single value
    pub fn point(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Smallest range containing both
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Range covering every point's amplitude, `None` for no points
    pub fn of_points(points: &[DataPoint]) -> Option<Self> {
        points
            .iter()
            .map(|p| Self::point(p.amplitude))
            .reduce(Self::union)
    }
}

/// Speaker label changed at `timestamp`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeakerChange {
    pub timestamp: f64,
    pub speaker: u32,
}

/// Output of the window analyzer for one sample batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBatch {
    pub data_points: Vec<DataPoint>,
    pub speaker_changes: Vec<SpeakerChange>,
    pub amplitude_range: Option<AmplitudeRange>,
    /// Cumulative stream duration after this batch, not a delta
    pub duration_ms: f64,
    pub extraction_time_ms: f64,
}

/// Cumulative analysis record for one stream session
///
/// Configuration fields are fixed at creation. Everything else only grows
/// through [`AudioAnalysisData::merge`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysisData {
    pub(crate) points_per_second: u32,
    pub(crate) sample_rate: u32,
    pub(crate) bit_depth: u16,
    pub(crate) number_of_channels: u16,
    pub(crate) data_points: Vec<DataPoint>,
    pub(crate) amplitude_range: Option<AmplitudeRange>,
    pub(crate) speaker_changes: Vec<SpeakerChange>,
    pub(crate) duration_ms: f64,
    pub(crate) extraction_time_ms: f64,
}

impl AudioAnalysisData {
    /// Empty record for a stream with `config`
    pub fn new(config: &RecordingConfig) -> Self {
        Self {
            points_per_second: config.points_per_second,
            sample_rate: config.sample_rate,
            bit_depth: config.bit_depth,
            number_of_channels: config.number_of_channels,
            data_points: Vec::new(),
            amplitude_range: None,
            speaker_changes: Vec::new(),
            duration_ms: 0.0,
            extraction_time_ms: 0.0,
        }
    }

    pub fn points_per_second(&self) -> u32 {
        self.points_per_second
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn number_of_channels(&self) -> u16 {
        self.number_of_channels
    }

    pub fn data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    pub fn amplitude_range(&self) -> Option<AmplitudeRange> {
        self.amplitude_range
    }

    pub fn speaker_changes(&self) -> &[SpeakerChange] {
        &self.speaker_changes
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn extraction_time_ms(&self) -> f64 {
        self.extraction_time_ms
    }
}
