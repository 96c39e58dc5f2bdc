//! Sample intake, level measurement and the streaming worker

pub mod amplitude;
pub mod buffer;
pub mod gate;
pub mod pcm;
pub mod processor;

pub use amplitude::{amplitude_to_db, AmplitudeAlgorithm};
pub use buffer::{SampleConsumer, SampleProducer, SampleRingBuffer};
pub use gate::SpeechGate;
pub use pcm::PcmDecoder;
pub use processor::StreamProcessor;
