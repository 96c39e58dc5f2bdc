//! Raw PCM decoding
//!
//! Little-endian interleaved frames are converted to mono `f32` in
//! [-1.0, 1.0] by averaging channels. Bytes that do not complete a frame are
//! held back and prepended to the next call.

use crate::config::SUPPORTED_BIT_DEPTHS;
use crate::error::ConfigError;

/// Stateful PCM to mono sample decoder
#[derive(Debug, Clone)]
pub struct PcmDecoder {
    bit_depth: u16,
    channels: usize,
    carry: Vec<u8>,
}

impl PcmDecoder {
    /// Create a decoder
    ///
    /// # Arguments
    /// * `bit_depth` - 8 (unsigned), 16 or 24 (signed integer), or 32 (float)
    /// * `channels` - Interleaved channel count
    pub fn new(bit_depth: u16, channels: u16) -> Result<Self, ConfigError> {
        if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
            return Err(ConfigError::UnsupportedBitDepth(bit_depth));
        }
        if channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }

        Ok(Self {
            bit_depth,
            channels: channels as usize,
            carry: Vec::new(),
        })
    }

    /// Bytes per interleaved frame
    pub fn frame_bytes(&self) -> usize {
        self.bytes_per_sample() * self.channels
    }

    fn bytes_per_sample(&self) -> usize {
        self.bit_depth as usize / 8
    }

    /// Decode as many whole frames as possible
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<f32> {
        let mut out = Vec::new();
        self.decode_into(bytes, &mut out);
        out
    }

    /// Decode whole frames, appending mono samples to `out`
    pub fn decode_into(&mut self, bytes: &[u8], out: &mut Vec<f32>) {
        let frame_bytes = self.frame_bytes();
        let mut input = std::mem::take(&mut self.carry);
        input.extend_from_slice(bytes);

        let frames = input.chunks_exact(frame_bytes);
        let remainder = frames.remainder().to_vec();
        out.reserve(input.len() / frame_bytes);

        let width = self.bytes_per_sample();
        for frame in frames {
            let sum: f32 = frame
                .chunks_exact(width)
                .map(|sample| self.decode_sample(sample))
                .sum();
            out.push(sum / self.channels as f32);
        }

        self.carry = remainder;
    }

    /// Number of buffered bytes waiting for the rest of their frame
    pub fn pending_bytes(&self) -> usize {
        self.carry.len()
    }

    fn decode_sample(&self, bytes: &[u8]) -> f32 {
        match self.bit_depth {
            8 => (bytes[0] as f32 - 128.0) / 128.0,
            16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32 / 32768.0,
            24 => {
                // Sign-extend through the top byte of an i32
                let value = i32::from_le_bytes([0, bytes[0], bytes[1], bytes[2]]) >> 8;
                value as f32 / 8_388_608.0
            }
            _ => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }
}
