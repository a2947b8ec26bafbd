//! Multi-channel sample buffer.
//!
//! A [`SampleBuffer`] is an ordered list of equal-length channels of 32-bit
//! float samples plus a sample rate. Buffers flow through the engine
//! functionally: every transformation returns a new buffer, and a buffer is
//! only mutated while the operation that owns it is constructing its output.

use crate::error::{DspError, DspResult};

/// In-memory multi-channel floating-point audio.
///
/// Samples are nominally in [-1.0, 1.0] but may transiently exceed that range
/// between pipeline stages. [`crate::wav::encode_wav16`] clamps on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Creates a buffer from raw channels, validating the equal-length invariant.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> DspResult<Self> {
        if channels.is_empty() {
            return Err(DspError::NoChannels);
        }
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        let expected = channels[0].len();
        for (i, channel) in channels.iter().enumerate() {
            if channel.len() != expected {
                return Err(DspError::ChannelLengthMismatch {
                    channel: i,
                    got: channel.len(),
                    expected,
                });
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Creates a zero-filled buffer.
    pub fn silent(num_channels: usize, frames: usize, sample_rate: u32) -> DspResult<Self> {
        Self::new(vec![vec![0.0; frames]; num_channels.max(1)], sample_rate)
    }

    /// Creates a mono buffer.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> DspResult<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Creates a stereo buffer from separate left/right channels.
    pub fn from_stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> DspResult<Self> {
        Self::new(vec![left, right], sample_rate)
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Derived duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.len() as f32 / self.sample_rate as f32
    }

    /// Borrows one channel.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Borrows all channels.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutably borrows all channels. Only for use while an operation builds
    /// its own output; handed-off buffers are treated as immutable.
    pub fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Replaces the channel data, revalidating the equal-length invariant.
    /// Used by the one stage (pitch) whose output length differs from its input.
    pub fn replace_channels(&mut self, channels: Vec<Vec<f32>>) -> DspResult<()> {
        let rebuilt = Self::new(channels, self.sample_rate)?;
        self.channels = rebuilt.channels;
        Ok(())
    }

    /// Global maximum absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0_f32, |acc, &s| acc.max(s.abs()))
    }

    /// Scales every sample in place.
    pub fn scale(&mut self, factor: f32) {
        for channel in &mut self.channels {
            for sample in channel.iter_mut() {
                *sample *= factor;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_length_invariant() {
        let err = SampleBuffer::new(vec![vec![0.0; 10], vec![0.0; 9]], 44100);
        assert!(matches!(
            err,
            Err(DspError::ChannelLengthMismatch {
                channel: 1,
                got: 9,
                expected: 10
            })
        ));
    }

    #[test]
    fn test_no_channels_rejected() {
        assert!(matches!(
            SampleBuffer::new(vec![], 44100),
            Err(DspError::NoChannels)
        ));
    }

    #[test]
    fn test_duration() {
        let buf = SampleBuffer::silent(2, 44100, 44100).unwrap();
        assert!((buf.duration_seconds() - 1.0).abs() < 1e-6);
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.len(), 44100);
    }

    #[test]
    fn test_peak() {
        let buf = SampleBuffer::from_stereo(vec![0.1, -0.8, 0.3], vec![0.2, 0.5, -0.4], 44100)
            .unwrap();
        assert!((buf.peak() - 0.8).abs() < 1e-6);
    }
}
