//! Lofigen DSP Engine
//!
//! This crate implements the offline signal-processing half of lofigen: a
//! multi-channel sample buffer, an ordered effect chain, destructive editing
//! operations, and a 16-bit PCM WAV encoder.
//!
//! # Overview
//!
//! Audio lives in a [`SampleBuffer`]: one or more equal-length `f32` channels
//! plus a sample rate. Everything in this crate consumes and produces such
//! buffers; there is no real-time path and no hidden state between calls.
//!
//! Effects are configured through [`EffectChain`], a struct with one settings
//! block per stage. Stages run in a fixed canonical order regardless of how
//! the chain was built, so two chains with the same enabled stages always
//! sound the same. [`apply_chain`] validates every enabled stage before any
//! audio is touched.
//!
//! # Determinism
//!
//! All processing is deterministic: the same buffer and the same chain yield
//! byte-identical output across runs. Nothing in this crate reads a clock or
//! an entropy source.
//!
//! # Example
//!
//! ```ignore
//! use lofigen_dsp::{apply_chain, encode_wav16, EffectChain, SampleBuffer};
//!
//! let buffer = SampleBuffer::from_mono(samples, 44100)?;
//! let mut chain = EffectChain::default();
//! chain.reverb.enabled = true;
//! chain.reverb.wet = 0.4;
//!
//! let processed = apply_chain(&buffer, &chain)?;
//! std::fs::write("out.wav", encode_wav16(&processed)?)?;
//! ```
//!
//! # Crate Structure
//!
//! - [`buffer`] - The multi-channel sample buffer and its invariants
//! - [`effects`] - The effect chain, per-stage settings, and stage kernels
//! - [`edit`] - Pure editing operations (trim, fades, crossfade merge)
//! - [`filter`] - Biquad filter primitives shared by several stages
//! - [`wav`] - 16-bit PCM WAV encoding

pub mod buffer;
pub mod edit;
pub mod effects;
pub mod error;
pub mod filter;
pub mod wav;

// Re-export main types at crate root
pub use buffer::SampleBuffer;
pub use edit::EqGains;
pub use effects::{apply_chain, Effect, EffectChain, EffectKind};
pub use error::{DspError, DspResult};
pub use wav::encode_wav16;

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn sine_buffer(frequency: f32, seconds: f32) -> SampleBuffer {
        let sample_rate = 44100;
        let frames = (seconds * sample_rate as f32) as usize;
        let samples: Vec<f32> = (0..frames)
            .map(|i| {
                (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32).sin()
                    * 0.5
            })
            .collect();
        SampleBuffer::from_stereo(samples.clone(), samples, sample_rate).unwrap()
    }

    #[test]
    fn test_full_chain_renders_and_encodes() {
        let buffer = sine_buffer(220.0, 1.0);

        let mut chain = EffectChain::default();
        chain.volume.enabled = true;
        chain.volume.gain = 0.8;
        chain.lowpass.enabled = true;
        chain.lowpass.cutoff = 4000.0;
        chain.reverb.enabled = true;
        chain.reverb.room_size = 0.6;
        chain.reverb.dampening = 0.5;
        chain.reverb.wet = 0.3;
        chain.lofi.enabled = true;

        let processed = apply_chain(&buffer, &chain).unwrap();
        assert_eq!(processed.len(), buffer.len());
        assert_eq!(processed.num_channels(), 2);

        let bytes = encode_wav16(&processed).unwrap();
        assert_eq!(bytes.len(), 44 + processed.len() * 4);
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_chain_is_deterministic() {
        let buffer = sine_buffer(110.0, 0.5);
        let mut chain = EffectChain::default();
        chain.chorus.enabled = true;
        chain.delay.enabled = true;
        chain.delay.time_seconds = 0.2;
        chain.delay.wet = 0.4;

        let first = apply_chain(&buffer, &chain).unwrap();
        let second = apply_chain(&buffer, &chain).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_chain_rejected_before_processing() {
        let buffer = sine_buffer(220.0, 0.1);
        let mut chain = EffectChain::default();
        chain.delay.enabled = true;
        chain.delay.feedback = 1.5;
        assert!(matches!(
            apply_chain(&buffer, &chain),
            Err(DspError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_edit_then_process_pipeline() {
        let buffer = sine_buffer(220.0, 2.0);
        let head = edit::trim(&buffer, 0.0, 1.0).unwrap();
        let tail = edit::trim(&buffer, 1.0, 2.0).unwrap();
        let merged = edit::merge_with_crossfade(&head, &tail, 0.25).unwrap();
        let faded = edit::fade(&merged, 0.05, 0.1);

        let mut chain = EffectChain::default();
        chain.limiter.enabled = true;
        let processed = apply_chain(&faded, &chain).unwrap();
        assert!(processed.peak() <= 1.0 + 1e-6);
    }
}
