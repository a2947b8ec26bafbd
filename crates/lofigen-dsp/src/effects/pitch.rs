//! Playback-rate pitch change.
//!
//! Pitch is realized as a resampling speed change, so duration scales
//! inversely with the shift: +12 semitones halves the length. This coupling
//! matches a tape-speed pitch knob and is the one chain stage whose output
//! length differs from its input.

use crate::buffer::SampleBuffer;
use crate::error::DspResult;

/// Resamples every channel by `2^(semitones/12)` using linear interpolation.
pub fn playback_rate(buffer: &mut SampleBuffer, semitones: f32) -> DspResult<()> {
    if semitones == 0.0 {
        return Ok(());
    }
    let rate = 2.0_f32.powf(semitones / 12.0);
    let input_len = buffer.len();
    let output_len = ((input_len as f32 / rate).floor() as usize).max(1);

    let resampled: Vec<Vec<f32>> = buffer
        .channels()
        .iter()
        .map(|channel| {
            (0..output_len)
                .map(|i| {
                    let pos = i as f32 * rate;
                    let idx = pos.floor() as usize;
                    let frac = pos - idx as f32;
                    let a = channel[idx.min(input_len - 1)];
                    let b = channel[(idx + 1).min(input_len - 1)];
                    a * (1.0 - frac) + b * frac
                })
                .collect()
        })
        .collect();

    buffer.replace_channels(resampled)
}
