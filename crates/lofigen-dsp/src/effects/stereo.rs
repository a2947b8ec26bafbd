//! Spatial stages: stereo widener, pan, auto-pan.
//!
//! All three require a stereo buffer; given mono input they pass the buffer
//! through unchanged.

use crate::buffer::SampleBuffer;
use crate::effects::lfo::{Lfo, LfoShape};
use crate::effects::AutoPanSettings;
use std::f32::consts::FRAC_PI_4;

/// Mid/side width scaling: mid = (L+R)/2, side = (L-R)/2, side scaled by
/// `width`, recombined. No-op on mono.
pub fn widen(buffer: &mut SampleBuffer, width: f32) {
    if buffer.num_channels() != 2 {
        return;
    }
    let num_frames = buffer.len();
    let channels = buffer.channels_mut();
    for i in 0..num_frames {
        let left = channels[0][i];
        let right = channels[1][i];
        let mid = (left + right) * 0.5;
        let side = (left - right) * 0.5 * width;
        channels[0][i] = mid + side;
        channels[1][i] = mid - side;
    }
}

/// Constant-power pan law for a position in [-1, 1].
fn pan_gains(position: f32) -> (f32, f32) {
    let angle = (position + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}

/// Constant-power pan: gainL = cos((pos+1)*pi/4), gainR = sin((pos+1)*pi/4).
/// No-op on mono.
pub fn pan(buffer: &mut SampleBuffer, position: f32) {
    if buffer.num_channels() != 2 {
        return;
    }
    let (gain_left, gain_right) = pan_gains(position);
    // Normalize so center position is an identity.
    let center = FRAC_PI_4.cos();
    let num_frames = buffer.len();
    let channels = buffer.channels_mut();
    for i in 0..num_frames {
        channels[0][i] *= gain_left / center;
        channels[1][i] *= gain_right / center;
    }
}

/// LFO-swept constant-power pan. No-op on mono.
pub fn auto_pan(buffer: &mut SampleBuffer, settings: &AutoPanSettings, sample_rate: f32) {
    if buffer.num_channels() != 2 {
        return;
    }
    let mut lfo = Lfo::new(LfoShape::Sine, settings.rate, sample_rate);
    let center = FRAC_PI_4.cos();
    let num_frames = buffer.len();
    let channels = buffer.channels_mut();
    for i in 0..num_frames {
        let position = lfo.next_sample() * settings.depth;
        let (gain_left, gain_right) = pan_gains(position);
        channels[0][i] *= gain_left / center;
        channels[1][i] *= gain_right / center;
    }
}
