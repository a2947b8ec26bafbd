//! Dynamics processing: noise gate, compressor, limiter, sidechain duck.

use crate::buffer::SampleBuffer;
use crate::effects::lfo::{Lfo, LfoShape};
use crate::effects::{CompressorSettings, LimiterSettings, NoiseGateSettings, SidechainSettings};

/// Converts linear amplitude to decibels.
fn amp_to_db(amp: f32) -> f32 {
    20.0 * amp.abs().max(1e-10).log10()
}

/// Converts decibels to linear amplitude.
fn db_to_amp(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    ((ms / 1000.0) * sample_rate).round() as usize
}

/// Envelope-follower noise gate with attack/hold/release.
///
/// Opens (gain ramps 0 to 1 over the attack time) when any channel exceeds
/// the threshold; holds for `hold_ms` after the signal falls below it, then
/// ramps closed over the release time.
pub fn noise_gate(buffer: &mut SampleBuffer, settings: &NoiseGateSettings, sample_rate: f32) {
    let threshold = db_to_amp(settings.threshold_db);
    let attack_step = 1.0 / ms_to_samples(settings.attack_ms, sample_rate).max(1) as f32;
    let release_step = 1.0 / ms_to_samples(settings.release_ms, sample_rate).max(1) as f32;
    let hold_samples = ms_to_samples(settings.hold_ms, sample_rate);

    let num_frames = buffer.len();
    let num_channels = buffer.num_channels();

    let mut gain = 0.0_f32;
    let mut hold_counter = 0_usize;

    for i in 0..num_frames {
        let mut frame_peak = 0.0_f32;
        for ch in 0..num_channels {
            frame_peak = frame_peak.max(buffer.channel(ch)[i].abs());
        }

        if frame_peak > threshold {
            gain = (gain + attack_step).min(1.0);
            hold_counter = hold_samples;
        } else if hold_counter > 0 {
            hold_counter -= 1;
        } else {
            gain = (gain - release_step).max(0.0);
        }

        for channel in buffer.channels_mut() {
            channel[i] *= gain;
        }
    }
}

/// Channel-linked RMS compressor with makeup gain.
pub fn compressor(buffer: &mut SampleBuffer, settings: &CompressorSettings, sample_rate: f32) {
    let attack_coeff = (-1.0 / (settings.attack_ms * 0.001 * sample_rate)).exp();
    let release_coeff = (-1.0 / (settings.release_ms * 0.001 * sample_rate)).exp();
    let makeup = db_to_amp(settings.makeup_db);

    let num_frames = buffer.len();
    let num_channels = buffer.num_channels();
    let mut envelope = 0.0_f32;

    for i in 0..num_frames {
        let mut sum_sq = 0.0_f32;
        for ch in 0..num_channels {
            let s = buffer.channel(ch)[i];
            sum_sq += s * s;
        }
        let input_level = (sum_sq / num_channels as f32).sqrt();

        if input_level > envelope {
            envelope = attack_coeff * envelope + (1.0 - attack_coeff) * input_level;
        } else {
            envelope = release_coeff * envelope + (1.0 - release_coeff) * input_level;
        }

        let envelope_db = amp_to_db(envelope);
        let gain_db = if envelope_db > settings.threshold_db {
            -(envelope_db - settings.threshold_db) * (1.0 - 1.0 / settings.ratio)
        } else {
            0.0
        };

        let gain = db_to_amp(gain_db) * makeup;
        for channel in buffer.channels_mut() {
            channel[i] *= gain;
        }
    }
}

/// Hard-knee limiter: instant gain reduction above the threshold, smoothed
/// recovery over the release time.
pub fn limiter(buffer: &mut SampleBuffer, settings: &LimiterSettings, sample_rate: f32) {
    let ceiling = db_to_amp(settings.threshold_db);
    let release_coeff = (-1.0 / (settings.release_ms * 0.001 * sample_rate)).exp();

    let num_frames = buffer.len();
    let num_channels = buffer.num_channels();
    let mut envelope = 0.0_f32;

    for i in 0..num_frames {
        let mut frame_peak = 0.0_f32;
        for ch in 0..num_channels {
            frame_peak = frame_peak.max(buffer.channel(ch)[i].abs());
        }

        // Instant attack, smoothed release.
        if frame_peak > envelope {
            envelope = frame_peak;
        } else {
            envelope = release_coeff * envelope + (1.0 - release_coeff) * frame_peak;
        }

        let gain = if envelope > ceiling {
            ceiling / envelope
        } else {
            1.0
        };
        for channel in buffer.channels_mut() {
            channel[i] *= gain;
        }
    }
}

/// Periodic ducking that emulates a kick-keyed sidechain compressor. The duck
/// is deepest at each cycle start and recovers exponentially.
pub fn sidechain_duck(buffer: &mut SampleBuffer, settings: &SidechainSettings, sample_rate: f32) {
    let mut lfo = Lfo::new(LfoShape::Triangle, settings.rate, sample_rate);
    let num_frames = buffer.len();

    for i in 0..num_frames {
        // Triangle rising edge shaped into a pump: deep cut, fast recovery.
        let cycle = lfo.next_unipolar();
        let duck = (1.0 - cycle) * (1.0 - cycle);
        let gain = 1.0 - settings.amount * duck;
        for channel in buffer.channels_mut() {
            channel[i] *= gain;
        }
    }
}
