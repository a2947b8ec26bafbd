//! One-shot synthesis primitives.
//!
//! Everything here returns a plain mono sample vector; the renderer mixes
//! them into the final stereo buffer. `tone`, `kick`, and `chord` are fully
//! deterministic. `snare` and `hihat` consume randomness from the caller's
//! generator, so determinism is the caller's choice of seed.

use rand::Rng;
use std::f32::consts::TAU;

/// Converts a MIDI note number to a frequency: `440 * 2^((note-69)/12)`.
pub fn midi_to_frequency(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Pure sine tone.
pub fn tone(frequency: f32, duration: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let frames = (duration * sample_rate as f32) as usize;
    (0..frames)
        .map(|i| (TAU * frequency * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

/// Kick drum: pitch sweeps exponentially down from 60 Hz while the
/// amplitude follows a faster exponential decay.
pub fn kick(duration: f32, sample_rate: u32) -> Vec<f32> {
    let frames = (duration * sample_rate as f32) as usize;
    let mut phase = 0.0_f32;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let frequency = 60.0 * (-t * 8.0).exp().max(0.25);
            phase += TAU * frequency / sample_rate as f32;
            phase.sin() * (-t * 12.0).exp()
        })
        .collect()
}

/// Snare drum: uniform noise mixed with a 200 Hz tone burst, both under a
/// fast exponential decay.
pub fn snare(duration: f32, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let frames = (duration * sample_rate as f32) as usize;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let noise: f32 = rng.gen_range(-1.0..1.0);
            let body = (TAU * 200.0 * t).sin();
            (noise * 0.7 + body * 0.3) * (-t * 20.0).exp()
        })
        .collect()
}

/// Hi-hat: a decaying noise burst, high-passed with a one-sample
/// differencer to thin out the low end.
pub fn hihat(duration: f32, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let frames = (duration * sample_rate as f32) as usize;
    let mut previous = 0.0_f32;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let noise: f32 = rng.gen_range(-1.0..1.0);
            let filtered = noise - previous;
            previous = noise;
            filtered * (-t * 40.0).exp()
        })
        .collect()
}

/// Sums one sine tone per frequency, divided by the note count.
pub fn chord(frequencies: &[f32], duration: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let frames = (duration * sample_rate as f32) as usize;
    if frequencies.is_empty() {
        return vec![0.0; frames];
    }
    let scale = amplitude / frequencies.len() as f32;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            frequencies.iter().map(|f| (TAU * f * t).sin()).sum::<f32>() * scale
        })
        .collect()
}

/// Applies a piecewise-linear ADSR envelope in place.
///
/// Attack, decay, and release are in seconds; sustain is a level in [0, 1].
/// When the three timed stages together exceed the note length the sustain
/// stage is clamped to zero samples instead of going negative.
pub fn apply_adsr(
    samples: &mut [f32],
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    sample_rate: u32,
) {
    let total = samples.len();
    let attack_len = ((attack * sample_rate as f32) as usize).min(total);
    let decay_len = ((decay * sample_rate as f32) as usize).min(total - attack_len);
    let release_len =
        ((release * sample_rate as f32) as usize).min(total - attack_len - decay_len);
    let sustain_len = total - attack_len - decay_len - release_len;

    for (i, sample) in samples.iter_mut().enumerate() {
        let gain = if i < attack_len {
            i as f32 / attack_len as f32
        } else if i < attack_len + decay_len {
            let t = (i - attack_len) as f32 / decay_len as f32;
            1.0 - t * (1.0 - sustain)
        } else if i < attack_len + decay_len + sustain_len {
            sustain
        } else {
            let t = (i - attack_len - decay_len - sustain_len) as f32 / release_len as f32;
            sustain * (1.0 - t)
        };
        *sample *= gain;
    }
}
