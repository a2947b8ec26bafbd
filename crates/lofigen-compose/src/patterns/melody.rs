//! Melody generator.
//!
//! A random walk over the scale degrees: mostly stepwise motion with
//! occasional jumps, note lengths drawn from the variation level's duration
//! set, and a phrase-local crescendo on velocity.

use rand::Rng;

use crate::settings::{Key, Scale, VariationLevel};

use super::MelodyEvent;

const STEP_PROBABILITY: f32 = 0.7;
const PHRASE_BEATS: f32 = 4.0;

/// Generates melody events covering `duration` seconds.
pub fn generate(
    key: Key,
    scale: Scale,
    duration: f32,
    bpm: f32,
    variation_level: VariationLevel,
    segment_index: u32,
    rng: &mut impl Rng,
) -> Vec<MelodyEvent> {
    let profile = variation_level.profile();
    let durations = variation_level.melody_durations();
    let intervals = scale.intervals();
    let beat_seconds = 60.0 / bpm;

    let mut events = Vec::new();
    let mut time = 0.0_f32;
    let mut degree: i32 = 0;

    while time < duration {
        let beats = durations[rng.gen_range(0..durations.len())];
        let note_duration = beats * beat_seconds;

        if rng.gen::<f32>() < STEP_PROBABILITY {
            degree += if rng.gen::<bool>() { 1 } else { -1 };
            degree = degree.rem_euclid(7);
        } else {
            degree = rng.gen_range(0..7);
        }

        // The octave is drawn from a band whose floor drifts every eight
        // phrases.
        let phrase = (time / (PHRASE_BEATS * beat_seconds)) as u32;
        let band_floor = 4 + ((phrase / 8 + segment_index) % 2) as i32;
        let octave = band_floor + rng.gen_range(0..profile.octave_range.max(1)) as i32;

        let phrase_position = (time / (PHRASE_BEATS * beat_seconds)).fract();
        let base_velocity = 0.4 + phrase_position * 0.2;
        let velocity = (base_velocity
            + rng.gen_range(-profile.velocity_variance..=profile.velocity_variance))
        .clamp(0.0, 1.0);

        events.push(MelodyEvent {
            time,
            note: octave * 12 + key.semitone() + intervals[degree as usize],
            duration: note_duration,
            velocity,
        });
        time += note_duration;
    }

    events
}
