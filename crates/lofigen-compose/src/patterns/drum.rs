//! Drum pattern generator.
//!
//! Each instrument cycles through four beat-position templates, selected by
//! a pattern phase that advances with the global bar count and the segment
//! index. Hi-hats run at eighth-note resolution with swing on the off
//! eighths.

use rand::Rng;

use crate::settings::VariationLevel;

use super::{DrumEvent, DrumKind};

fn kick_hit(template: u32, beat: u32) -> bool {
    match template {
        0 => beat == 0 || beat == 2,
        1 => beat == 0,
        2 => beat == 0 || beat == 3,
        _ => beat == 0 || beat == 1 || beat == 2,
    }
}

fn snare_hit(template: u32, beat: u32) -> bool {
    match template {
        0 => beat == 1 || beat == 3,
        1 => beat == 3,
        2 => beat == 1,
        _ => beat == 2,
    }
}

fn hihat_hit(template: u32, eighth: u32) -> bool {
    match template {
        0 => true,
        1 => eighth % 2 == 0,
        2 => eighth % 2 == 1,
        _ => eighth != 3 && eighth != 7,
    }
}

/// Generates one segment of drum events, sorted ascending by time.
pub fn generate(
    bpm: f32,
    bars: u32,
    swing: f32,
    variation_level: VariationLevel,
    segment_index: u32,
    rng: &mut impl Rng,
) -> Vec<DrumEvent> {
    let profile = variation_level.profile();
    let beat_seconds = 60.0 / bpm;
    // Odd eighths land late by up to a third of an eighth note.
    let swing_offset = swing * beat_seconds * 0.5 / 3.0;
    let phase_base = segment_index / profile.pattern_change_interval;

    let mut events = Vec::new();
    for bar in 0..bars {
        let pattern_phase = (bar + phase_base) % 8;
        let template = pattern_phase % 4;
        let base_velocity = 0.7 + pattern_phase as f32 * 0.02;
        let bar_start = bar as f32 * 4.0 * beat_seconds;

        for beat in 0..4 {
            let time = bar_start + beat as f32 * beat_seconds;
            if kick_hit(template, beat) {
                events.push(DrumEvent {
                    time,
                    kind: DrumKind::Kick,
                    velocity: jitter(base_velocity, profile.velocity_variance, rng),
                });
            }
            // Snare density thins out as the phase rises.
            let snare_density = 0.9 - pattern_phase as f32 * 0.05;
            if snare_hit(template, beat) && rng.gen::<f32>() < snare_density {
                events.push(DrumEvent {
                    time,
                    kind: DrumKind::Snare,
                    velocity: jitter(base_velocity, profile.velocity_variance, rng),
                });
            }
        }

        for eighth in 0..8 {
            if !hihat_hit(template, eighth) {
                continue;
            }
            let hihat_density = 0.8 + profile.density_variance * (rng.gen::<f32>() - 0.5);
            if rng.gen::<f32>() >= hihat_density {
                continue;
            }
            let mut time = bar_start + eighth as f32 * beat_seconds * 0.5;
            if eighth % 2 == 1 {
                time += swing_offset;
            }
            events.push(DrumEvent {
                time,
                kind: DrumKind::Hihat,
                velocity: jitter(base_velocity * 0.6, profile.velocity_variance, rng),
            });
        }
    }

    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    events
}

fn jitter(base: f32, variance: f32, rng: &mut impl Rng) -> f32 {
    (base + rng.gen_range(-variance..=variance)).clamp(0.0, 1.0)
}
