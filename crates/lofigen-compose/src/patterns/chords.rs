//! Chord progression generator.
//!
//! Eight canonical four-chord progressions per scale, expressed as scale
//! degrees. Each bar consumes the next degree from the selected progression
//! and voices it as a root/third/fifth triad inside a two-octave band.

use rand::Rng;

use crate::settings::{Key, Scale, VariationLevel};
use crate::synthesis::midi_to_frequency;

use super::ChordEvent;

/// Progressions as 0-based scale degrees (0 = I .. 6 = VII).
const MAJOR_PROGRESSIONS: [[usize; 4]; 8] = [
    [0, 4, 5, 3],
    [0, 3, 4, 3],
    [1, 4, 0, 5],
    [0, 5, 3, 4],
    [3, 0, 4, 5],
    [0, 2, 3, 4],
    [5, 3, 0, 4],
    [0, 3, 5, 4],
];

const MINOR_PROGRESSIONS: [[usize; 4]; 8] = [
    [0, 5, 2, 6],
    [0, 3, 4, 0],
    [0, 6, 5, 6],
    [0, 3, 6, 2],
    [0, 5, 6, 4],
    [0, 4, 5, 2],
    [0, 2, 6, 5],
    [0, 3, 0, 4],
];

/// Voices a scale degree as a triad of semitone offsets in [0, 12).
fn triad_offsets(degree: usize, intervals: &[i32; 7]) -> [i32; 3] {
    [
        intervals[degree],
        intervals[(degree + 2) % 7],
        intervals[(degree + 4) % 7],
    ]
    .map(|offset| offset.rem_euclid(12))
}

/// Generates one segment of chord events: exactly one triad per bar.
///
/// The RNG parameter keeps the generator signature uniform with the other
/// two; chord selection itself is deterministic in the segment index.
pub fn generate(
    key: Key,
    scale: Scale,
    bars: u32,
    bpm: f32,
    variation_level: VariationLevel,
    segment_index: u32,
    _rng: &mut impl Rng,
) -> Vec<ChordEvent> {
    let profile = variation_level.profile();
    let progressions = match scale {
        Scale::Major => &MAJOR_PROGRESSIONS,
        Scale::Minor => &MINOR_PROGRESSIONS,
    };
    let progression_index =
        (segment_index as usize * bars as usize / profile.pattern_change_interval as usize) % 8;
    let progression = &progressions[progression_index];
    let intervals = scale.intervals();

    let bar_seconds = 4.0 * 60.0 / bpm;

    (0..bars)
        .map(|bar| {
            let degree = progression[bar as usize % 4];
            let offsets = triad_offsets(degree, &intervals);
            // Root note in octave 3, stepping up an octave every 16 bars
            // inside a two-octave band.
            let root_midi = 48 + key.semitone() + 12 * ((bar as i32 / 16) % 2);
            ChordEvent {
                time: bar as f32 * bar_seconds,
                frequencies: offsets.map(|o| midi_to_frequency((root_midi + o) as f32)),
                duration: bar_seconds,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_one_chord_per_bar() {
        for bars in [1, 4, 7, 16] {
            let events = generate(
                Key::C,
                Scale::Minor,
                bars,
                80.0,
                VariationLevel::Medium,
                0,
                &mut create_rng(1),
            );
            assert_eq!(events.len(), bars as usize);
        }
    }

    #[test]
    fn test_triads_have_three_distinct_tones() {
        let events = generate(
            Key::A,
            Scale::Major,
            8,
            100.0,
            VariationLevel::Low,
            2,
            &mut create_rng(1),
        );
        for event in &events {
            assert!(event.frequencies.iter().all(|f| *f > 20.0));
            assert_ne!(event.frequencies[0], event.frequencies[1]);
            assert_ne!(event.frequencies[1], event.frequencies[2]);
        }
    }

    #[test]
    fn test_bars_spaced_by_bar_length() {
        let bpm = 60.0;
        let events = generate(
            Key::C,
            Scale::Major,
            4,
            bpm,
            VariationLevel::Medium,
            0,
            &mut create_rng(1),
        );
        for (i, event) in events.iter().enumerate() {
            assert!((event.time - i as f32 * 4.0).abs() < 1e-5);
            assert!((event.duration - 4.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_progression_changes_with_segment() {
        let first = generate(
            Key::C,
            Scale::Minor,
            4,
            80.0,
            VariationLevel::Extreme,
            0,
            &mut create_rng(1),
        );
        let later = generate(
            Key::C,
            Scale::Minor,
            4,
            80.0,
            VariationLevel::Extreme,
            1,
            &mut create_rng(1),
        );
        assert_ne!(first, later);
    }

    #[test]
    fn test_triad_offsets_stay_in_octave() {
        let intervals = Scale::Minor.intervals();
        for degree in 0..7 {
            for offset in triad_offsets(degree, &intervals) {
                assert!((0..12).contains(&offset));
            }
        }
    }
}
