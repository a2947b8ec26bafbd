//! Composition renderer.
//!
//! Turns [`GeneratorSettings`] into a finished stereo [`SampleBuffer`]:
//! pattern generation per segment, one-shot synthesis into an additive mix,
//! peak normalization, and a final canned lo-fi pass through the effect
//! chain. Progress is reported through a synchronous callback at fixed
//! milestones (5 to 35 across pattern generation, then 35/50/65/85/90/100).
//!
//! Several fine-tuning knobs (`reverb_amount`, `delay_amount`, `bass_level`,
//! `treble_level`, `overall_volume`, `style`) are validated but not yet
//! routed into the final effect pass; the lo-fi preset is unconditional.

use lofigen_dsp::{apply_chain, EffectChain, SampleBuffer};

use crate::error::ComposeResult;
use crate::patterns::{chords, drum, melody, ChordEvent, DrumEvent, DrumKind, MelodyEvent};
use crate::rng::{create_rng, create_segment_rng, derive_stream_seed};
use crate::settings::GeneratorSettings;
use crate::synthesis;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44100;

const KICK_SECONDS: f32 = 0.3;
const SNARE_SECONDS: f32 = 0.2;
const HIHAT_SECONDS: f32 = 0.1;

/// Renders a complete composition.
///
/// `base_seed` drives every random decision; the same settings and seed
/// produce an identical buffer. `progress` receives monotonically
/// non-decreasing percentages ending at 100.
pub fn render_composition(
    settings: &GeneratorSettings,
    base_seed: u32,
    mut progress: impl FnMut(u8),
) -> ComposeResult<SampleBuffer> {
    settings.validate()?;
    progress(5);

    let profile = settings.variation_level.profile();
    let segment_count = (settings.duration_seconds / profile.segment_seconds).ceil() as u32;

    let mut drum_events: Vec<DrumEvent> = Vec::new();
    let mut chord_events: Vec<ChordEvent> = Vec::new();
    let mut melody_events: Vec<MelodyEvent> = Vec::new();

    for segment in 0..segment_count {
        let start = segment as f32 * profile.segment_seconds;
        let length = (settings.duration_seconds - start).min(profile.segment_seconds);
        // A slight tempo wobble keeps long renders from sounding robotic.
        let bpm = settings.bpm + (segment as f32 * 0.5).sin() * 3.0;
        let bars = ((length * bpm / 60.0 / 4.0).ceil() as u32).max(1);
        let mut rng = create_segment_rng(base_seed, segment);

        for mut event in drum::generate(
            bpm,
            bars,
            settings.swing,
            settings.variation_level,
            segment,
            &mut rng,
        ) {
            event.time += start;
            drum_events.push(event);
        }
        for mut event in chords::generate(
            settings.key,
            settings.scale,
            bars,
            bpm,
            settings.variation_level,
            segment,
            &mut rng,
        ) {
            event.time += start;
            chord_events.push(event);
        }
        for mut event in melody::generate(
            settings.key,
            settings.scale,
            length,
            bpm,
            settings.variation_level,
            segment,
            &mut rng,
        ) {
            event.time += start;
            melody_events.push(event);
        }

        progress(5 + ((segment + 1) * 30 / segment_count) as u8);
    }

    drum_events.sort_by(|a, b| a.time.total_cmp(&b.time));
    chord_events.sort_by(|a, b| a.time.total_cmp(&b.time));
    melody_events.sort_by(|a, b| a.time.total_cmp(&b.time));

    let frames = (settings.duration_seconds * SAMPLE_RATE as f32) as usize;
    let mut left = vec![0.0_f32; frames];
    let mut right = vec![0.0_f32; frames];

    progress(35);
    let mut drum_rng = create_rng(derive_stream_seed(base_seed, "drums"));
    for event in &drum_events {
        let samples = match event.kind {
            DrumKind::Kick => synthesis::kick(KICK_SECONDS, SAMPLE_RATE),
            DrumKind::Snare => synthesis::snare(SNARE_SECONDS, SAMPLE_RATE, &mut drum_rng),
            DrumKind::Hihat => synthesis::hihat(HIHAT_SECONDS, SAMPLE_RATE, &mut drum_rng),
        };
        mix_centered(&mut left, &mut right, &samples, event.time, event.velocity * 0.3);
    }

    progress(50);
    for event in &chord_events {
        let mut samples = synthesis::chord(&event.frequencies, event.duration, SAMPLE_RATE, 1.0);
        apply_fractional_adsr(&mut samples, event.duration);
        mix_centered(&mut left, &mut right, &samples, event.time, 0.7);
    }

    progress(65);
    for event in &melody_events {
        let frequency = synthesis::midi_to_frequency(event.note as f32);
        let mut samples = synthesis::tone(frequency, event.duration, SAMPLE_RATE, 1.0);
        apply_fractional_adsr(&mut samples, event.duration);
        mix_centered(
            &mut left,
            &mut right,
            &samples,
            event.time,
            event.velocity * 0.2 * 0.8,
        );
    }

    progress(85);
    let mut buffer = SampleBuffer::from_stereo(left, right, SAMPLE_RATE)?;
    normalize_peak(&mut buffer);

    progress(90);
    let mut chain = EffectChain::default();
    chain.lofi.enabled = true;
    let buffer = apply_chain(&buffer, &chain)?;

    progress(100);
    Ok(buffer)
}

/// ADSR with stage lengths as fractions of the note duration
/// (attack 0.1, decay 0.2, release 0.3; sustain level 0.7).
fn apply_fractional_adsr(samples: &mut [f32], duration: f32) {
    synthesis::apply_adsr(
        samples,
        duration * 0.1,
        duration * 0.2,
        0.7,
        duration * 0.3,
        SAMPLE_RATE,
    );
}

/// Scales the whole buffer by exactly `0.95 / peak` when the pre-scan peak
/// exceeds 1.0; in-range buffers are left untouched.
fn normalize_peak(buffer: &mut SampleBuffer) {
    let peak = buffer.peak();
    if peak > 1.0 {
        buffer.scale(0.95 / peak);
    }
}

/// Additively mixes a mono source into both channels at `time`, clipping
/// writes that run past the buffer end.
fn mix_centered(left: &mut [f32], right: &mut [f32], samples: &[f32], time: f32, gain: f32) {
    let offset = (time * SAMPLE_RATE as f32).round() as usize;
    if offset >= left.len() {
        return;
    }
    let count = samples.len().min(left.len() - offset);
    for i in 0..count {
        left[offset + i] += samples[i] * gain;
        right[offset + i] += samples[i] * gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Key, Scale, Style, VariationLevel};
    use pretty_assertions::{assert_eq, assert_ne};

    fn chill_settings(duration: f32) -> GeneratorSettings {
        GeneratorSettings {
            duration_seconds: duration,
            bpm: 80.0,
            key: Key::C,
            scale: Scale::Minor,
            style: Style::Chill,
            variation_level: VariationLevel::Low,
            ..GeneratorSettings::default()
        }
    }

    #[test]
    fn test_render_duration_is_exact() {
        let buffer = render_composition(&chill_settings(60.0), 42, |_| {}).unwrap();
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.len(), 60 * SAMPLE_RATE as usize);
    }

    #[test]
    fn test_render_peak_bounded() {
        let buffer = render_composition(&chill_settings(10.0), 7, |_| {}).unwrap();
        assert!(buffer.peak() <= 1.0 + 1e-4);
    }

    #[test]
    fn test_normalization_factor_is_exact() {
        // Pre-scan peak 2.0: every sample is scaled by exactly 0.95 / 2.0.
        let mut buffer =
            SampleBuffer::from_stereo(vec![0.5, 2.0], vec![0.25, -1.0], SAMPLE_RATE).unwrap();
        normalize_peak(&mut buffer);
        let factor = 0.95_f32 / 2.0;
        assert_eq!(buffer.peak(), 0.95);
        assert_eq!(buffer.channel(0)[0], 0.5 * factor);
        assert_eq!(buffer.channel(1)[0], 0.25 * factor);
        assert_eq!(buffer.channel(1)[1], -factor);
    }

    #[test]
    fn test_normalization_skips_in_range_buffers() {
        let input =
            SampleBuffer::from_stereo(vec![0.9, -0.4], vec![0.1, 0.6], SAMPLE_RATE).unwrap();
        let mut buffer = input.clone();
        normalize_peak(&mut buffer);
        assert_eq!(buffer, input);
    }

    #[test]
    fn test_render_is_seed_deterministic() {
        let a = render_composition(&chill_settings(5.0), 123, |_| {}).unwrap();
        let b = render_composition(&chill_settings(5.0), 123, |_| {}).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = render_composition(&chill_settings(5.0), 1, |_| {}).unwrap();
        let b = render_composition(&chill_settings(5.0), 2, |_| {}).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_progress_monotonic_and_complete() {
        let mut reports = Vec::new();
        render_composition(&chill_settings(5.0), 9, |p| reports.push(p)).unwrap();
        assert_eq!(reports.first(), Some(&5));
        assert_eq!(reports.last(), Some(&100));
        for pair in reports.windows(2) {
            assert!(pair[0] <= pair[1], "progress went backwards: {:?}", reports);
        }
        for milestone in [35, 50, 65, 85, 90] {
            assert!(reports.contains(&milestone));
        }
    }

    #[test]
    fn test_invalid_settings_rejected_early() {
        let mut settings = chill_settings(5.0);
        settings.bpm = 300.0;
        let mut reported = false;
        let result = render_composition(&settings, 1, |_| reported = true);
        assert!(result.is_err());
        assert!(!reported, "no progress should be reported before validation");
    }

    #[test]
    fn test_render_produces_audible_signal() {
        let buffer = render_composition(&chill_settings(8.0), 77, |_| {}).unwrap();
        let rms: f32 = (buffer.channel(0).iter().map(|s| s * s).sum::<f32>()
            / buffer.len() as f32)
            .sqrt();
        assert!(rms > 0.005, "render should not be near-silent, rms={}", rms);
    }
}
