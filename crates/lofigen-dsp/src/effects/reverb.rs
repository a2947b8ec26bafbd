//! Simple multi-tap reverb.
//!
//! Four parallel feedforward taps at fixed ratios of the room size
//! (30/50/70/90 ms), attenuated by the dampening, summed and dry/wet mixed.

use crate::buffer::SampleBuffer;
use crate::effects::ReverbSettings;

/// Tap offsets in milliseconds at room_size = 1.0.
const TAP_RATIOS_MS: [f32; 4] = [30.0, 50.0, 70.0, 90.0];

/// Applies the four-tap reverb in place.
pub fn multi_tap(buffer: &mut SampleBuffer, settings: &ReverbSettings, sample_rate: f32) {
    let taps: Vec<usize> = TAP_RATIOS_MS
        .iter()
        .map(|ms| ((ms / 1000.0) * settings.room_size * sample_rate).round() as usize)
        .collect();
    let attenuation = settings.dampening * 0.3;
    let dry = 1.0 - settings.wet;

    for channel in buffer.channels_mut() {
        let input = channel.to_vec();
        for (i, sample) in channel.iter_mut().enumerate() {
            let mut wet_sum = 0.0_f32;
            for &tap in &taps {
                if tap > 0 && i >= tap {
                    wet_sum += input[i - tap] * attenuation;
                }
            }
            *sample = input[i] * dry + (input[i] + wet_sum) * settings.wet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taps_land_at_expected_offsets() {
        let mut samples = vec![0.0_f32; 44100];
        samples[0] = 1.0;
        let mut buffer = SampleBuffer::from_mono(samples, 44100).unwrap();

        multi_tap(
            &mut buffer,
            &ReverbSettings {
                enabled: true,
                room_size: 1.0,
                dampening: 1.0,
                wet: 1.0,
            },
            44100.0,
        );

        let ch = buffer.channel(0);
        for ms in TAP_RATIOS_MS {
            let offset = ((ms / 1000.0) * 44100.0).round() as usize;
            assert!(
                (ch[offset] - 0.3).abs() < 1e-5,
                "tap at {} ms missing, got {}",
                ms,
                ch[offset]
            );
        }
    }

    #[test]
    fn test_zero_wet_is_identity() {
        let input = SampleBuffer::from_mono(
            (0..1000).map(|i| (i as f32 * 0.01).sin()).collect(),
            44100,
        )
        .unwrap();
        let mut output = input.clone();
        multi_tap(
            &mut output,
            &ReverbSettings {
                enabled: true,
                room_size: 0.5,
                dampening: 0.5,
                wet: 0.0,
            },
            44100.0,
        );
        assert_eq!(output, input);
    }
}
