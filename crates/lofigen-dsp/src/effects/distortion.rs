//! Nonlinear stages: waveshaper distortion, tape saturation, bit crusher,
//! exciter, and the lofi composite.

use crate::buffer::SampleBuffer;
use crate::effects::LofiSettings;
use std::f32::consts::PI;

/// Number of entries in the shaping curve lookup table.
const CURVE_RESOLUTION: usize = 44100;

/// Oversampling factor applied around the shaping curve to limit aliasing.
const OVERSAMPLE: usize = 4;

/// Builds the distortion shaping curve over x in [-1, 1].
///
/// y = (3 + k) * x * 20 * (pi / 180) / (pi + k * |x|), with k the drive
/// amount in [0, 1].
fn shaping_curve(amount: f32) -> Vec<f32> {
    let k = amount.clamp(0.0, 1.0);
    let deg = PI / 180.0;
    (0..CURVE_RESOLUTION)
        .map(|i| {
            let x = (i as f32 * 2.0) / CURVE_RESOLUTION as f32 - 1.0;
            (3.0 + k) * x * 20.0 * deg / (PI + k * x.abs())
        })
        .collect()
}

/// Looks up the curve with linear interpolation, input clamped to [-1, 1].
fn shape(curve: &[f32], x: f32) -> f32 {
    let pos = (x.clamp(-1.0, 1.0) + 1.0) * 0.5 * (curve.len() - 1) as f32;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f32;
    if idx + 1 >= curve.len() {
        return curve[curve.len() - 1];
    }
    curve[idx] * (1.0 - frac) + curve[idx + 1] * frac
}

/// Curve-table waveshaper with 4x oversampling.
///
/// Each input sample is linearly upsampled against its predecessor, shaped,
/// and the shaped sub-samples averaged back down.
pub fn waveshape(buffer: &mut SampleBuffer, amount: f32) {
    let curve = shaping_curve(amount);

    for channel in buffer.channels_mut() {
        let mut previous = 0.0_f32;
        for sample in channel.iter_mut() {
            let current = *sample;
            let mut acc = 0.0_f32;
            for step in 0..OVERSAMPLE {
                let frac = (step + 1) as f32 / OVERSAMPLE as f32;
                let interpolated = previous * (1.0 - frac) + current * frac;
                acc += shape(&curve, interpolated);
            }
            previous = current;
            *sample = acc / OVERSAMPLE as f32;
        }
    }
}

/// Soft tanh saturation with drive-compensating makeup gain, dry/wet mixed.
pub fn tape_saturate(buffer: &mut SampleBuffer, drive: f32, mix: f32) {
    let mix = mix.clamp(0.0, 1.0);
    let dry = 1.0 - mix;
    let makeup = 1.0 / drive.sqrt();

    for channel in buffer.channels_mut() {
        for sample in channel.iter_mut() {
            let saturated = (*sample * drive).tanh() * makeup;
            *sample = *sample * dry + saturated * mix;
        }
    }
}

/// Bit-depth quantization plus sample-hold rate reduction.
pub fn bit_crush(buffer: &mut SampleBuffer, bits: u8, rate_reduction: f32) {
    let bits = bits.clamp(1, 16);
    let reduction = rate_reduction.max(1.0);
    let levels = (1_u32 << bits) as f32;
    let step = 2.0 / levels;

    for channel in buffer.channels_mut() {
        let mut phase = 1.0_f32;
        let mut held = 0.0_f32;
        for sample in channel.iter_mut() {
            if phase >= 1.0 {
                phase -= 1.0;
                held = (*sample / step).round() * step;
            }
            *sample = held;
            phase += 1.0 / reduction;
        }
    }
}

/// Adds a cubic-nonlinearity harmonic term scaled by `amount`.
pub fn excite(buffer: &mut SampleBuffer, amount: f32) {
    let amount = amount.clamp(0.0, 1.0);
    for channel in buffer.channels_mut() {
        for sample in channel.iter_mut() {
            let s = *sample;
            *sample = s + amount * s * s * s;
        }
    }
}

/// The canned lo-fi composite: bit depth reduction, sample-rate reduction,
/// then a one-pole lowpass to round off the quantization edges.
pub fn lofi(buffer: &mut SampleBuffer, settings: &LofiSettings, sample_rate: f32) {
    bit_crush(buffer, settings.bits, settings.rate_reduction);

    // One-pole lowpass: y[n] = y[n-1] + c * (x[n] - y[n-1]).
    let c = 1.0 - (-2.0 * PI * settings.cutoff / sample_rate).exp();
    for channel in buffer.channels_mut() {
        let mut state = 0.0_f32;
        for sample in channel.iter_mut() {
            state += c * (*sample - state);
            *sample = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_is_odd_symmetric() {
        let curve = shaping_curve(0.5);
        assert_eq!(curve.len(), CURVE_RESOLUTION);
        let at = |x: f32| shape(&curve, x);
        assert!((at(0.5) + at(-0.5)).abs() < 1e-3);
        assert!(at(0.0).abs() < 1e-3);
    }

    #[test]
    fn test_curve_matches_transfer_formula() {
        // Table lookup must agree with the closed form at a few points.
        for amount in [0.0_f32, 0.5, 1.0] {
            let k = amount;
            let curve = shaping_curve(amount);
            for x in [-0.9_f32, -0.3, 0.1, 0.7] {
                let expected = (3.0 + k) * x * 20.0 * (PI / 180.0) / (PI + k * x.abs());
                let got = shape(&curve, x);
                assert!(
                    (got - expected).abs() < 1e-3,
                    "amount={} x={}: expected {}, got {}",
                    amount,
                    x,
                    expected,
                    got
                );
            }
        }
    }

    #[test]
    fn test_waveshape_changes_signal() {
        let samples: Vec<f32> = (0..4410)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 44100.0).sin() * 0.8)
            .collect();
        let input = SampleBuffer::from_mono(samples, 44100).unwrap();
        let mut output = input.clone();
        waveshape(&mut output, 0.8);
        assert_ne!(output, input);
        assert_eq!(output.len(), input.len());
    }

    #[test]
    fn test_bit_crush_quantizes() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let mut buffer = SampleBuffer::from_mono(samples, 44100).unwrap();
        bit_crush(&mut buffer, 2, 1.0);

        // With 2 bits the step is 0.5; every output lands on a multiple.
        for &s in buffer.channel(0) {
            let nearest = (s / 0.5).round() * 0.5;
            assert!((s - nearest).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bit_crush_holds_samples() {
        let samples: Vec<f32> = (0..16).map(|i| i as f32 * 0.05).collect();
        let mut buffer = SampleBuffer::from_mono(samples, 44100).unwrap();
        bit_crush(&mut buffer, 16, 4.0);

        // Rate reduction of 4 holds each quantized value for 4 samples.
        let ch = buffer.channel(0);
        assert_eq!(ch[0], ch[1]);
        assert_eq!(ch[1], ch[2]);
        assert_eq!(ch[2], ch[3]);
        assert_ne!(ch[3], ch[4]);
    }

    #[test]
    fn test_excite_zero_amount_is_identity() {
        let input =
            SampleBuffer::from_mono((0..100).map(|i| (i as f32 * 0.1).sin()).collect(), 44100)
                .unwrap();
        let mut output = input.clone();
        excite(&mut output, 0.0);
        assert_eq!(output, input);
    }

    #[test]
    fn test_tape_saturation_bounds_output() {
        let mut buffer = SampleBuffer::from_mono(vec![0.9_f32; 1000], 44100).unwrap();
        tape_saturate(&mut buffer, 10.0, 1.0);
        // tanh output scaled by makeup never exceeds 1/sqrt(drive).
        assert!(buffer.peak() <= 1.0 / 10.0_f32.sqrt() + 1e-6);
    }
}
