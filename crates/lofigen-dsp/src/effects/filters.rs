//! Highpass, lowpass, and bandpass chain stages.

use crate::buffer::SampleBuffer;
use crate::filter::{Biquad, BiquadCoeffs};

const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Second-order highpass over every channel.
pub fn highpass(buffer: &mut SampleBuffer, cutoff: f32, sample_rate: f32) {
    let coeffs = BiquadCoeffs::highpass(cutoff as f64, BUTTERWORTH_Q, sample_rate as f64);
    run(buffer, coeffs);
}

/// Second-order lowpass over every channel.
pub fn lowpass(buffer: &mut SampleBuffer, cutoff: f32, sample_rate: f32) {
    let coeffs = BiquadCoeffs::lowpass(cutoff as f64, BUTTERWORTH_Q, sample_rate as f64);
    run(buffer, coeffs);
}

/// Second-order bandpass over every channel.
pub fn bandpass(buffer: &mut SampleBuffer, cutoff: f32, q: f32, sample_rate: f32) {
    let coeffs = BiquadCoeffs::bandpass(cutoff as f64, q as f64, sample_rate as f64);
    run(buffer, coeffs);
}

fn run(buffer: &mut SampleBuffer, coeffs: BiquadCoeffs) {
    for channel in buffer.channels_mut() {
        Biquad::new(coeffs).process_slice(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    fn sine_buffer(freq: f32) -> SampleBuffer {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 44100.0).sin())
            .collect();
        SampleBuffer::from_mono(samples, 44100).unwrap()
    }

    #[test]
    fn test_highpass_stage_removes_bass() {
        let mut buffer = sine_buffer(60.0);
        highpass(&mut buffer, 800.0, 44100.0);
        assert!(rms(buffer.channel(0)) < 0.05);
    }

    #[test]
    fn test_lowpass_stage_keeps_bass() {
        let mut buffer = sine_buffer(60.0);
        lowpass(&mut buffer, 800.0, 44100.0);
        assert!(rms(buffer.channel(0)) > 0.6);
    }
}
