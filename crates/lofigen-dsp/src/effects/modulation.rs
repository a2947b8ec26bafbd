//! LFO-modulated stages: chorus, flanger, phaser, vibrato, tremolo, ring
//! modulator, wah-wah.
//!
//! The delay-based stages share [`DelayLine`]; the modulation moves the
//! fractional read offset every sample, so a static delay cannot be used.

use crate::buffer::SampleBuffer;
use crate::effects::delay_line::DelayLine;
use crate::effects::lfo::{Lfo, LfoShape};
use crate::effects::{
    ChorusSettings, FlangerSettings, PhaserSettings, RingModulatorSettings, TremoloSettings,
    VibratoSettings, WahWahSettings,
};
use crate::filter::{Biquad, BiquadCoeffs};
use std::f32::consts::TAU;

/// Runs one channel through a modulated delay with feedback, mixing `wet`.
fn modulated_delay(
    channel: &mut [f32],
    base_delay_ms: f32,
    depth_ms: f32,
    rate: f32,
    feedback: f32,
    wet: f32,
    sample_rate: f32,
) {
    let base_delay = (base_delay_ms / 1000.0) * sample_rate;
    let max_depth = (depth_ms / 1000.0) * sample_rate;
    let capacity = (base_delay + max_depth).ceil() as usize + 4;

    let mut line = DelayLine::new(capacity);
    let mut lfo = Lfo::new(LfoShape::Sine, rate, sample_rate);
    let dry = 1.0 - wet;

    for sample in channel.iter_mut() {
        let modulation = max_depth * lfo.next_unipolar();
        let delay_samples = base_delay + modulation;

        let delayed = line.read_interpolated(delay_samples);
        line.write(*sample + delayed * feedback);
        *sample = *sample * dry + delayed * wet;
    }
}

/// Chorus: ~20 ms base delay swept by up to 20 ms.
pub fn chorus(buffer: &mut SampleBuffer, settings: &ChorusSettings, sample_rate: f32) {
    for channel in buffer.channels_mut() {
        modulated_delay(
            channel,
            20.0,
            settings.depth * 20.0,
            settings.rate,
            settings.feedback,
            settings.wet,
            sample_rate,
        );
    }
}

/// Flanger: ~1 ms base delay swept by up to 5 ms, stronger feedback.
pub fn flanger(buffer: &mut SampleBuffer, settings: &FlangerSettings, sample_rate: f32) {
    for channel in buffer.channels_mut() {
        modulated_delay(
            channel,
            1.0,
            settings.depth * 5.0,
            settings.rate,
            settings.feedback,
            settings.wet,
            sample_rate,
        );
    }
}

/// First-order allpass section for the phaser.
struct AllpassStage {
    coefficient: f32,
    x1: f32,
    y1: f32,
}

impl AllpassStage {
    fn new() -> Self {
        Self {
            coefficient: 0.0,
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Sets the break frequency.
    fn tune(&mut self, frequency: f32, sample_rate: f32) {
        let t = (std::f32::consts::PI * frequency / sample_rate).tan();
        self.coefficient = (t - 1.0) / (t + 1.0);
    }

    fn process(&mut self, input: f32) -> f32 {
        let output = self.coefficient * input + self.x1 - self.coefficient * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }
}

/// Phaser: N cascaded first-order allpass stages whose break frequency
/// follows a sine LFO around 1 kHz, mixed 50/50 with the dry signal.
pub fn phaser(buffer: &mut SampleBuffer, settings: &PhaserSettings, sample_rate: f32) {
    let num_stages = settings.stages.clamp(2, 12) as usize;

    for channel in buffer.channels_mut() {
        let mut stages: Vec<AllpassStage> = (0..num_stages).map(|_| AllpassStage::new()).collect();
        let mut lfo = Lfo::new(LfoShape::Sine, settings.rate, sample_rate);

        for sample in channel.iter_mut() {
            let sweep = 1000.0 + lfo.next_sample() * settings.depth * 2000.0;
            let frequency = sweep.clamp(100.0, sample_rate * 0.45);

            let mut processed = *sample;
            for stage in &mut stages {
                stage.tune(frequency, sample_rate);
                processed = stage.process(processed);
            }
            *sample = 0.5 * *sample + 0.5 * processed;
        }
    }
}

/// Vibrato: full-wet sub-10 ms delay-offset modulation.
pub fn vibrato(buffer: &mut SampleBuffer, settings: &VibratoSettings, sample_rate: f32) {
    let base_delay = (5.0 / 1000.0) * sample_rate;
    let depth = settings.depth * base_delay;
    let capacity = (base_delay + depth).ceil() as usize + 4;

    for channel in buffer.channels_mut() {
        let mut line = DelayLine::new(capacity);
        let mut lfo = Lfo::new(LfoShape::Sine, settings.rate, sample_rate);

        for sample in channel.iter_mut() {
            let delay_samples = base_delay + depth * lfo.next_sample() * 0.5;
            line.write(*sample);
            *sample = line.read_interpolated(delay_samples);
        }
    }
}

/// Tremolo: amplitude modulation with a selectable LFO shape.
pub fn tremolo(buffer: &mut SampleBuffer, settings: &TremoloSettings, sample_rate: f32) {
    for channel in buffer.channels_mut() {
        let mut lfo = Lfo::new(settings.shape, settings.rate, sample_rate);
        for sample in channel.iter_mut() {
            let gain = 1.0 - settings.depth * lfo.next_unipolar();
            *sample *= gain;
        }
    }
}

/// Ring modulator: out = in * carrier * depth + in * (1 - depth).
pub fn ring_modulate(buffer: &mut SampleBuffer, settings: &RingModulatorSettings, sample_rate: f32) {
    let dry = 1.0 - settings.depth;
    let phase_increment = settings.frequency / sample_rate;

    for channel in buffer.channels_mut() {
        let mut phase = 0.0_f32;
        for sample in channel.iter_mut() {
            let carrier = (TAU * phase).sin();
            *sample = *sample * carrier * settings.depth + *sample * dry;
            phase += phase_increment;
            if phase >= 1.0 {
                phase -= 1.0;
            }
        }
    }
}

/// Wah-wah: bandpass whose center sweeps 400-2000 Hz with the LFO.
pub fn wah_wah(buffer: &mut SampleBuffer, settings: &WahWahSettings, sample_rate: f32) {
    const CENTER: f32 = 1200.0;
    const SWING: f32 = 800.0;

    for channel in buffer.channels_mut() {
        let mut lfo = Lfo::new(LfoShape::Sine, settings.rate, sample_rate);
        let mut filter = Biquad::new(BiquadCoeffs::bandpass(
            CENTER as f64,
            2.0,
            sample_rate as f64,
        ));

        for sample in channel.iter_mut() {
            let center = CENTER + lfo.next_sample() * settings.depth * SWING;
            filter.set_coeffs(BiquadCoeffs::bandpass(center as f64, 2.0, sample_rate as f64));
            // 50/50 mix keeps some body under the sweep.
            *sample = 0.5 * *sample + 0.5 * filter.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_buffer(freq: f32, frames: usize) -> SampleBuffer {
        let samples: Vec<f32> = (0..frames)
            .map(|i| (TAU * freq * i as f32 / 44100.0).sin() * 0.5)
            .collect();
        SampleBuffer::from_mono(samples, 44100).unwrap()
    }

    #[test]
    fn test_chorus_preserves_length() {
        let input = sine_buffer(440.0, 4410);
        let mut output = input.clone();
        chorus(
            &mut output,
            &ChorusSettings {
                enabled: true,
                rate: 2.0,
                depth: 0.5,
                feedback: 0.3,
                wet: 0.5,
            },
            44100.0,
        );
        assert_eq!(output.len(), input.len());
        assert_ne!(output, input);
    }

    #[test]
    fn test_tremolo_full_depth_reaches_silence() {
        let mut buffer = SampleBuffer::from_mono(vec![0.5_f32; 44100], 44100).unwrap();
        tremolo(
            &mut buffer,
            &TremoloSettings {
                enabled: true,
                rate: 4.0,
                depth: 1.0,
                shape: LfoShape::Sine,
            },
            44100.0,
        );
        let min = buffer
            .channel(0)
            .iter()
            .fold(f32::MAX, |a, &b| a.min(b.abs()));
        assert!(min < 0.01);
    }

    #[test]
    fn test_ring_mod_zero_depth_is_identity() {
        let input = sine_buffer(440.0, 2000);
        let mut output = input.clone();
        ring_modulate(
            &mut output,
            &RingModulatorSettings {
                enabled: true,
                frequency: 300.0,
                depth: 0.0,
            },
            44100.0,
        );
        assert_eq!(output, input);
    }

    #[test]
    fn test_phaser_mixes_half_dry() {
        let input = sine_buffer(440.0, 4410);
        let mut output = input.clone();
        phaser(
            &mut output,
            &PhaserSettings {
                enabled: true,
                rate: 0.5,
                depth: 0.7,
                stages: 4,
            },
            44100.0,
        );
        assert_eq!(output.len(), input.len());
        assert_ne!(output, input);
        // Allpass chain has unity magnitude, so the 50/50 mix stays bounded.
        assert!(output.peak() <= 1.0);
    }

    #[test]
    fn test_vibrato_preserves_energy_roughly() {
        let input = sine_buffer(440.0, 44100);
        let mut output = input.clone();
        vibrato(
            &mut output,
            &VibratoSettings {
                enabled: true,
                rate: 5.0,
                depth: 0.5,
            },
            44100.0,
        );
        let in_rms = (input.channel(0).iter().map(|s| s * s).sum::<f32>() / 44100.0).sqrt();
        let out_rms = (output.channel(0).iter().map(|s| s * s).sum::<f32>() / 44100.0).sqrt();
        assert!((in_rms - out_rms).abs() / in_rms < 0.1);
    }
}
