//! Shared low-frequency oscillator.
//!
//! Tremolo, vibrato, auto-pan, chorus, flanger, phaser, wah-wah, and the
//! sidechain duck all derive their modulation from this one generator.
//! Phase is `2*pi*rate*t mod 2*pi`.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// LFO waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LfoShape {
    /// Smooth sine.
    #[default]
    Sine,
    /// Hard-edged square.
    Square,
    /// Linear triangle.
    Triangle,
}

/// Low-frequency oscillator producing bipolar output in [-1, 1].
#[derive(Debug, Clone)]
pub struct Lfo {
    shape: LfoShape,
    rate: f32,
    sample_rate: f32,
    frame: u64,
    phase_offset: f32,
}

impl Lfo {
    /// Creates an LFO at `rate` Hz.
    pub fn new(shape: LfoShape, rate: f32, sample_rate: f32) -> Self {
        Self {
            shape,
            rate,
            sample_rate,
            frame: 0,
            phase_offset: 0.0,
        }
    }

    /// Creates an LFO with an initial phase offset in radians.
    pub fn with_phase(shape: LfoShape, rate: f32, sample_rate: f32, phase_offset: f32) -> Self {
        Self {
            phase_offset,
            ..Self::new(shape, rate, sample_rate)
        }
    }

    /// Produces the next sample in [-1, 1].
    pub fn next_sample(&mut self) -> f32 {
        let t = self.frame as f32 / self.sample_rate;
        self.frame += 1;
        let phase = (TAU * self.rate * t + self.phase_offset) % TAU;

        match self.shape {
            LfoShape::Sine => phase.sin(),
            LfoShape::Square => {
                if phase < TAU / 2.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::Triangle => {
                let cycle = phase / TAU;
                if cycle < 0.5 {
                    4.0 * cycle - 1.0
                } else {
                    3.0 - 4.0 * cycle
                }
            }
        }
    }

    /// Produces the next sample rescaled to [0, 1].
    pub fn next_unipolar(&mut self) -> f32 {
        (self.next_sample() + 1.0) * 0.5
    }
}
