//! Reusable ring-buffer delay line.
//!
//! One abstraction backs every delay-based stage (delay, chorus, flanger,
//! vibrato, reverb taps) instead of per-effect hand-rolled circular buffers.
//! The read offset may be fractional; modulated effects move it every sample.

/// Fixed-capacity ring buffer with integer and interpolated fractional reads.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line able to hold `max_samples` of history.
    pub fn new(max_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_samples.max(4)],
            write_pos: 0,
        }
    }

    /// Writes a sample and advances the write position.
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Reads the sample written `delay_samples` writes ago.
    pub fn read(&self, delay_samples: usize) -> f32 {
        let delay = delay_samples.min(self.buffer.len() - 1);
        let read_pos = (self.write_pos + self.buffer.len() - delay) % self.buffer.len();
        self.buffer[read_pos]
    }

    /// Reads at a fractional delay using linear interpolation.
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let delay = delay_samples.max(0.0).min(self.buffer.len() as f32 - 2.0);
        let delay_int = delay.floor() as usize;
        let delay_frac = delay - delay_int as f32;

        let sample1 = self.read(delay_int);
        let sample2 = self.read(delay_int + 1);

        sample1 * (1.0 - delay_frac) + sample2 * delay_frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_read() {
        let mut dl = DelayLine::new(10);
        for i in 0..5 {
            dl.write(i as f32);
        }
        assert!((dl.read(1) - 4.0).abs() < 1e-6);
        assert!((dl.read(5) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_fractional_read_interpolates() {
        let mut dl = DelayLine::new(10);
        dl.write(0.0);
        dl.write(1.0);
        dl.write(2.0);
        // Halfway between delay=1 (2.0) and delay=2 (1.0).
        assert!((dl.read_interpolated(1.5) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_around() {
        let mut dl = DelayLine::new(4);
        for i in 0..10 {
            dl.write(i as f32);
        }
        assert!((dl.read(1) - 9.0).abs() < 1e-6);
    }
}
