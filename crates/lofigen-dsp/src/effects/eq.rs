//! Three-band tone shaping shared by the multi-band EQ stage and the buffer
//! editing EQ operation.
//!
//! Fixed topology: low shelf at 200 Hz, peaking at 1 kHz with Q = 1, high
//! shelf at 4 kHz. A band is only inserted when its gain is nonzero, so
//! all-zero gains is an exact identity.

use crate::buffer::SampleBuffer;
use crate::filter::{Biquad, BiquadCoeffs};

/// Low shelf corner frequency in Hz.
pub const BASS_FREQ: f64 = 200.0;
/// Peaking band center frequency in Hz.
pub const MID_FREQ: f64 = 1000.0;
/// High shelf corner frequency in Hz.
pub const TREBLE_FREQ: f64 = 4000.0;

/// Applies the three fixed bands in place. Gains are in dB.
pub fn three_band(buffer: &mut SampleBuffer, low_db: f32, mid_db: f32, high_db: f32) {
    let sample_rate = buffer.sample_rate() as f64;

    let mut bands: Vec<BiquadCoeffs> = Vec::with_capacity(3);
    if low_db != 0.0 {
        bands.push(BiquadCoeffs::low_shelf(BASS_FREQ, low_db as f64, sample_rate));
    }
    if mid_db != 0.0 {
        bands.push(BiquadCoeffs::peaking(MID_FREQ, 1.0, mid_db as f64, sample_rate));
    }
    if high_db != 0.0 {
        bands.push(BiquadCoeffs::high_shelf(
            TREBLE_FREQ,
            high_db as f64,
            sample_rate,
        ));
    }
    if bands.is_empty() {
        return;
    }

    for channel in buffer.channels_mut() {
        let mut filters: Vec<Biquad> = bands.iter().map(|&c| Biquad::new(c)).collect();
        for sample in channel.iter_mut() {
            let mut value = *sample;
            for filter in &mut filters {
                value = filter.process(value);
            }
            *sample = value;
        }
    }
}
