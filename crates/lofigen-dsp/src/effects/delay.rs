//! Single-tap feedback echo.

use crate::buffer::SampleBuffer;
use crate::effects::delay_line::DelayLine;
use crate::effects::DelaySettings;

/// Feedback echo: one tap at `time_seconds`, fed back by `feedback`,
/// dry/wet mixed by `wet`. The ring buffer is sized to the configured delay.
pub fn echo(buffer: &mut SampleBuffer, settings: &DelaySettings, sample_rate: f32) {
    let delay_samples = settings.time_seconds * sample_rate;
    if delay_samples < 1.0 {
        return;
    }
    let capacity = delay_samples.ceil() as usize + 2;
    let dry = 1.0 - settings.wet;

    for channel in buffer.channels_mut() {
        let mut line = DelayLine::new(capacity);
        for sample in channel.iter_mut() {
            let delayed = line.read_interpolated(delay_samples);
            line.write(*sample + delayed * settings.feedback);
            *sample = *sample * dry + delayed * settings.wet;
        }
    }
}
