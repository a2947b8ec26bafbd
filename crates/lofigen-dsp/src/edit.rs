//! Buffer editing operations.
//!
//! All operations are pure: they take a buffer reference and return a new
//! buffer. Time arguments are in seconds with fractional precision, rounded
//! to the nearest sample.

use crate::buffer::SampleBuffer;
use crate::effects::eq;
use crate::error::{DspError, DspResult};

/// Gains in dB for the three-band editing EQ.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EqGains {
    pub bass_db: f32,
    pub mid_db: f32,
    pub treble_db: f32,
}

fn seconds_to_frame(seconds: f32, sample_rate: u32) -> usize {
    (seconds * sample_rate as f32).round() as usize
}

fn check_range(buffer: &SampleBuffer, start: f32, end: f32) -> DspResult<(usize, usize)> {
    let start_frame = seconds_to_frame(start, buffer.sample_rate());
    let end_frame = seconds_to_frame(end, buffer.sample_rate());
    if start < 0.0 || end_frame <= start_frame || end_frame > buffer.len() {
        return Err(DspError::InvalidRange {
            start_seconds: start,
            end_seconds: end,
            buffer_seconds: buffer.duration_seconds(),
        });
    }
    Ok((start_frame, end_frame))
}

/// Copies the sub-range [start, end) seconds into a new buffer.
pub fn trim(buffer: &SampleBuffer, start: f32, end: f32) -> DspResult<SampleBuffer> {
    let (start_frame, end_frame) = check_range(buffer, start, end)?;
    let channels = buffer
        .channels()
        .iter()
        .map(|c| c[start_frame..end_frame].to_vec())
        .collect();
    SampleBuffer::new(channels, buffer.sample_rate())
}

/// Removes [start, end) seconds, concatenating what precedes and follows.
pub fn delete_range(buffer: &SampleBuffer, start: f32, end: f32) -> DspResult<SampleBuffer> {
    let (start_frame, end_frame) = check_range(buffer, start, end)?;
    let channels = buffer
        .channels()
        .iter()
        .map(|c| {
            let mut out = Vec::with_capacity(c.len() - (end_frame - start_frame));
            out.extend_from_slice(&c[..start_frame]);
            out.extend_from_slice(&c[end_frame..]);
            out
        })
        .collect();
    SampleBuffer::new(channels, buffer.sample_rate())
}

/// Reverses every channel. `reverse(reverse(b)) == b` exactly.
pub fn reverse(buffer: &SampleBuffer) -> SampleBuffer {
    let channels = buffer
        .channels()
        .iter()
        .map(|c| c.iter().rev().copied().collect())
        .collect();
    // Same shape as the input, so the invariant cannot fail.
    SampleBuffer::new(channels, buffer.sample_rate()).expect("reversed buffer keeps its shape")
}

/// Three-band EQ: low shelf at 200 Hz, peaking at 1 kHz (Q = 1), high shelf
/// at 4 kHz. All-zero gains is an exact identity.
pub fn three_band_eq(buffer: &SampleBuffer, gains: EqGains) -> SampleBuffer {
    let mut out = buffer.clone();
    eq::three_band(&mut out, gains.bass_db, gains.mid_db, gains.treble_db);
    out
}

/// Concatenates two buffers over a linear crossfade window.
///
/// The crossfade is clamped to the shorter of the two sources, so an
/// oversized window degrades gracefully instead of reading out of range.
pub fn merge_with_crossfade(
    a: &SampleBuffer,
    b: &SampleBuffer,
    crossfade_seconds: f32,
) -> DspResult<SampleBuffer> {
    if a.num_channels() != b.num_channels() {
        return Err(DspError::IncompatibleBuffers {
            message: format!(
                "channel counts differ: {} vs {}",
                a.num_channels(),
                b.num_channels()
            ),
        });
    }
    if a.sample_rate() != b.sample_rate() {
        return Err(DspError::IncompatibleBuffers {
            message: format!(
                "sample rates differ: {} vs {}",
                a.sample_rate(),
                b.sample_rate()
            ),
        });
    }
    if crossfade_seconds < 0.0 {
        return Err(DspError::invalid_param(
            "crossfade_seconds",
            format!("must be >= 0, got {}", crossfade_seconds),
        ));
    }

    let requested = seconds_to_frame(crossfade_seconds, a.sample_rate());
    let crossfade = requested.min(a.len()).min(b.len());
    let out_len = a.len() + b.len() - crossfade;

    let channels = a
        .channels()
        .iter()
        .zip(b.channels().iter())
        .map(|(ca, cb)| {
            let mut out = Vec::with_capacity(out_len);
            out.extend_from_slice(&ca[..a.len() - crossfade]);
            for i in 0..crossfade {
                let t = if crossfade > 1 {
                    i as f32 / (crossfade - 1) as f32
                } else {
                    1.0
                };
                out.push(ca[a.len() - crossfade + i] * (1.0 - t) + cb[i] * t);
            }
            out.extend_from_slice(&cb[crossfade..]);
            out
        })
        .collect();

    SampleBuffer::new(channels, a.sample_rate())
}

/// Linear fade-in at the head and fade-out at the tail.
///
/// Where the two ramps overlap, the smaller of the two gains wins. Zero
/// lengths are exact identities.
pub fn fade(buffer: &SampleBuffer, fade_in_seconds: f32, fade_out_seconds: f32) -> SampleBuffer {
    let rate = buffer.sample_rate();
    let len = buffer.len();
    let fade_in = seconds_to_frame(fade_in_seconds.max(0.0), rate).min(len);
    let fade_out = seconds_to_frame(fade_out_seconds.max(0.0), rate).min(len);

    let channels = buffer
        .channels()
        .iter()
        .map(|c| {
            c.iter()
                .enumerate()
                .map(|(i, &s)| {
                    let gain_in = if i < fade_in {
                        i as f32 / fade_in as f32
                    } else {
                        1.0
                    };
                    let gain_out = if i >= len - fade_out {
                        (len - i) as f32 / fade_out as f32
                    } else {
                        1.0
                    };
                    s * gain_in.min(gain_out)
                })
                .collect()
        })
        .collect();

    SampleBuffer::new(channels, rate).expect("faded buffer keeps its shape")
}

/// Downsamples the buffer to `num_buckets` mean-absolute-magnitude values,
/// averaged across all channels. Visualization only.
pub fn waveform_buckets(buffer: &SampleBuffer, num_buckets: usize) -> Vec<f32> {
    if num_buckets == 0 || buffer.is_empty() {
        return Vec::new();
    }
    let len = buffer.len();
    let num_channels = buffer.num_channels() as f32;

    (0..num_buckets)
        .map(|bucket| {
            let start = bucket * len / num_buckets;
            let end = (((bucket + 1) * len) / num_buckets).max(start + 1).min(len);
            let mut acc = 0.0_f32;
            for channel in buffer.channels() {
                for &s in &channel[start..end] {
                    acc += s.abs();
                }
            }
            acc / ((end - start) as f32 * num_channels)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ramp_buffer(frames: usize) -> SampleBuffer {
        SampleBuffer::from_stereo(
            (0..frames).map(|i| i as f32 / frames as f32).collect(),
            (0..frames).map(|i| -(i as f32) / frames as f32).collect(),
            44100,
        )
        .unwrap()
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let buffer = ramp_buffer(12345);
        assert_eq!(reverse(&reverse(&buffer)), buffer);
    }

    #[test]
    fn test_trim_full_range_is_identity() {
        let buffer = ramp_buffer(44100);
        let trimmed = trim(&buffer, 0.0, buffer.duration_seconds()).unwrap();
        assert_eq!(trimmed, buffer);
    }

    #[test]
    fn test_trim_rounds_to_nearest_sample() {
        let buffer = ramp_buffer(44100);
        let trimmed = trim(&buffer, 0.25, 0.75).unwrap();
        assert_eq!(trimmed.len(), 22050);
        assert_eq!(trimmed.channel(0)[0], buffer.channel(0)[11025]);
    }

    #[test]
    fn test_trim_invalid_range_rejected() {
        let buffer = ramp_buffer(4410);
        assert!(trim(&buffer, 0.5, 0.1).is_err());
        assert!(trim(&buffer, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_delete_range_concatenates() {
        let buffer = ramp_buffer(44100);
        let deleted = delete_range(&buffer, 0.25, 0.75).unwrap();
        assert_eq!(deleted.len(), 22050);
        assert_eq!(deleted.channel(0)[11024], buffer.channel(0)[11024]);
        assert_eq!(deleted.channel(0)[11025], buffer.channel(0)[33075]);
    }

    #[test]
    fn test_zero_eq_is_identity() {
        let buffer = ramp_buffer(4410);
        assert_eq!(three_band_eq(&buffer, EqGains::default()), buffer);
    }

    #[test]
    fn test_zero_fade_is_identity() {
        let buffer = ramp_buffer(4410);
        assert_eq!(fade(&buffer, 0.0, 0.0), buffer);
    }

    #[test]
    fn test_fade_ramps() {
        let buffer = SampleBuffer::from_mono(vec![1.0_f32; 44100], 44100).unwrap();
        let faded = fade(&buffer, 0.5, 0.5);
        assert_eq!(faded.channel(0)[0], 0.0);
        assert!((faded.channel(0)[11025] - 0.5).abs() < 1e-3);
        assert!(faded.channel(0)[30000] > 0.6);
        assert!(faded.channel(0)[44099] < 1e-3);
    }

    #[test]
    fn test_overlapping_fades_take_minimum() {
        // 1 s buffer with 1 s fades both ways: every sample is shaped by the
        // smaller ramp, peaking at 0.5 in the middle.
        let buffer = SampleBuffer::from_mono(vec![1.0_f32; 44100], 44100).unwrap();
        let faded = fade(&buffer, 1.0, 1.0);
        assert!((faded.channel(0)[22050] - 0.5).abs() < 1e-3);
        assert!(faded.channel(0)[5000] < 0.2);
    }

    #[test]
    fn test_crossfade_merge_length() {
        // 2 s + 2 s with a 1 s crossfade = 3 s.
        let a = SampleBuffer::from_mono(vec![0.5_f32; 88200], 44100).unwrap();
        let b = SampleBuffer::from_mono(vec![0.25_f32; 88200], 44100).unwrap();
        let merged = merge_with_crossfade(&a, &b, 1.0).unwrap();
        assert!((merged.len() as i64 - 132300).abs() <= 1);
    }

    #[test]
    fn test_crossfade_clamped_to_sources() {
        let a = SampleBuffer::from_mono(vec![0.5_f32; 4410], 44100).unwrap();
        let b = SampleBuffer::from_mono(vec![0.25_f32; 44100], 44100).unwrap();
        // 10 s crossfade on a 0.1 s source clamps to 0.1 s.
        let merged = merge_with_crossfade(&a, &b, 10.0).unwrap();
        assert_eq!(merged.len(), 44100);
    }

    #[test]
    fn test_crossfade_channel_mismatch_rejected() {
        let a = SampleBuffer::from_mono(vec![0.0_f32; 100], 44100).unwrap();
        let b = SampleBuffer::from_stereo(vec![0.0_f32; 100], vec![0.0; 100], 44100).unwrap();
        assert!(matches!(
            merge_with_crossfade(&a, &b, 0.0),
            Err(DspError::IncompatibleBuffers { .. })
        ));
    }

    #[test]
    fn test_waveform_buckets() {
        let buffer = SampleBuffer::from_mono(
            [vec![0.0_f32; 1000], vec![1.0_f32; 1000]].concat(),
            44100,
        )
        .unwrap();
        let buckets = waveform_buckets(&buffer, 2);
        assert_eq!(buckets.len(), 2);
        assert!(buckets[0] < 0.01);
        assert!((buckets[1] - 1.0).abs() < 0.01);
    }
}
