//! 16-bit PCM WAV encoding.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::buffer::SampleBuffer;
use crate::error::DspResult;

/// Converts a float sample in [-1, 1] to PCM16.
///
/// Negative values scale by 32768 and positive by 32767 so that both rails
/// map exactly to `i16::MIN` / `i16::MAX`. Out-of-range input is clamped.
fn sample_to_pcm16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0).round() as i16
    } else {
        (clamped * 32767.0).round() as i16
    }
}

/// Encodes the buffer as a 16-bit PCM WAV file: 44-byte RIFF header followed
/// by interleaved frames.
pub fn encode_wav16(buffer: &SampleBuffer) -> DspResult<Vec<u8>> {
    let num_channels = buffer.num_channels() as u16;
    let sample_rate = buffer.sample_rate();
    let bits_per_sample: u16 = 16;
    let block_align = num_channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * block_align as u32;
    let data_size = (buffer.len() * block_align as usize) as u32;

    let mut out = Vec::with_capacity(44 + data_size as usize);
    out.write_all(b"RIFF")?;
    out.write_u32::<LittleEndian>(36 + data_size)?;
    out.write_all(b"WAVE")?;

    out.write_all(b"fmt ")?;
    out.write_u32::<LittleEndian>(16)?;
    out.write_u16::<LittleEndian>(1)?; // PCM
    out.write_u16::<LittleEndian>(num_channels)?;
    out.write_u32::<LittleEndian>(sample_rate)?;
    out.write_u32::<LittleEndian>(byte_rate)?;
    out.write_u16::<LittleEndian>(block_align)?;
    out.write_u16::<LittleEndian>(bits_per_sample)?;

    out.write_all(b"data")?;
    out.write_u32::<LittleEndian>(data_size)?;
    for frame in 0..buffer.len() {
        for channel in buffer.channels() {
            out.write_i16::<LittleEndian>(sample_to_pcm16(channel[frame]))?;
        }
    }

    Ok(out)
}
