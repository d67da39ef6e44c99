//! Float sample to and from PCM byte conversion
//!
//! Capture delivers normalized `f32` samples; the data block of a recording
//! holds integers laid out the way the `PcmFormat` says (bit depth,
//! signedness, sample byte order). The header itself never depends on
//! signedness or byte order.

use super::format::PcmFormat;
use crate::error::{PcmError, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::warn;

/// Largest sample width this encoder writes
const MAX_BYTES_PER_SAMPLE: usize = 4;

/// Encode interleaved samples in [-1.0, 1.0] as PCM bytes for `format`
///
/// Out-of-range samples are clipped. Unsigned formats are offset so that
/// silence sits at the midpoint (128 for 8-bit). Fails with
/// [`PcmError::InvalidFormat`] for samples wider than 32 bits.
pub fn encode_samples(format: &PcmFormat, samples: &[f32]) -> Result<Vec<u8>> {
    let width = supported_width(format)?;
    let bits = u32::from(format.bits_per_sample());
    let peak = ((1i64 << (bits - 1)) - 1) as f64;
    let offset = 1i64 << (bits - 1);

    let mut out = vec![0u8; samples.len() * width];
    let mut clipped = 0usize;

    for (chunk, &sample) in out.chunks_exact_mut(width).zip(samples) {
        if !(-1.0..=1.0).contains(&sample) {
            clipped += 1;
        }
        let value = (f64::from(sample.clamp(-1.0, 1.0)) * peak).round() as i64;

        match (format.is_signed(), format.is_big_endian()) {
            (true, false) => LittleEndian::write_int(chunk, value, width),
            (true, true) => BigEndian::write_int(chunk, value, width),
            (false, false) => LittleEndian::write_uint(chunk, (value + offset) as u64, width),
            (false, true) => BigEndian::write_uint(chunk, (value + offset) as u64, width),
        }
    }

    if clipped > 0 {
        warn!("Clipped {} of {} samples outside [-1, 1]", clipped, samples.len());
    }

    Ok(out)
}

/// Decode PCM bytes laid out per `format` into samples in [-1.0, 1.0)
///
/// A trailing partial sample is ignored.
pub fn decode_samples(format: &PcmFormat, data: &[u8]) -> Result<Vec<f32>> {
    let width = supported_width(format)?;
    let bits = u32::from(format.bits_per_sample());
    let scale = (1i64 << (bits - 1)) as f64;
    let offset = 1i64 << (bits - 1);

    let samples = data
        .chunks_exact(width)
        .map(|chunk| {
            let value = match (format.is_signed(), format.is_big_endian()) {
                (true, false) => LittleEndian::read_int(chunk, width),
                (true, true) => BigEndian::read_int(chunk, width),
                (false, false) => LittleEndian::read_uint(chunk, width) as i64 - offset,
                (false, true) => BigEndian::read_uint(chunk, width) as i64 - offset,
            };
            (value as f64 / scale) as f32
        })
        .collect();

    Ok(samples)
}

fn supported_width(format: &PcmFormat) -> Result<usize> {
    let width = usize::from(format.bytes_per_sample());
    if width > MAX_BYTES_PER_SAMPLE {
        return Err(PcmError::InvalidFormat(format!(
            "cannot convert {}-bit samples",
            format.bits_per_sample()
        )));
    }
    Ok(width)
}
