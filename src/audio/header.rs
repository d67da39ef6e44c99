//! Canonical 44-byte RIFF/WAVE header for linear PCM
//!
//! Layout (all integer fields little-endian, independent of the sample byte
//! order of the data that follows):
//!
//! Offset | Size | Field
//! -----: | ---: | -------------------------------------------
//!      0 |    4 | "RIFF"
//!      4 |    4 | 36 + data length
//!      8 |    4 | "WAVE"
//!     12 |    4 | "fmt "
//!     16 |    4 | 16
//!     20 |    2 | 1 (linear PCM)
//!     22 |    2 | channel count
//!     24 |    4 | sample rate
//!     28 |    4 | byte rate
//!     32 |    2 | block align
//!     34 |    2 | bits per sample
//!     36 |    4 | "data"
//!     40 |    4 | data length

use super::format::PcmFormat;
use crate::error::{PcmError, Result};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};
use serde::Serialize;
use std::io::{Read, Write};

/// Size of the serialized header in bytes
pub const HEADER_LEN: usize = 44;

/// Largest data length whose RIFF chunk size (`36 + len`) still fits 32 bits
pub const MAX_DATA_LEN: u64 = u32::MAX as u64 - 36;

/// `fmt ` sub-chunk size for plain PCM
const FMT_CHUNK_LEN: u32 = 16;

/// WAVE format code for linear PCM
const FORMAT_PCM: u16 = 1;

/// Build the header for `data_length_bytes` bytes of `format` PCM data
///
/// Pure: no I/O, the same arguments always give the same bytes.
pub fn build_header(format: &PcmFormat, data_length_bytes: u64) -> Result<[u8; HEADER_LEN]> {
    if data_length_bytes > MAX_DATA_LEN {
        return Err(PcmError::SizeOverflow {
            length: data_length_bytes,
            max: MAX_DATA_LEN,
        });
    }
    let data_len = data_length_bytes as u32;

    let mut header = [0u8; HEADER_LEN];

    // RIFF chunk
    header[0..4].copy_from_slice(b"RIFF");
    LittleEndian::write_u32(&mut header[4..8], 36 + data_len);
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    LittleEndian::write_u32(&mut header[16..20], FMT_CHUNK_LEN);
    LittleEndian::write_u16(&mut header[20..22], FORMAT_PCM);
    LittleEndian::write_u16(&mut header[22..24], format.channel_count());
    LittleEndian::write_u32(&mut header[24..28], format.sample_rate_hz());
    LittleEndian::write_u32(&mut header[28..32], format.byte_rate());
    LittleEndian::write_u16(&mut header[32..34], format.block_align());
    LittleEndian::write_u16(&mut header[34..36], format.bits_per_sample());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    LittleEndian::write_u32(&mut header[40..44], data_len);

    Ok(header)
}

/// Write the header for `data_length_bytes` bytes of `format` PCM data to `sink`
///
/// The header is built in memory first, so a size overflow is reported
/// before anything reaches the sink.
pub fn write_header<W: Write>(
    sink: &mut W,
    data_length_bytes: u64,
    format: &PcmFormat,
) -> Result<()> {
    let header = build_header(format, data_length_bytes)?;
    sink.write_all(&header)?;
    trace!(
        "Wrote {}-byte WAV header for {} data bytes ({})",
        HEADER_LEN,
        data_length_bytes,
        format
    );
    Ok(())
}

/// Write a complete WAV stream: header followed by `data`
pub fn write_wav<W: Write>(sink: &mut W, format: &PcmFormat, data: &[u8]) -> Result<()> {
    write_header(sink, data.len() as u64, format)?;
    sink.write_all(data)?;
    debug!("Wrote WAV stream with {} data bytes ({})", data.len(), format);
    Ok(())
}

/// Fields decoded from a canonical 44-byte PCM header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WavHeader {
    /// RIFF chunk size (`36 + data_len` for the canonical layout)
    pub riff_len: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Length of the data sub-chunk in bytes
    pub data_len: u32,
}

impl WavHeader {
    /// Decode the canonical header from the first 44 bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(PcmError::InvalidHeader(format!(
                "need {} bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        expect_tag(bytes, 0, b"RIFF")?;
        expect_tag(bytes, 8, b"WAVE")?;
        expect_tag(bytes, 12, b"fmt ")?;
        expect_tag(bytes, 36, b"data")?;

        let fmt_len = LittleEndian::read_u32(&bytes[16..20]);
        if fmt_len != FMT_CHUNK_LEN {
            return Err(PcmError::InvalidHeader(format!(
                "fmt chunk is {} bytes, expected {}",
                fmt_len, FMT_CHUNK_LEN
            )));
        }

        let audio_format = LittleEndian::read_u16(&bytes[20..22]);
        if audio_format != FORMAT_PCM {
            return Err(PcmError::InvalidHeader(format!(
                "audio format code {} is not linear PCM",
                audio_format
            )));
        }

        Ok(Self {
            riff_len: LittleEndian::read_u32(&bytes[4..8]),
            channels: LittleEndian::read_u16(&bytes[22..24]),
            sample_rate: LittleEndian::read_u32(&bytes[24..28]),
            byte_rate: LittleEndian::read_u32(&bytes[28..32]),
            block_align: LittleEndian::read_u16(&bytes[32..34]),
            bits_per_sample: LittleEndian::read_u16(&bytes[34..36]),
            data_len: LittleEndian::read_u32(&bytes[40..44]),
        })
    }

    /// Descriptor described by this header
    ///
    /// The header cannot carry signedness or sample byte order, so these
    /// follow the WAVE convention: unsigned for 8-bit, signed otherwise,
    /// little-endian.
    pub fn format(&self) -> Result<PcmFormat> {
        PcmFormat::new(
            self.sample_rate,
            self.bits_per_sample,
            self.channels,
            self.bits_per_sample > 8,
            false,
        )
    }
}

/// Read and decode a canonical header from the start of `source`
pub fn read_header<R: Read>(source: &mut R) -> Result<WavHeader> {
    let mut bytes = [0u8; HEADER_LEN];
    source.read_exact(&mut bytes)?;
    WavHeader::parse(&bytes)
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> Result<()> {
    let found = &bytes[offset..offset + 4];
    if found != tag {
        return Err(PcmError::InvalidHeader(format!(
            "expected {:?} at offset {}, found {:?}",
            String::from_utf8_lossy(tag),
            offset,
            String::from_utf8_lossy(found)
        )));
    }
    Ok(())
}
