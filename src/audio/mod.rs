//! PCM audio formatting
//!
//! This module provides:
//! - The canonical recording format descriptor (44.1kHz 16-bit signed mono)
//! - Duration math over raw PCM byte counts
//! - Canonical 44-byte RIFF/WAVE header serialization and decoding
//! - Float sample encoding and WAV file recording

mod encode;
mod format;
mod header;
mod recorder;

pub use encode::{decode_samples, encode_samples};
pub use format::{default_format, duration_seconds, PcmFormat};
pub use header::{
    build_header, read_header, write_header, write_wav, WavHeader, HEADER_LEN, MAX_DATA_LEN,
};
pub use recorder::WavRecorder;
