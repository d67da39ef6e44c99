//! Error type shared by the format, header and recorder code

use thiserror::Error;

/// Errors produced while describing, sizing or serializing PCM audio
#[derive(Debug, Error)]
pub enum PcmError {
    /// The descriptor cannot describe any PCM stream (zero rate, zero
    /// channels, bit depth not a whole number of bytes, ...)
    #[error("invalid PCM format: {0}")]
    InvalidFormat(String),

    /// The data length does not fit the 32-bit RIFF size fields
    #[error("data length {length} exceeds the maximum of {max} bytes for a RIFF/WAVE container")]
    SizeOverflow { length: u64, max: u64 },

    /// A byte sequence is not a canonical 44-byte PCM header
    #[error("invalid WAV header: {0}")]
    InvalidHeader(String),

    /// The sink or source failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PcmError>;
