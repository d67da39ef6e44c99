//! PCM recording format descriptor
//!
//! A `PcmFormat` is an immutable, validated value: once constructed, every
//! derived size (block align, byte rate) is non-zero and fits the fields of a
//! RIFF/WAVE `fmt ` chunk. The canonical recording format is 44.1kHz 16-bit
//! signed little-endian mono.

use crate::error::{PcmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Canonical recording sample rate
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Canonical recording bit depth
pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;
/// Canonical recording channel count (mono)
pub const DEFAULT_CHANNELS: u16 = 1;

/// Describes how raw PCM bytes map to sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PcmFormatFields", into = "PcmFormatFields")]
pub struct PcmFormat {
    sample_rate_hz: u32,
    bits_per_sample: u16,
    channel_count: u16,
    signed: bool,
    big_endian: bool,
}

/// Unvalidated wire shape of a `PcmFormat`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PcmFormatFields {
    sample_rate_hz: u32,
    bits_per_sample: u16,
    channel_count: u16,
    signed: bool,
    big_endian: bool,
}

impl TryFrom<PcmFormatFields> for PcmFormat {
    type Error = PcmError;

    fn try_from(f: PcmFormatFields) -> Result<Self> {
        PcmFormat::new(
            f.sample_rate_hz,
            f.bits_per_sample,
            f.channel_count,
            f.signed,
            f.big_endian,
        )
    }
}

impl From<PcmFormat> for PcmFormatFields {
    fn from(f: PcmFormat) -> Self {
        Self {
            sample_rate_hz: f.sample_rate_hz,
            bits_per_sample: f.bits_per_sample,
            channel_count: f.channel_count,
            signed: f.signed,
            big_endian: f.big_endian,
        }
    }
}

/// Get the canonical recording format (44100 Hz, 16-bit, mono, signed, little-endian)
pub fn default_format() -> PcmFormat {
    PcmFormat {
        sample_rate_hz: DEFAULT_SAMPLE_RATE,
        bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
        channel_count: DEFAULT_CHANNELS,
        signed: true,
        big_endian: false,
    }
}

/// Whole seconds of audio held in `data_length_bytes` bytes of `format` data
///
/// Partial seconds are truncated, so anything shorter than one second is `0`.
pub fn duration_seconds(format: &PcmFormat, data_length_bytes: u64) -> u64 {
    data_length_bytes / u64::from(format.byte_rate())
}

impl PcmFormat {
    /// Create a validated format descriptor
    ///
    /// Fails with [`PcmError::InvalidFormat`] when the rate, bit depth or
    /// channel count is zero, when the bit depth is not a whole number of
    /// bytes, or when the derived block align / byte rate would not fit the
    /// 16/32-bit header fields.
    pub fn new(
        sample_rate_hz: u32,
        bits_per_sample: u16,
        channel_count: u16,
        signed: bool,
        big_endian: bool,
    ) -> Result<Self> {
        if sample_rate_hz == 0 {
            return Err(PcmError::InvalidFormat(
                "sample rate must be positive".to_string(),
            ));
        }
        if channel_count == 0 {
            return Err(PcmError::InvalidFormat(
                "channel count must be positive".to_string(),
            ));
        }
        if bits_per_sample == 0 || bits_per_sample % 8 != 0 {
            return Err(PcmError::InvalidFormat(format!(
                "bits per sample must be a positive multiple of 8, got {}",
                bits_per_sample
            )));
        }

        let block_align = u32::from(channel_count) * u32::from(bits_per_sample / 8);
        if block_align > u32::from(u16::MAX) {
            return Err(PcmError::InvalidFormat(format!(
                "block align {} does not fit a 16-bit field",
                block_align
            )));
        }

        let byte_rate = u64::from(sample_rate_hz) * u64::from(block_align);
        if byte_rate > u64::from(u32::MAX) {
            return Err(PcmError::InvalidFormat(format!(
                "byte rate {} does not fit a 32-bit field",
                byte_rate
            )));
        }

        Ok(Self {
            sample_rate_hz,
            bits_per_sample,
            channel_count,
            signed,
            big_endian,
        })
    }

    /// Same format at a different sample rate
    pub fn with_sample_rate(self, rate: u32) -> Result<Self> {
        Self::new(
            rate,
            self.bits_per_sample,
            self.channel_count,
            self.signed,
            self.big_endian,
        )
    }

    /// Same format with a different bit depth
    pub fn with_bits_per_sample(self, bits: u16) -> Result<Self> {
        Self::new(
            self.sample_rate_hz,
            bits,
            self.channel_count,
            self.signed,
            self.big_endian,
        )
    }

    /// Same format with a different channel count
    pub fn with_channels(self, channels: u16) -> Result<Self> {
        Self::new(
            self.sample_rate_hz,
            self.bits_per_sample,
            channels,
            self.signed,
            self.big_endian,
        )
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Whether samples are signed integers
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Byte order of multi-byte samples in the data block (not the header)
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// Whether sample data in this format is what a WAVE reader expects
    /// behind PCM code 1: little-endian, unsigned at 8 bits, signed above
    pub fn is_wave_native(&self) -> bool {
        !self.big_endian && self.signed == (self.bits_per_sample > 8)
    }

    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per frame (one sample for every channel)
    pub fn block_align(&self) -> u16 {
        self.channel_count * self.bytes_per_sample()
    }

    /// Bytes of PCM data per second of audio
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate_hz * u32::from(self.block_align())
    }

    /// Exact playback time of `data_length_bytes` bytes, including the partial second
    pub fn duration(&self, data_length_bytes: u64) -> Duration {
        let rate = u64::from(self.byte_rate());
        let secs = data_length_bytes / rate;
        let rem = data_length_bytes % rate;
        let nanos = (u128::from(rem) * 1_000_000_000 / u128::from(rate)) as u32;
        Duration::new(secs, nanos)
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        default_format()
    }
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {}-bit {} {}, ",
            self.sample_rate_hz,
            self.bits_per_sample,
            if self.signed { "signed" } else { "unsigned" },
            if self.big_endian { "BE" } else { "LE" },
        )?;
        match self.channel_count {
            1 => write!(f, "mono"),
            2 => write!(f, "stereo"),
            n => write!(f, "{} channels", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let format = default_format();
        assert_eq!(format.sample_rate_hz(), 44100);
        assert_eq!(format.bits_per_sample(), 16);
        assert_eq!(format.channel_count(), 1);
        assert!(format.is_signed());
        assert!(!format.is_big_endian());
        assert_eq!(format, default_format());
        assert_eq!(format, PcmFormat::default());
    }

    #[test]
    fn test_duration_calculation() {
        let format = default_format();
        assert_eq!(duration_seconds(&format, 44100 * 2), 1);
        assert_eq!(duration_seconds(&format, 44100 * 2 * 2), 2);
        assert_eq!(duration_seconds(&format, (44100 / 10) * 2), 0);
        assert_eq!(duration_seconds(&format, 0), 0);
    }

    #[test]
    fn test_duration_is_monotonic() {
        let format = PcmFormat::new(8000, 8, 2, false, false).unwrap();
        let mut last = 0;
        for len in (0..100_000u64).step_by(997) {
            let secs = duration_seconds(&format, len);
            assert!(secs >= last);
            last = secs;
        }
    }

    #[test]
    fn test_exact_duration() {
        let format = default_format();
        assert_eq!(format.duration(44100 * 3), Duration::from_secs(3));
        assert_eq!(format.duration(44100), Duration::from_millis(500));
    }

    #[test]
    fn test_derived_sizes() {
        let format = PcmFormat::new(48000, 24, 2, true, false).unwrap();
        assert_eq!(format.bytes_per_sample(), 3);
        assert_eq!(format.block_align(), 6);
        assert_eq!(format.byte_rate(), 288_000);
    }

    #[test]
    fn test_invalid_formats_rejected() {
        for (rate, bits, channels) in [(44100, 16, 0), (0, 16, 1), (44100, 0, 1), (44100, 12, 1)] {
            let result = PcmFormat::new(rate, bits, channels, true, false);
            assert!(
                matches!(result, Err(PcmError::InvalidFormat(_))),
                "{} {} {} should be rejected",
                rate,
                bits,
                channels
            );
        }
    }

    #[test]
    fn test_oversized_derived_fields_rejected() {
        // 32-bit samples across 16384 channels overflow the 16-bit block align
        assert!(PcmFormat::new(44100, 32, 16384, true, false).is_err());
        // 4 GHz stereo 32-bit overflows the 32-bit byte rate
        assert!(PcmFormat::new(u32::MAX, 32, 2, true, false).is_err());
    }

    #[test]
    fn test_with_helpers_revalidate() {
        let stereo = default_format().with_channels(2).unwrap();
        assert_eq!(stereo.channel_count(), 2);
        assert_eq!(default_format().channel_count(), 1);
        assert!(default_format().with_channels(0).is_err());
        assert!(default_format().with_bits_per_sample(7).is_err());
        assert_eq!(
            default_format().with_sample_rate(16000).unwrap().byte_rate(),
            32000
        );
    }

    #[test]
    fn test_wave_native_encoding() {
        assert!(default_format().is_wave_native());
        assert!(PcmFormat::new(8000, 8, 1, false, false).unwrap().is_wave_native());
        // 8-bit WAVE data is unsigned
        assert!(!default_format().with_bits_per_sample(8).unwrap().is_wave_native());
        assert!(!PcmFormat::new(44100, 16, 1, true, true).unwrap().is_wave_native());
        assert!(!PcmFormat::new(44100, 16, 1, false, false).unwrap().is_wave_native());
    }

    #[test]
    fn test_display() {
        assert_eq!(default_format().to_string(), "44100 Hz, 16-bit signed LE, mono");
        let format = PcmFormat::new(8000, 8, 2, false, true).unwrap();
        assert_eq!(format.to_string(), "8000 Hz, 8-bit unsigned BE, stereo");
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&default_format()).unwrap();
        let parsed: PcmFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, default_format());

        let bad = r#"{"sample_rate_hz":44100,"bits_per_sample":16,"channel_count":0,"signed":true,"big_endian":false}"#;
        assert!(serde_json::from_str::<PcmFormat>(bad).is_err());
    }
}
