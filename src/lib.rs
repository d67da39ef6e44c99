//! Pcmwav - PCM recording format, duration and RIFF/WAVE header support
//!
//! The library is stateless apart from [`audio::WavRecorder`]: format
//! descriptors are immutable values and the header functions are safe to
//! call from any number of threads on independent sinks.

pub mod audio;
pub mod error;

pub use audio::{default_format, duration_seconds, write_header, PcmFormat};
pub use error::{PcmError, Result};
