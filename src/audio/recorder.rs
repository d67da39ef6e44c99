//! WAV file recording
//!
//! Accumulates raw PCM bytes in the recorder's format and writes them behind
//! a canonical 44-byte header. Defaults to 44.1kHz 16-bit signed mono.

use super::encode::{decode_samples, encode_samples};
use super::format::{default_format, duration_seconds, PcmFormat};
use super::header::{read_header, write_wav, MAX_DATA_LEN};
use crate::error::{PcmError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const FILE_PREFIX: &str = "recording_";

/// WAV file recorder
pub struct WavRecorder {
    format: PcmFormat,
    recordings_dir: PathBuf,
    data: Vec<u8>,
}

impl WavRecorder {
    /// Create a new WAV recorder using the canonical recording format
    pub fn new() -> Self {
        // Default recordings directory
        let recordings_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pcmwav")
            .join("recordings");

        Self {
            format: default_format(),
            recordings_dir,
            data: Vec::new(),
        }
    }

    /// Set the recordings directory
    pub fn with_recordings_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.recordings_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the recording format
    ///
    /// Saved files are tagged as WAVE linear PCM, so the format must encode
    /// samples the way WAVE readers decode them: little-endian, unsigned at
    /// 8 bits and signed above. Discards anything captured so far.
    pub fn with_format(mut self, format: PcmFormat) -> Result<Self> {
        if !format.is_wave_native() {
            return Err(PcmError::InvalidFormat(format!(
                "{} cannot be stored as WAVE PCM (needs little-endian, {} samples)",
                format,
                if format.bits_per_sample() > 8 { "signed" } else { "unsigned" }
            )));
        }
        self.format = format;
        self.data.clear();
        Ok(self)
    }

    pub fn format(&self) -> &PcmFormat {
        &self.format
    }

    /// Get the recordings directory
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Append normalized float samples, encoding them for the recorder's format
    pub fn push_samples(&mut self, samples: &[f32]) -> Result<()> {
        let bytes = encode_samples(&self.format, samples)?;
        self.push_bytes(&bytes)
    }

    /// Append already-encoded PCM bytes
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let new_len = (self.data.len() + bytes.len()) as u64;
        if new_len > MAX_DATA_LEN {
            return Err(PcmError::SizeOverflow {
                length: new_len,
                max: MAX_DATA_LEN,
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Captured data length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whole seconds captured so far
    pub fn duration_seconds(&self) -> u64 {
        duration_seconds(&self.format, self.data.len() as u64)
    }

    /// Drop everything captured so far
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Save the captured data to a WAV file, creating the recordings directory
    ///
    /// Returns the path to the saved file
    pub fn save(&self, filename: Option<&Path>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.recordings_dir)?;

        let path = match filename {
            Some(p) => p.to_path_buf(),
            None => self.generate_filename(),
        };

        let mut writer = BufWriter::new(File::create(&path)?);
        write_wav(&mut writer, &self.format, &self.data)?;
        writer.flush()?;

        info!(
            "Saved {} ({}, {} bytes, {}s)",
            path.display(),
            self.format,
            self.data.len(),
            self.duration_seconds()
        );

        Ok(path)
    }

    /// `recording_<UTC timestamp>_<short id>.wav` inside the recordings directory
    pub fn generate_filename(&self) -> PathBuf {
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.recordings_dir
            .join(format!("{}{}_{}.wav", FILE_PREFIX, stamp, &id[..8]))
    }

    /// Read a WAV file back as normalized samples plus the format its header describes
    ///
    /// Only the canonical 44-byte layout is accepted, so files written by
    /// [`WavRecorder::save`] always load; the samples stay interleaved per
    /// the returned format's channel count.
    pub fn load(path: impl AsRef<Path>) -> Result<(Vec<f32>, PcmFormat)> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let header = read_header(&mut reader)?;
        let format = header.format()?;

        let mut data = Vec::with_capacity(header.data_len as usize);
        reader
            .take(u64::from(header.data_len))
            .read_to_end(&mut data)?;
        if data.len() != header.data_len as usize {
            return Err(PcmError::InvalidHeader(format!(
                "data chunk declares {} bytes but {} holds {}",
                header.data_len,
                path.display(),
                data.len()
            )));
        }

        let samples = decode_samples(&format, &data)?;
        debug!(
            "Loaded {} samples ({}) from {}",
            samples.len(),
            format,
            path.display()
        );

        Ok((samples, format))
    }

    /// WAV files in the recordings directory, newest first
    ///
    /// A missing directory has no recordings.
    pub fn list_recordings(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.recordings_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut recordings: Vec<(Option<SystemTime>, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_wav(path))
            .map(|path| (path.metadata().and_then(|m| m.modified()).ok(), path))
            .collect();

        recordings.sort_by(|a, b| b.cmp(a));

        Ok(recordings.into_iter().map(|(_, path)| path).collect())
    }
}

impl Default for WavRecorder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::header::HEADER_LEN;

    #[test]
    fn test_duration_calculation() {
        let mut recorder = WavRecorder::new();
        recorder.push_bytes(&vec![0u8; 44100 * 2]).unwrap();
        assert_eq!(recorder.duration_seconds(), 1);
        recorder.push_bytes(&vec![0u8; 44100]).unwrap();
        assert_eq!(recorder.duration_seconds(), 1);
        recorder.push_bytes(&vec![0u8; 44100]).unwrap();
        assert_eq!(recorder.duration_seconds(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new().with_recordings_dir(dir.path());
        recorder.push_samples(&[0.0, 0.5, -0.5, 1.0]).unwrap();
        assert_eq!(recorder.len(), 8);

        let path = recorder.save(None).unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), (HEADER_LEN + 8) as u64);

        let header = read_header(&mut File::open(&path).unwrap()).unwrap();
        assert_eq!(header.data_len, 8);
        assert_eq!(header.sample_rate, 44100);

        let (samples, format) = WavRecorder::load(&path).unwrap();
        assert_eq!(format, default_format());
        assert_eq!(samples.len(), 4);
        assert!((samples[1] - 0.5).abs() < 1e-3);
        assert!((samples[2] + 0.5).abs() < 1e-3);
        assert!((samples[3] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_8_bit_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let format = PcmFormat::new(8000, 8, 1, false, false).unwrap();
        let mut recorder = WavRecorder::new()
            .with_recordings_dir(dir.path())
            .with_format(format)
            .unwrap();
        recorder.push_samples(&[0.5, -0.5]).unwrap();
        let path = recorder.save(None).unwrap();

        let (samples, loaded) = WavRecorder::load(&path).unwrap();
        assert_eq!(loaded, format);
        assert_eq!(samples, vec![0.5, -0.5]);

        // A standard reader sees the same values
        let mut reader = hound::WavReader::open(&path).unwrap();
        let decoded: Vec<i8> = reader.samples::<i8>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![64, -64]);
    }

    #[test]
    fn test_stereo_load_keeps_channel_count() {
        let dir = tempfile::tempdir().unwrap();
        let stereo = default_format().with_channels(2).unwrap();
        let mut recorder = WavRecorder::new()
            .with_recordings_dir(dir.path())
            .with_format(stereo)
            .unwrap();
        recorder.push_samples(&[0.25, -0.25, 0.5, -0.5]).unwrap();
        let path = recorder.save(None).unwrap();

        let (samples, format) = WavRecorder::load(&path).unwrap();
        assert_eq!(format.channel_count(), 2);
        assert_eq!(samples.len(), 4);
    }

    #[test]
    fn test_non_wave_encodings_rejected() {
        let signed_8_bit = default_format().with_bits_per_sample(8).unwrap();
        let big_endian = PcmFormat::new(44100, 16, 1, true, true).unwrap();
        let unsigned_16_bit = PcmFormat::new(44100, 16, 1, false, false).unwrap();
        for format in [signed_8_bit, big_endian, unsigned_16_bit] {
            assert!(matches!(
                WavRecorder::new().with_format(format),
                Err(PcmError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_load_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new().with_recordings_dir(dir.path());
        recorder.push_bytes(&[0u8; 16]).unwrap();
        let path = recorder.save(None).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..HEADER_LEN + 6]).unwrap();
        assert!(matches!(
            WavRecorder::load(&path),
            Err(PcmError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_with_format_resets_data() {
        let mut recorder = WavRecorder::new();
        recorder.push_bytes(&[1, 2]).unwrap();
        let stereo = default_format().with_channels(2).unwrap();
        let recorder = recorder.with_format(stereo).unwrap();
        assert!(recorder.is_empty());
        assert_eq!(recorder.format().channel_count(), 2);
    }

    #[test]
    fn test_list_recordings_filters_wav() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = WavRecorder::new().with_recordings_dir(dir.path());
        recorder.save(Some(&dir.path().join("a.wav"))).unwrap();
        recorder.save(Some(&dir.path().join("b.WAV"))).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let recordings = recorder.list_recordings().unwrap();
        assert_eq!(recordings.len(), 2);
        assert!(recordings.iter().all(|p| is_wav(p)));
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let recorder = WavRecorder::new().with_recordings_dir(&missing);
        assert!(recorder.list_recordings().unwrap().is_empty());
        assert!(!missing.exists());
    }

    #[test]
    fn test_generated_filename_shape() {
        let recorder = WavRecorder::new().with_recordings_dir("/tmp/rec");
        let name = recorder.generate_filename();
        let file = name.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file.starts_with(FILE_PREFIX));
        assert!(file.ends_with(".wav"));
        // recording_YYYYmmdd_HHMMSS_xxxxxxxx.wav
        assert_eq!(file.len(), FILE_PREFIX.len() + 15 + 1 + 8 + 4);
        assert_eq!(name.parent().unwrap(), Path::new("/tmp/rec"));
    }
}
