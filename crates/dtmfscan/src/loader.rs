use std::path::Path;

use crate::recording;

/// Interleaved samples as read from a file, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub sample_rate_hz: u32,
    pub channels: usize,
    pub samples: Vec<f32>,
}

impl Waveform {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Ogg error: {0}")]
    Ogg(#[from] ogg::reading::OggReadError),

    #[error("Opus error: {0}")]
    Opus(#[from] opus::Error),

    #[error("unsupported audio file: {0}")]
    Unsupported(String),
}

/// Load a waveform, picking the container from the file extension.
pub fn load_waveform(path: &Path) -> Result<Waveform, AudioError> {
    match extension(path).as_deref() {
        Some("wav") => read_wav(path),
        Some("ogg") | Some("opus") => recording::read_recording(path),
        _ => Err(AudioError::Unsupported(format!(
            "{} (expected .wav, .ogg or .opus)",
            path.display()
        ))),
    }
}

/// Write mono samples, picking the container from the file extension.
pub fn save_waveform(path: &Path, sample_rate_hz: u32, samples: &[f32]) -> Result<(), AudioError> {
    match extension(path).as_deref() {
        Some("wav") => write_wav(path, sample_rate_hz, samples),
        Some("ogg") | Some("opus") => recording::write_recording(path, sample_rate_hz, samples),
        _ => Err(AudioError::Unsupported(format!(
            "{} (expected .wav, .ogg or .opus)",
            path.display()
        ))),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn read_wav(path: &Path) -> Result<Waveform, AudioError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    // Scale does not matter; the decoder normalizes by the peak.
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32))
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(Waveform {
        sample_rate_hz: spec.sample_rate,
        channels: spec.channels as usize,
        samples,
    })
}

/// Write mono 16-bit PCM, clipping to [-1.0, 1.0].
fn write_wav(path: &Path, sample_rate_hz: u32, samples: &[f32]) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &x in samples {
        writer.write_sample((x.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_round_trip_keeps_rate_and_length() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tone.wav");
        let samples: Vec<f32> = (0..800).map(|n| ((n % 40) as f32 / 20.0) - 1.0).collect();
        save_waveform(&path, 8000, &samples).expect("write");

        let loaded = load_waveform(&path).expect("read");
        assert_eq!(loaded.sample_rate_hz, 8000);
        assert_eq!(loaded.channels, 1);
        assert_eq!(loaded.frames(), 800);
        assert_eq!(loaded.samples[20], 0.0);
        assert_eq!(loaded.samples[0], -(i16::MAX as f32));
    }

    #[test]
    fn stereo_wav_reports_two_channels() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stereo.WAV");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("create");
        for v in [1i32, -1, 1000, -1000] {
            writer.write_sample(v).expect("sample");
        }
        writer.finalize().expect("finalize");

        let loaded = load_waveform(&path).expect("read");
        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.frames(), 2);
        assert_eq!(loaded.samples, vec![1.0, -1.0, 1000.0, -1000.0]);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let result = load_waveform(Path::new("dialing1.mp3"));
        assert!(matches!(result, Err(AudioError::Unsupported(_))));
    }
}
