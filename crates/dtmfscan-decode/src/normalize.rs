//! Downmixing and peak normalization.

use crate::error::{DecodeError, Result};

/// Mono samples scaled so the largest magnitude is exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate_hz: u32,
}

impl SampleBuffer {
    /// Average interleaved frames into mono, then divide by the peak magnitude.
    pub fn from_interleaved(raw: &[f32], channels: usize, sample_rate_hz: u32) -> Result<Self> {
        let mono = downmix(raw, channels)?;
        Self::from_mono(mono, sample_rate_hz)
    }

    /// Normalize a buffer that is already single-channel.
    pub fn from_mono(mut samples: Vec<f32>, sample_rate_hz: u32) -> Result<Self> {
        if sample_rate_hz == 0 {
            return Err(DecodeError::analysis("sample rate must be non-zero"));
        }
        if let Some(idx) = samples.iter().position(|x| !x.is_finite()) {
            return Err(DecodeError::analysis(format!(
                "non-finite sample at index {idx}"
            )));
        }
        let peak = peak_abs(&samples);
        if peak == 0.0 {
            return Err(DecodeError::DegenerateInput);
        }
        for x in &mut samples {
            *x /= peak;
        }
        Ok(Self {
            samples,
            sample_rate_hz,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz as f64
    }
}

/// Average each interleaved frame of `channels` samples into one sample.
pub fn downmix(raw: &[f32], channels: usize) -> Result<Vec<f32>> {
    if channels == 0 {
        return Err(DecodeError::analysis("channel count must be non-zero"));
    }
    if raw.len() % channels != 0 {
        return Err(DecodeError::analysis(format!(
            "{} samples do not divide into {} channels",
            raw.len(),
            channels
        )));
    }
    if channels == 1 {
        return Ok(raw.to_vec());
    }
    Ok(raw
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}

/// Largest absolute sample value, 0.0 for an empty slice.
pub fn peak_abs(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, x| peak.max(x.abs()))
}
