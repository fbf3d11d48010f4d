use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};

pub const DEFAULT_WINDOW_LEN: usize = 205;
pub const DEFAULT_SILENCE_THRESHOLD: f32 = 0.025;
pub const DEFAULT_MIN_TONE_DURATION_SECS: f64 = 0.04;
pub const DEFAULT_FREQUENCY_TOLERANCE_HZ: f32 = 15.0;
pub const DEFAULT_FILTER_HALF_BANDWIDTH_HZ: f64 = 20.0;
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Immutable tuning for one decoder.
///
/// Every field has a default matching the standard DTMF constants, so a TOML file
/// only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Samples per analysis window.
    pub window_len: usize,
    /// Windows whose peak normalized amplitude does not exceed this are silence.
    pub silence_threshold: f32,
    /// A run is kept only if `windows * window_len / sample_rate` reaches this.
    pub min_tone_duration_secs: f64,
    /// Allowed distance between a detected carrier and the keypad's nominal one.
    pub frequency_tolerance_hz: f32,
    /// Each bandpass spans `center ± filter_half_bandwidth_hz`.
    pub filter_half_bandwidth_hz: f64,
    /// Order of the Butterworth lowpass prototype.
    pub filter_order: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            min_tone_duration_secs: DEFAULT_MIN_TONE_DURATION_SECS,
            frequency_tolerance_hz: DEFAULT_FREQUENCY_TOLERANCE_HZ,
            filter_half_bandwidth_hz: DEFAULT_FILTER_HALF_BANDWIDTH_HZ,
            filter_order: DEFAULT_FILTER_ORDER,
        }
    }
}

impl DecoderConfig {
    /// Parse a (possibly partial) TOML document and validate the result.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| DecodeError::invalid_config(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_len < 4 {
            return Err(DecodeError::invalid_config(format!(
                "window_len must be at least 4 samples, got {}",
                self.window_len
            )));
        }
        if !self.silence_threshold.is_finite() || self.silence_threshold < 0.0 {
            return Err(DecodeError::invalid_config(
                "silence_threshold must be a finite, non-negative amplitude",
            ));
        }
        if !self.min_tone_duration_secs.is_finite() || self.min_tone_duration_secs < 0.0 {
            return Err(DecodeError::invalid_config(
                "min_tone_duration_secs must be finite and non-negative",
            ));
        }
        if !self.frequency_tolerance_hz.is_finite() || self.frequency_tolerance_hz < 0.0 {
            return Err(DecodeError::invalid_config(
                "frequency_tolerance_hz must be finite and non-negative",
            ));
        }
        if !self.filter_half_bandwidth_hz.is_finite() || self.filter_half_bandwidth_hz <= 0.0 {
            return Err(DecodeError::invalid_config(
                "filter_half_bandwidth_hz must be finite and positive",
            ));
        }
        if self.filter_order == 0 {
            return Err(DecodeError::invalid_config("filter_order must be at least 1"));
        }
        Ok(())
    }

    /// Scan advance after a silent or toneless window.
    pub fn quarter_step(&self) -> usize {
        self.window_len / 4
    }

    /// Scan advance after a window that resolved to a digit.
    pub fn half_step(&self) -> usize {
        self.window_len / 2
    }
}
