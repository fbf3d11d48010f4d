//! DTMF test-signal synthesis.

pub mod encode;
pub mod modulator;
pub mod noise;
mod sine_oscillator;

pub use encode::{encode_dial, DialSymbol, EncodeError};
pub use modulator::DialModulator;
pub use noise::add_band_limited_noise;

/// Shape of a synthesized dial sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub sample_rate_hz: u32,
    pub tone_secs: f32,
    pub gap_secs: f32,
    /// Peak amplitude of each carrier.
    pub level: f32,
    /// Standard deviation of added noise; 0 disables it.
    pub noise_level: f32,
    pub noise_seed: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 8000,
            tone_secs: 0.1,
            gap_secs: 0.05,
            level: 0.25,
            noise_level: 0.0,
            noise_seed: 0x1234_5678,
        }
    }
}

/// Render `dial` as mono samples.
pub fn synthesize(dial: &str, config: &SynthConfig) -> Result<Vec<f32>, EncodeError> {
    let symbols = encode_dial(dial)?;
    let sample_rate_hz = config.sample_rate_hz as f32;
    let modulator = DialModulator::new(sample_rate_hz, config.tone_secs, config.gap_secs, config.level);
    let mut samples = Vec::new();
    modulator.modulate(&symbols, &mut samples);
    if config.noise_level > 0.0 {
        let cutoff_hz = sample_rate_hz * 0.45;
        add_band_limited_noise(
            &mut samples,
            config.noise_level,
            sample_rate_hz,
            cutoff_hz,
            config.noise_seed,
        );
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtmfscan_decode::Decoder;

    #[test]
    fn synthesized_digits_decode_back() {
        let samples = synthesize("0123456789", &SynthConfig::default()).expect("synth");
        assert_eq!(samples.len(), 10 * 1200);
        let decoded = Decoder::default().decode(&samples, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "0123456789");
    }

    #[test]
    fn light_noise_does_not_change_the_digits() {
        let config = SynthConfig {
            noise_level: 0.002,
            ..SynthConfig::default()
        };
        let samples = synthesize("8675309", &config).expect("synth");
        let decoded = Decoder::default().decode(&samples, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "8675309");
    }

    #[test]
    fn bad_dial_string_is_an_error() {
        assert!(synthesize("12#", &SynthConfig::default()).is_err());
    }
}
