use crate::config::DecoderConfig;
use crate::detect::DtmfScanner;
use crate::error::Result;
use crate::normalize::SampleBuffer;
use crate::sequence::DigitSequence;

/// Shortest window in which the bandpass filters reliably reach a tone.
const MIN_RELIABLE_WINDOW_SECS: f64 = 0.008;

/// Batch entry point: normalize a whole waveform and scan it once.
///
/// A decoder holds only its configuration, so one value can serve any number
/// of inputs, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode interleaved samples with `channels` channels.
    pub fn decode(&self, raw: &[f32], channels: usize, sample_rate_hz: u32) -> Result<DigitSequence> {
        let buffer = SampleBuffer::from_interleaved(raw, channels, sample_rate_hz)?;
        self.decode_buffer(&buffer)
    }

    /// Decode an already normalized buffer.
    pub fn decode_buffer(&self, buffer: &SampleBuffer) -> Result<DigitSequence> {
        tracing::debug!(
            samples = buffer.len(),
            sample_rate_hz = buffer.sample_rate_hz(),
            duration_secs = buffer.duration_secs(),
            "scanning buffer"
        );
        let window_secs = self.config.window_len as f64 / buffer.sample_rate_hz() as f64;
        if window_secs < MIN_RELIABLE_WINDOW_SECS {
            tracing::warn!(
                window_len = self.config.window_len,
                sample_rate_hz = buffer.sample_rate_hz(),
                "analysis window spans under 8 ms; tones are unlikely to register"
            );
        }
        let mut scanner = DtmfScanner::builder(buffer.sample_rate_hz())
            .config(self.config.clone())
            .build()?;
        let mut sequence: DigitSequence = scanner.push(buffer.samples())?.into_iter().collect();
        sequence.extend(scanner.finish());
        Ok(sequence)
    }

    /// Like [`Decoder::decode`], but a failure is logged against `input_id`
    /// and turned into an empty sequence.
    pub fn decode_or_empty(
        &self,
        input_id: &str,
        raw: &[f32],
        channels: usize,
        sample_rate_hz: u32,
    ) -> DigitSequence {
        match self.decode(raw, channels, sample_rate_hz) {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::warn!(input = input_id, error = %err, "decode failed, no digits");
                DigitSequence::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::tests::{dual_tone, dual_tone_from};
    use crate::error::DecodeError;

    fn silence(len: usize) -> Vec<f32> {
        vec![0.0; len]
    }

    /// The 941 + 1209 Hz pair, which the keypad table does not decode.
    fn undecodable_pair(first: usize, len: usize) -> Vec<f32> {
        let tau = std::f64::consts::TAU;
        (first..first + len)
            .map(|n| {
                let t = n as f64 / 8000.0;
                (0.25 * ((tau * 941.0 * t).sin() + (tau * 1209.0 * t).sin())) as f32
            })
            .collect()
    }

    #[test]
    fn every_digit_decodes_from_fifty_milliseconds() {
        let decoder = Decoder::default();
        for digit in "0123456789".chars() {
            let decoded = decoder.decode(&dual_tone(digit, 400, 8000), 1, 8000).expect("decode");
            assert_eq!(decoded.to_string(), digit.to_string());
        }
    }

    #[test]
    fn five_then_two() {
        let mut signal = dual_tone('5', 800, 8000);
        signal.extend(silence(400));
        signal.extend(dual_tone('2', 800, 8000));

        let decoded = Decoder::default().decode(&signal, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "52");

        let events = decoded.events();
        assert_eq!(events[0].start_sample, 0);
        assert!(events[0].windows >= 2);
        assert!(events[0].end_sample < 1200);
        assert!(events[1].start_sample >= 1000);
    }

    #[test]
    fn stereo_input_is_downmixed() {
        let mono = dual_tone('6', 800, 8000);
        let stereo: Vec<f32> = mono.iter().flat_map(|&x| [x, x * 0.5]).collect();
        let decoded = Decoder::default().decode(&stereo, 2, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "6");
    }

    #[test]
    fn short_blip_is_dropped() {
        let mut signal = dual_tone('9', 100, 8000);
        signal.extend(silence(800));
        signal.extend(dual_tone('2', 800, 8000));
        let decoded = Decoder::default().decode(&signal, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "2");
    }

    #[test]
    fn brief_silence_does_not_split_a_tone() {
        let mut signal = dual_tone('5', 800, 8000);
        signal.extend(silence(100));
        signal.extend(dual_tone_from('5', 900, 800, 8000));
        let decoded = Decoder::default().decode(&signal, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "5");
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn same_key_across_a_silent_gap_is_one_digit() {
        let mut signal = dual_tone('5', 800, 8000);
        signal.extend(silence(400));
        signal.extend(dual_tone_from('5', 1200, 800, 8000));
        let decoded = Decoder::default().decode(&signal, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "5");
        assert_eq!(decoded.len(), 1);
        assert!(decoded.events()[0].end_sample > 1200);
    }

    #[test]
    fn toneless_stretch_does_not_end_a_run() {
        let mut same = dual_tone('5', 800, 8000);
        same.extend(undecodable_pair(800, 800));
        same.extend(dual_tone_from('5', 1600, 800, 8000));
        let decoded = Decoder::default().decode(&same, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "5");

        let mut different = dual_tone('5', 800, 8000);
        different.extend(undecodable_pair(800, 800));
        different.extend(dual_tone_from('2', 1600, 800, 8000));
        let decoded = Decoder::default().decode(&different, 1, 8000).expect("decode");
        assert_eq!(decoded.to_string(), "52");
    }

    #[test]
    fn unbroken_bottom_corner_keys_decode_to_nothing() {
        let signal: Vec<f32> = (0..800)
            .map(|n| {
                let t = n as f64 / 8000.0;
                let tau = std::f64::consts::TAU;
                ((tau * 941.0 * t).sin() + (tau * 1477.0 * t).sin()) as f32
            })
            .collect();
        let decoded = Decoder::default().decode(&signal, 1, 8000).expect("decode");
        assert!(decoded.is_empty());
    }

    #[test]
    fn silent_buffer_is_degenerate_not_a_crash() {
        let decoder = Decoder::default();
        assert_eq!(
            decoder.decode(&silence(8000), 1, 8000),
            Err(DecodeError::DegenerateInput)
        );
        assert!(decoder.decode_or_empty("silence.wav", &silence(8000), 1, 8000).is_empty());
        assert!(decoder.decode_or_empty("empty.wav", &[], 1, 8000).is_empty());
    }

    #[test]
    fn unsupported_sample_rate_is_an_analysis_failure() {
        let decoder = Decoder::default();
        let result = decoder.decode(&dual_tone('1', 800, 8000), 1, 2000);
        assert!(matches!(result, Err(DecodeError::AnalysisFailure(_))));
        assert!(decoder
            .decode_or_empty("low-rate.wav", &dual_tone('1', 800, 8000), 1, 2000)
            .is_empty());
    }

    #[test]
    fn shorter_than_one_window_is_empty() {
        let decoded = Decoder::default().decode(&dual_tone('1', 150, 8000), 1, 8000).expect("decode");
        assert!(decoded.is_empty());
    }

    #[test]
    fn decoding_twice_gives_the_same_answer() {
        let mut signal = dual_tone('8', 800, 8000);
        signal.extend(silence(400));
        signal.extend(dual_tone('0', 800, 8000));
        let decoder = Decoder::default();
        let first = decoder.decode(&signal, 1, 8000).expect("decode");
        let second = decoder.decode(&signal, 1, 8000).expect("decode");
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "80");
    }

    #[test]
    fn higher_sample_rates_work() {
        let mut signal = Vec::new();
        for (i, digit) in "3141".chars().enumerate() {
            signal.extend(dual_tone_from(digit, i * 2400, 1600, 16_000));
            signal.extend(silence(800));
        }
        let decoded = Decoder::default().decode(&signal, 1, 16_000).expect("decode");
        assert_eq!(decoded.to_string(), "3141");
    }

    #[test]
    fn wideband_audio_needs_a_proportional_window() {
        let mut signal = dual_tone('5', 4800, 48_000);
        signal.extend(silence(2400));
        signal.extend(dual_tone_from('2', 7200, 4800, 48_000));

        let short = Decoder::default().decode(&signal, 1, 48_000).expect("decode");
        assert!(short.is_empty());

        let scaled = Decoder::new(DecoderConfig {
            window_len: 6 * 205,
            ..DecoderConfig::default()
        })
        .expect("config");
        let decoded = scaled.decode(&signal, 1, 48_000).expect("decode");
        assert_eq!(decoded.to_string(), "52");
    }

    #[test]
    fn rejects_invalid_config() {
        let config = DecoderConfig {
            window_len: 1,
            ..DecoderConfig::default()
        };
        assert!(matches!(Decoder::new(config), Err(DecodeError::InvalidConfig(_))));
    }
}
