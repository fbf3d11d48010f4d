use dtmfscan_decode::keypad;

use crate::encode::DialSymbol;
use crate::sine_oscillator::SineOscillator;

/// Renders dial symbols as dual-tone audio.
pub struct DialModulator {
    sample_rate_hz: f32,
    tone_samples: usize,
    gap_samples: usize,
    level: f32,
}

impl DialModulator {
    /// `level` is the peak amplitude of each of the two carriers.
    pub fn new(sample_rate_hz: f32, tone_secs: f32, gap_secs: f32, level: f32) -> Self {
        Self {
            sample_rate_hz,
            tone_samples: (sample_rate_hz * tone_secs).round() as usize,
            gap_samples: (sample_rate_hz * gap_secs).round() as usize,
            level,
        }
    }

    /// Samples produced per dial symbol.
    pub fn symbol_samples(&self) -> usize {
        self.tone_samples + self.gap_samples
    }

    /// Append the audio for `symbols` to `out`. Each tone starts at zero phase.
    pub fn modulate(&self, symbols: &[DialSymbol], out: &mut Vec<f32>) {
        out.reserve(symbols.len() * self.symbol_samples());
        for symbol in symbols {
            match *symbol {
                DialSymbol::Tone(digit) => {
                    // Only keypad digits reach here; `encode_dial` rejects the rest.
                    if let Some((row_hz, col_hz)) = keypad::tones_for(digit) {
                        let mut row = SineOscillator::new(self.sample_rate_hz, row_hz);
                        let mut col = SineOscillator::new(self.sample_rate_hz, col_hz);
                        out.extend(
                            (0..self.tone_samples)
                                .map(|_| (row.next_sample() + col.next_sample()) * self.level),
                        );
                    }
                    out.extend(std::iter::repeat(0.0).take(self.gap_samples));
                }
                DialSymbol::Pause => {
                    out.extend(std::iter::repeat(0.0).take(self.symbol_samples()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_follow_tone_and_gap() {
        let modulator = DialModulator::new(8000.0, 0.1, 0.05, 0.25);
        assert_eq!(modulator.symbol_samples(), 1200);
        let mut out = Vec::new();
        modulator.modulate(&[DialSymbol::Tone('1'), DialSymbol::Pause], &mut out);
        assert_eq!(out.len(), 2400);
        assert!(out[..800].iter().any(|&x| x.abs() > 0.1));
        assert!(out[800..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn peak_stays_within_twice_the_level() {
        let modulator = DialModulator::new(8000.0, 0.2, 0.0, 0.25);
        let mut out = Vec::new();
        modulator.modulate(&[DialSymbol::Tone('9')], &mut out);
        assert!(out.iter().all(|&x| x.abs() <= 0.5 + 1e-4));
    }
}
