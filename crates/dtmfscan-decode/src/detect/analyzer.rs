use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::keypad::{COL_FREQS_HZ, ROW_FREQS_HZ};

use super::filter::BandpassFilter;

/// Bandpass energies for one window, in keypad row and column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyProfile {
    pub rows: [f64; 4],
    pub cols: [f64; 3],
}

impl EnergyProfile {
    /// Index of the strongest row; the lowest index wins a tie.
    pub fn dominant_row(&self) -> usize {
        argmax(&self.rows)
    }

    /// Index of the strongest column; the lowest index wins a tie.
    pub fn dominant_col(&self) -> usize {
        argmax(&self.cols)
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Filter bank over the seven DTMF carriers.
///
/// Each window is filtered from rest; nothing carries over between calls.
pub struct BandEnergyAnalyzer {
    window_len: usize,
    rows: Vec<BandpassFilter>,
    cols: Vec<BandpassFilter>,
}

impl BandEnergyAnalyzer {
    pub fn new(sample_rate_hz: u32, config: &DecoderConfig) -> Result<Self> {
        let design = |freqs: &[f32]| -> Result<Vec<BandpassFilter>> {
            freqs
                .iter()
                .map(|&hz| {
                    BandpassFilter::butterworth(
                        hz as f64,
                        config.filter_half_bandwidth_hz,
                        config.filter_order,
                        sample_rate_hz as f64,
                    )
                })
                .collect()
        };
        Ok(Self {
            window_len: config.window_len,
            rows: design(&ROW_FREQS_HZ)?,
            cols: design(&COL_FREQS_HZ)?,
        })
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn analyze(&self, window: &[f32]) -> Result<EnergyProfile> {
        if window.len() != self.window_len {
            return Err(DecodeError::analysis(format!(
                "expected a {}-sample window, got {}",
                self.window_len,
                window.len()
            )));
        }
        let mut scratch = Vec::with_capacity(window.len());
        let mut stage = Vec::with_capacity(window.len());
        let mut profile = EnergyProfile {
            rows: [0.0; 4],
            cols: [0.0; 3],
        };
        for (energy, filter) in profile.rows.iter_mut().zip(&self.rows) {
            *energy = filter.energy(window, &mut scratch, &mut stage);
        }
        for (energy, filter) in profile.cols.iter_mut().zip(&self.cols) {
            *energy = filter.energy(window, &mut scratch, &mut stage);
        }
        Ok(profile)
    }
}
