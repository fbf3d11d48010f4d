mod analyzer;
mod filter;
mod resolver;
mod run;

pub use analyzer::{BandEnergyAnalyzer, EnergyProfile};
pub use filter::BandpassFilter;
pub use resolver::DigitResolver;

use crate::config::DecoderConfig;
use crate::error::Result;
use crate::normalize::peak_abs;
use crate::sequence::DigitEvent;
use run::{min_run_windows, RunTracker};

/// What a single window turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowVerdict {
    /// Peak amplitude at or below the silence threshold; never analyzed.
    Silence,
    /// Analyzed, but the strongest carriers do not form a digit.
    NoTone,
    Digit(char),
}

/// Sliding-window DTMF scanner over normalized samples.
///
/// Windows advance by half a window after a digit and by a quarter window
/// after silence or no tone. Samples may be pushed in blocks of any size;
/// the result is the same as pushing the whole buffer at once.
pub struct DtmfScanner {
    window_len: usize,
    quarter_step: usize,
    half_step: usize,
    silence_threshold: f32,
    analyzer: BandEnergyAnalyzer,
    resolver: DigitResolver,
    runs: RunTracker,
    pending: Vec<f32>,
    pending_start: u64,
    pos: u64,
}

impl DtmfScanner {
    /// Create a builder with the default configuration.
    pub fn builder(sample_rate_hz: u32) -> DtmfScannerBuilder {
        DtmfScannerBuilder::new(sample_rate_hz)
    }

    /// Feed normalized samples and return the digits confirmed so far.
    pub fn push(&mut self, samples: &[f32]) -> Result<Vec<DigitEvent>> {
        self.pending.extend_from_slice(samples);
        let mut events = Vec::new();

        loop {
            let offset = (self.pos - self.pending_start) as usize;
            if offset + self.window_len > self.pending.len() {
                break;
            }
            let verdict = self.classify(&self.pending[offset..offset + self.window_len])?;
            tracing::trace!(pos = self.pos, ?verdict, "window");

            let step = match verdict {
                WindowVerdict::Silence | WindowVerdict::NoTone => self.quarter_step,
                WindowVerdict::Digit(digit) => {
                    let end = self.pos + self.window_len as u64 - 1;
                    events.extend(self.runs.observe(digit, self.pos, end));
                    self.half_step
                }
            };
            self.pos += step as u64;
        }

        // Keep only what the next window can still reach.
        let consumed = ((self.pos - self.pending_start) as usize).min(self.pending.len());
        self.pending.drain(..consumed);
        self.pending_start += consumed as u64;

        Ok(events)
    }

    /// Flush the run in progress. Call once the input is exhausted.
    pub fn finish(&mut self) -> Option<DigitEvent> {
        self.runs.finish()
    }

    /// Reset internal state and clear any pending samples and runs.
    pub fn reset(&mut self) {
        self.runs.clear();
        self.pending.clear();
        self.pending_start = 0;
        self.pos = 0;
    }

    /// Digit of the run currently being tracked, if any.
    pub fn tracking(&self) -> Option<char> {
        self.runs.current_digit()
    }

    /// Absolute sample offset of the next window.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Classify one window without touching the run state.
    pub fn classify(&self, window: &[f32]) -> Result<WindowVerdict> {
        if peak_abs(window) <= self.silence_threshold {
            return Ok(WindowVerdict::Silence);
        }
        let profile = self.analyzer.analyze(window)?;
        Ok(match self.resolver.resolve(&profile) {
            Some(digit) => WindowVerdict::Digit(digit),
            None => WindowVerdict::NoTone,
        })
    }
}

/// Builder for configuring a DtmfScanner.
pub struct DtmfScannerBuilder {
    sample_rate_hz: u32,
    config: DecoderConfig,
}

impl DtmfScannerBuilder {
    /// Create a builder with defaults for the given sample rate.
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            config: DecoderConfig::default(),
        }
    }

    /// Replace every setting at once.
    pub fn config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the window length in samples.
    pub fn window_len(mut self, samples: usize) -> Self {
        self.config.window_len = samples;
        self
    }

    /// Set the peak amplitude at or below which a window counts as silence.
    pub fn silence_threshold(mut self, threshold: f32) -> Self {
        self.config.silence_threshold = threshold;
        self
    }

    /// Set the minimum tone duration in seconds.
    pub fn min_tone_duration(mut self, secs: f64) -> Self {
        self.config.min_tone_duration_secs = secs;
        self
    }

    /// Set the allowed carrier deviation in Hz.
    pub fn frequency_tolerance(mut self, hz: f32) -> Self {
        self.config.frequency_tolerance_hz = hz;
        self
    }

    /// Build the scanner, designing its filter bank for the sample rate.
    pub fn build(self) -> Result<DtmfScanner> {
        self.config.validate()?;
        let config = self.config;
        let analyzer = BandEnergyAnalyzer::new(self.sample_rate_hz, &config)?;
        let min_windows = min_run_windows(
            config.window_len,
            self.sample_rate_hz,
            config.min_tone_duration_secs,
        );

        Ok(DtmfScanner {
            window_len: analyzer.window_len(),
            quarter_step: config.quarter_step(),
            half_step: config.half_step(),
            silence_threshold: config.silence_threshold,
            analyzer,
            resolver: DigitResolver::new(config.frequency_tolerance_hz),
            runs: RunTracker::new(min_windows),
            pending: Vec::new(),
            pending_start: 0,
            pos: 0,
        })
    }
}
