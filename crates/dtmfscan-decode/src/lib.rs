//! DTMF digit decoding from sampled audio.
//!
//! A waveform is downmixed to mono and peak-normalized, then scanned with a
//! sliding window. Each window is either silence, no tone, or one digit,
//! judged by the energy a bank of narrow Butterworth bandpass filters passes
//! at the seven keypad carriers. Runs of the same digit collapse to one entry
//! and runs shorter than the minimum tone duration are dropped.
//!
//! Silence does not end a run: only a window that resolves to a *different*
//! digit does. A key pressed twice with nothing but silence in between is
//! reported once, unless a window at a tone edge resolves to another digit.
//! Callers that need to tell such presses apart must look at
//! the event sample ranges themselves.
//!
//! The default 205-sample window suits telephone-band audio (8 to about
//! 22 kHz). At 44.1 or 48 kHz it spans under 5 ms, too short for the 40 Hz
//! wide bandpass filters to ring up, and recordings usually decode to nothing.
//! Resample such input, or raise `window_len` in proportion to the rate.

pub mod config;
pub mod decoder;
pub mod detect;
pub mod error;
pub mod keypad;
pub mod normalize;
pub mod sequence;

pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use detect::{DtmfScanner, DtmfScannerBuilder, WindowVerdict};
pub use error::{DecodeError, Result};
pub use normalize::SampleBuffer;
pub use sequence::{DigitEvent, DigitSequence};
