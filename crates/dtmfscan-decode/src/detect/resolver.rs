use crate::keypad::{self, COL_FREQS_HZ, ROW_FREQS_HZ};

use super::analyzer::EnergyProfile;

/// Turns an energy profile into a digit call.
///
/// The strongest row and column always name some carrier, so the tolerance
/// check against the keypad table is the only gate between noise and a digit.
#[derive(Debug, Clone, Copy)]
pub struct DigitResolver {
    tolerance_hz: f32,
}

impl DigitResolver {
    pub fn new(tolerance_hz: f32) -> Self {
        Self { tolerance_hz }
    }

    pub fn resolve(&self, profile: &EnergyProfile) -> Option<char> {
        let row_hz = ROW_FREQS_HZ[profile.dominant_row()];
        let col_hz = COL_FREQS_HZ[profile.dominant_col()];
        self.lookup(row_hz, col_hz)
    }

    /// Digit for an arbitrary (row, column) frequency pair, if any.
    pub fn lookup(&self, row_hz: f32, col_hz: f32) -> Option<char> {
        keypad::digit_near(row_hz, col_hz, self.tolerance_hz)
    }
}
