//! The numeric DTMF keypad.

use phf::phf_ordered_map;

/// Row (low group) carriers in Hz, top to bottom.
pub const ROW_FREQS_HZ: [f32; 4] = [697.0, 770.0, 852.0, 941.0];

/// Column (high group) carriers in Hz, left to right. The fourth column
/// (1633 Hz, keys A-D) is not decoded.
pub const COL_FREQS_HZ: [f32; 3] = [1209.0, 1336.0, 1477.0];

/// Digit to (row Hz, column Hz), in keypad reading order.
pub static DIGIT_TONES: phf::OrderedMap<char, (f32, f32)> = phf_ordered_map! {
    '1' => (697.0, 1209.0),
    '2' => (697.0, 1336.0),
    '3' => (697.0, 1477.0),
    '4' => (770.0, 1209.0),
    '5' => (770.0, 1336.0),
    '6' => (770.0, 1477.0),
    '7' => (852.0, 1209.0),
    '8' => (852.0, 1336.0),
    '9' => (852.0, 1477.0),
    '0' => (941.0, 1336.0),
};

/// Row and column carrier for `digit`, if it is a decodable digit.
pub fn tones_for(digit: char) -> Option<(f32, f32)> {
    DIGIT_TONES.get(&digit).copied()
}

/// First digit, in keypad order, whose carriers both lie within
/// `tolerance_hz` of the given frequencies.
pub fn digit_near(row_hz: f32, col_hz: f32, tolerance_hz: f32) -> Option<char> {
    DIGIT_TONES
        .entries()
        .find(|(_, tones)| {
            let (row, col) = **tones;
            (row - row_hz).abs() <= tolerance_hz && (col - col_hz).abs() <= tolerance_hz
        })
        .map(|(&digit, _)| digit)
}
