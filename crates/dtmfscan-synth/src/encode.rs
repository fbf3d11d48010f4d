use dtmfscan_decode::keypad;

/// One step of a dial plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialSymbol {
    /// Press `digit`: its tone followed by the inter-digit gap.
    Tone(char),
    /// Dead air as long as one tone plus one gap.
    Pause,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("unknown dial symbol {symbol:?} at byte {pos}")]
    UnknownSymbol { symbol: char, pos: usize },
}

/// Parse a dial string. Digits dial, `,` pauses, whitespace is ignored.
pub fn encode_dial(text: &str) -> Result<Vec<DialSymbol>, EncodeError> {
    let mut symbols = Vec::with_capacity(text.len());
    for (pos, ch) in text.char_indices() {
        if ch.is_whitespace() {
            continue;
        }
        if ch == ',' {
            symbols.push(DialSymbol::Pause);
            continue;
        }
        if keypad::tones_for(ch).is_none() {
            return Err(EncodeError::UnknownSymbol { symbol: ch, pos });
        }
        symbols.push(DialSymbol::Tone(ch));
    }
    Ok(symbols)
}
