use std::fmt;

/// One confirmed key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitEvent {
    pub digit: char,
    /// First sample of the run's first window.
    pub start_sample: u64,
    /// Last sample of the run's last window.
    pub end_sample: u64,
    /// Number of windows that resolved to `digit` during the run.
    pub windows: usize,
}

/// Decoded digits in the order they were dialed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitSequence {
    events: Vec<DigitEvent>,
}

impl DigitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DigitEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DigitEvent] {
        &self.events
    }

    pub fn digits(&self) -> impl Iterator<Item = char> + '_ {
        self.events.iter().map(|event| event.digit)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits() {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl Extend<DigitEvent> for DigitSequence {
    fn extend<I: IntoIterator<Item = DigitEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl FromIterator<DigitEvent> for DigitSequence {
    fn from_iter<I: IntoIterator<Item = DigitEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
