use crate::sequence::DigitEvent;

/// The run currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    digit: char,
    windows: usize,
    start_sample: u64,
    end_sample: u64,
}

/// Run bookkeeping for the segmentation state machine.
///
/// `None` is the idle state. Only a differing positive digit ends a run;
/// silent and toneless windows are never reported here, so they cannot
/// interrupt one. Two presses of the same key separated only by silence
/// therefore come out as a single digit.
#[derive(Debug)]
pub(crate) struct RunTracker {
    current: Option<Run>,
    min_windows: usize,
}

impl RunTracker {
    /// `min_windows` is the smallest run length that counts as a tone.
    pub(crate) fn new(min_windows: usize) -> Self {
        Self {
            current: None,
            min_windows,
        }
    }

    /// Record a window at `[start, end]` that resolved to `digit`. Returns the
    /// previous run if this detection ended it and it was long enough.
    pub(crate) fn observe(&mut self, digit: char, start: u64, end: u64) -> Option<DigitEvent> {
        if let Some(run) = self.current.as_mut() {
            if run.digit == digit {
                run.windows += 1;
                run.end_sample = end;
                return None;
            }
        }

        let finished = self.current.replace(Run {
            digit,
            windows: 1,
            start_sample: start,
            end_sample: end,
        });
        finished.and_then(|run| self.confirm(run))
    }

    /// Flush the in-flight run, leaving the tracker idle.
    pub(crate) fn finish(&mut self) -> Option<DigitEvent> {
        self.current.take().and_then(|run| self.confirm(run))
    }

    /// Drop the in-flight run without reporting it.
    pub(crate) fn clear(&mut self) {
        self.current = None;
    }

    pub(crate) fn current_digit(&self) -> Option<char> {
        self.current.map(|run| run.digit)
    }

    fn confirm(&self, run: Run) -> Option<DigitEvent> {
        if run.windows >= self.min_windows {
            tracing::debug!(digit = %run.digit, windows = run.windows, "digit confirmed");
            Some(DigitEvent {
                digit: run.digit,
                start_sample: run.start_sample,
                end_sample: run.end_sample,
                windows: run.windows,
            })
        } else {
            tracing::debug!(digit = %run.digit, windows = run.windows, "run too short, dropped");
            None
        }
    }
}

/// Smallest window count whose duration, measured in whole windows, reaches
/// `min_duration_secs`.
pub(crate) fn min_run_windows(window_len: usize, sample_rate_hz: u32, min_duration_secs: f64) -> usize {
    let meets = |windows: usize| {
        windows as f64 * window_len as f64 / sample_rate_hz as f64 >= min_duration_secs
    };
    let estimate = (min_duration_secs * sample_rate_hz as f64 / window_len as f64).ceil();
    let mut windows = (estimate as usize).max(1);
    while windows > 1 && meets(windows - 1) {
        windows -= 1;
    }
    while !meets(windows) {
        windows += 1;
    }
    windows
}
