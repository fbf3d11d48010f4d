use std::sync::OnceLock;

const TABLE_LEN: usize = 4096;

static SINE_TABLE: OnceLock<Vec<f32>> = OnceLock::new();

fn sine_table() -> &'static [f32] {
    SINE_TABLE.get_or_init(|| {
        (0..TABLE_LEN)
            .map(|i| (i as f64 * std::f64::consts::TAU / TABLE_LEN as f64).sin() as f32)
            .collect()
    })
}

/// Table-lookup sine with linear interpolation. Phase is kept in table units.
pub(crate) struct SineOscillator {
    phase: f32,
    phase_inc: f32,
}

impl SineOscillator {
    pub(crate) fn new(sample_rate_hz: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz * TABLE_LEN as f32 / sample_rate_hz,
        }
    }

    pub(crate) fn next_sample(&mut self) -> f32 {
        let table = sine_table();
        let idx = self.phase as usize % TABLE_LEN;
        let frac = self.phase.fract();
        let value = table[idx] + (table[(idx + 1) % TABLE_LEN] - table[idx]) * frac;

        self.phase += self.phase_inc;
        if self.phase >= TABLE_LEN as f32 {
            self.phase -= TABLE_LEN as f32;
        }

        value
    }
}
