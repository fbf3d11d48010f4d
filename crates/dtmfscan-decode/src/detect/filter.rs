//! Butterworth bandpass design as cascaded second-order sections.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{DecodeError, Result};

/// One biquad stage, direct form II transposed. `a0` is normalized to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    b: [f64; 3],
    a: [f64; 2],
}

impl Biquad {
    fn process(&self, input: &[f64], output: &mut [f64]) {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        for (x, y) in input.iter().zip(output.iter_mut()) {
            let out = self.b[0] * x + z1;
            z1 = self.b[1] * x - self.a[0] * out + z2;
            z2 = self.b[2] * x - self.a[1] * out;
            *y = out;
        }
    }

    fn response(&self, z_inv: Complex64) -> Complex64 {
        let z_inv2 = z_inv * z_inv;
        (self.b[0] + z_inv * self.b[1] + z_inv2 * self.b[2])
            / (1.0 + z_inv * self.a[0] + z_inv2 * self.a[1])
    }
}

/// Bandpass filter centred on one DTMF carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct BandpassFilter {
    sections: Vec<Biquad>,
}

impl BandpassFilter {
    /// Design a Butterworth bandpass over `[center - half_bw, center + half_bw]`.
    ///
    /// The `order`-pole lowpass prototype is moved to the band with the usual
    /// lowpass-to-bandpass substitution and discretized with a pre-warped
    /// bilinear transform, giving `order` sections and `2 * order` poles.
    pub fn butterworth(
        center_hz: f64,
        half_bandwidth_hz: f64,
        order: usize,
        sample_rate_hz: f64,
    ) -> Result<Self> {
        let low_hz = center_hz - half_bandwidth_hz;
        let high_hz = center_hz + half_bandwidth_hz;
        let nyquist_hz = sample_rate_hz / 2.0;
        if order == 0 || !(low_hz > 0.0 && low_hz < high_hz && high_hz < nyquist_hz) {
            return Err(DecodeError::analysis(format!(
                "passband {low_hz}..{high_hz} Hz (order {order}) does not fit below Nyquist {nyquist_hz} Hz"
            )));
        }

        let fs2 = 2.0 * sample_rate_hz;
        let warp = |hz: f64| fs2 * (PI * hz / sample_rate_hz).tan();
        let w_low = warp(low_hz);
        let w_high = warp(high_hz);
        let bw = w_high - w_low;
        let w0_sq = w_low * w_high;

        // Analog poles: each prototype pole splits into two band poles.
        let mut analog_poles = Vec::with_capacity(2 * order);
        for k in 0..order {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            let scaled = Complex64::from_polar(1.0, theta) * (bw / 2.0);
            let offset = (scaled * scaled - w0_sq).sqrt();
            analog_poles.push(scaled + offset);
            analog_poles.push(scaled - offset);
        }

        // `order` zeros at s = 0 map to z = 1; the rest (at infinity) land on z = -1.
        let denom = analog_poles
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));
        let gain = (Complex64::new((bw * fs2).powi(order as i32), 0.0) / denom).re;

        let upper: Vec<Complex64> = analog_poles
            .iter()
            .map(|&p| (fs2 + p) / (fs2 - p))
            .filter(|z| z.im > 0.0)
            .collect();
        if upper.len() != order {
            return Err(DecodeError::analysis(format!(
                "bandpass around {center_hz} Hz produced real poles; band too wide for order {order}"
            )));
        }

        let sections = upper
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let g = if i == 0 { gain } else { 1.0 };
                Biquad {
                    b: [g, 0.0, -g],
                    a: [-2.0 * z.re, z.norm_sqr()],
                }
            })
            .collect();

        tracing::debug!(center_hz, half_bandwidth_hz, order, sample_rate_hz, "designed bandpass");

        Ok(Self { sections })
    }

    /// Filter `input` from zero initial state and return the sum of squared
    /// outputs. Both buffers are resized to `input.len()`; afterwards
    /// `scratch` holds the filtered signal.
    pub fn energy(&self, input: &[f32], scratch: &mut Vec<f64>, stage: &mut Vec<f64>) -> f64 {
        scratch.clear();
        scratch.extend(input.iter().map(|&x| x as f64));
        stage.resize(input.len(), 0.0);
        for section in &self.sections {
            section.process(scratch.as_slice(), stage.as_mut_slice());
            std::mem::swap(scratch, stage);
        }
        scratch.iter().map(|y| y * y).sum()
    }

    /// Magnitude of the frequency response at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        let z_inv = Complex64::from_polar(1.0, -2.0 * PI * freq_hz / sample_rate_hz);
        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response(z_inv))
            .norm()
    }
}
