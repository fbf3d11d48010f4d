/// Mix seeded, band-limited Gaussian noise into `samples`.
///
/// `level` is the standard deviation before the one-pole lowpass at
/// `cutoff_hz`. The same seed always produces the same noise.
pub fn add_band_limited_noise(
    samples: &mut [f32],
    level: f32,
    sample_rate_hz: f32,
    cutoff_hz: f32,
    seed: u32,
) {
    let noise = GaussianNoise::new(seed).map(|z| z * level);
    let smoothed = Smoothed::new(noise, sample_rate_hz, cutoff_hz);
    for (sample, n) in samples.iter_mut().zip(smoothed) {
        *sample += n;
    }
}

/// Standard normal deviates from a 32-bit xorshift generator, drawn in
/// Box-Muller pairs.
struct GaussianNoise {
    state: u32,
    spare: Option<f32>,
}

impl GaussianNoise {
    fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift.
        Self {
            state: seed.max(1),
            spare: None,
        }
    }

    fn uniform(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state as f32 / u32::MAX as f32
    }
}

impl Iterator for GaussianNoise {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if let Some(z) = self.spare.take() {
            return Some(z);
        }
        let radius = (-2.0 * self.uniform().max(1e-12).ln()).sqrt();
        let (sin, cos) = (std::f32::consts::TAU * self.uniform()).sin_cos();
        self.spare = Some(radius * sin);
        Some(radius * cos)
    }
}

/// One-pole RC lowpass over another sample stream.
struct Smoothed<I> {
    inner: I,
    alpha: f32,
    state: f32,
}

impl<I> Smoothed<I> {
    fn new(inner: I, sample_rate_hz: f32, cutoff_hz: f32) -> Self {
        let dt = sample_rate_hz.recip();
        let rc = (std::f32::consts::TAU * cutoff_hz.max(1.0)).recip();
        Self {
            inner,
            alpha: dt / (rc + dt),
            state: 0.0,
        }
    }
}

impl<I: Iterator<Item = f32>> Iterator for Smoothed<I> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let x = self.inner.next()?;
        self.state += self.alpha * (x - self.state);
        Some(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_noise() {
        let mut a = vec![0.0f32; 256];
        let mut b = vec![0.0f32; 256];
        add_band_limited_noise(&mut a, 0.1, 8000.0, 3000.0, 7);
        add_band_limited_noise(&mut b, 0.1, 8000.0, 3000.0, 7);
        assert_eq!(a, b);
        assert!(a.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn noise_is_added_not_replaced() {
        let mut samples = vec![1.0f32; 1000];
        add_band_limited_noise(&mut samples, 0.01, 8000.0, 3000.0, 1);
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!((mean - 1.0).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn deviates_have_roughly_unit_variance() {
        let draws: Vec<f32> = GaussianNoise::new(42).take(20_000).collect();
        let mean = draws.iter().sum::<f32>() / draws.len() as f32;
        let var = draws.iter().map(|z| (z - mean) * (z - mean)).sum::<f32>() / draws.len() as f32;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.1, "variance {var}");
    }

    #[test]
    fn zero_seed_still_produces_noise() {
        let draws: Vec<f32> = GaussianNoise::new(0).take(4).collect();
        assert!(draws.iter().any(|&z| z != 0.0));
    }
}
