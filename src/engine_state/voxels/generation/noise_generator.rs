//! Seeded coherent noise sampling.

use noise::{NoiseFn, Perlin};

/// A Perlin field with its own seed and sampling frequency.
///
/// Outputs are clamped to [-1, 1]. Perlin noise is zero on the integer lattice, so
/// frequencies should keep sample points off integer coordinates.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    perlin: Perlin,
    frequency: f64,
}

impl NoiseGenerator {
    /// Creates a field seeded with `seed`, sampled at `frequency` cycles per unit.
    pub fn new(seed: u32, frequency: f64) -> Self {
        NoiseGenerator {
            perlin: Perlin::new(seed),
            frequency,
        }
    }

    /// 2D sample in [-1, 1].
    pub fn sample_2d(&self, x: f64, z: f64) -> f64 {
        self.perlin
            .get([x * self.frequency, z * self.frequency])
            .clamp(-1.0, 1.0)
    }

    /// 3D sample in [-1, 1].
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin
            .get([x * self.frequency, y * self.frequency, z * self.frequency])
            .clamp(-1.0, 1.0)
    }

    /// 2D sample mapped to [0, 1] by `(n + 1) / 2`.
    pub fn normalized_2d(&self, x: f64, z: f64) -> f64 {
        normalize(self.sample_2d(x, z))
    }

    /// 3D sample mapped to [0, 1] by `(n + 1) / 2`.
    pub fn normalized_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        normalize(self.sample_3d(x, y, z))
    }
}

/// Maps [-1, 1] to [0, 1].
#[inline]
pub fn normalize(value: f64) -> f64 {
    (value + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_identical_samples() {
        let a = NoiseGenerator::new(7, 0.031);
        let b = NoiseGenerator::new(7, 0.031);
        for step in 0..50 {
            let x = step as f64 * 3.7;
            assert_eq!(a.sample_2d(x, -x), b.sample_2d(x, -x));
            assert_eq!(a.sample_3d(x, 12.0, x), b.sample_3d(x, 12.0, x));
        }
    }

    #[test]
    fn different_seeds_give_different_fields() {
        let a = NoiseGenerator::new(7, 0.031);
        let b = NoiseGenerator::new(1007, 0.031);
        let differing = (0..50)
            .map(|step| step as f64 * 3.7)
            .filter(|x| a.sample_2d(*x, *x) != b.sample_2d(*x, *x))
            .count();
        assert!(differing > 25);
    }

    #[test]
    fn outputs_stay_in_range() {
        let field = NoiseGenerator::new(2024, 0.083);
        for step in 0..200 {
            let x = step as f64 * 1.3;
            let signed = field.sample_3d(x, x * 0.5, -x);
            let unit = field.normalized_2d(x, -x);
            assert!((-1.0..=1.0).contains(&signed));
            assert!((0.0..=1.0).contains(&unit));
        }
        assert_eq!(normalize(-1.0), 0.0);
        assert_eq!(normalize(1.0), 1.0);
    }
}
