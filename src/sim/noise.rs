//! Seeded 2D gradient noise
//!
//! Classic permutation-table gradient noise restricted to four diagonal
//! gradients. The table is shuffled with a Park-Miller generator so the same
//! seed always yields the same terrain.

/// Park-Miller modulus (2^31 - 1)
const PM_MODULUS: u64 = 2_147_483_647;
/// Park-Miller multiplier
const PM_MULTIPLIER: u64 = 16_807;

/// Gradient noise generator
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// 256-entry permutation duplicated to 512 so lattice lookups never wrap
    perm: [u8; 512],
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut state = seed as u64;
        for i in (1..256usize).rev() {
            state = (state * PM_MULTIPLIER) % PM_MODULUS;
            let n = ((state as f64 / PM_MODULUS as f64) * (i + 1) as f64).floor() as usize;
            table.swap(i, n.min(i));
        }

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self { perm }
    }

    /// Sample noise at (x, y). Output lies roughly in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        lerp(
            lerp(grad(self.perm[a], x, y), grad(self.perm[b], x - 1.0, y), u),
            lerp(
                grad(self.perm[a + 1], x, y - 1.0),
                grad(self.perm[b + 1], x - 1.0, y - 1.0),
                u,
            ),
            v,
        )
    }

    #[cfg(test)]
    pub(crate) fn permutation(&self) -> &[u8; 512] {
        &self.perm
    }
}

/// Quintic fade curve 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_permutation_is_a_shuffle() {
        let noise = PerlinNoise::new(2025);
        let perm = noise.permutation();
        let mut seen = [false; 256];
        for &p in &perm[..256] {
            assert!(!seen[p as usize], "duplicate entry {}", p);
            seen[p as usize] = true;
        }
        assert_eq!(&perm[..256], &perm[256..]);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PerlinNoise::new(2025);
        let b = PerlinNoise::new(1337);
        assert_ne!(a.permutation()[..256], b.permutation()[..256]);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        // Every gradient is a dot product with the fractional offset, which is zero on the lattice
        let noise = PerlinNoise::new(2025);
        for i in -5..5 {
            for j in -5..5 {
                assert_eq!(noise.sample(i as f64, j as f64), 0.0);
            }
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_same_seed_bit_identical(x in -500.0f64..500.0, y in -500.0f64..500.0) {
            let a = PerlinNoise::new(2025);
            let b = PerlinNoise::new(2025);
            prop_assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
            prop_assert_eq!(a.sample(x, y).to_bits(), a.sample(x, y).to_bits());
        }

        #[test]
        fn prop_output_bounded(seed in 1u32..100_000, x in -100.0f64..100.0, y in -100.0f64..100.0) {
            let v = PerlinNoise::new(seed).sample(x, y);
            prop_assert!(v.abs() <= 2.0 + 1e-9);
        }
    }
}
