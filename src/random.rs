//! The pseudo-random source supplied by the host optimizer.
//!
//! The local search never seeds, inspects, or saves the random state: it
//! only draws from it. Reproducibility comes from the host's seed, so the
//! source is treated as opaque and non-resumable. Any [`rand::Rng`] is a
//! [`RandomSource`].

use rand::seq::SliceRandom;
use rand::Rng;

/// Draw-only access to the host's random number stream.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn random01(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    fn random_int(&mut self, lo: usize, hi: usize) -> usize;

    /// Shuffles `items` in place.
    fn shuffle(&mut self, items: &mut [usize]);

    /// `true` with probability `p`.
    fn random_flip(&mut self, p: f64) -> bool {
        self.random01() < p
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn random01(&mut self) -> f64 {
        self.random::<f64>()
    }

    #[inline]
    fn random_int(&mut self, lo: usize, hi: usize) -> usize {
        self.random_range(lo..=hi)
    }

    fn shuffle(&mut self, items: &mut [usize]) {
        SliceRandom::shuffle(items, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random01_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let x = rng.random01();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_int_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = rng.random_int(1, 4);
            assert!((1..=4).contains(&v));
            seen[v - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut items: Vec<usize> = (0..20).collect();
        RandomSource::shuffle(&mut rng, &mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_flip_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..100).all(|_| !rng.random_flip(0.0)));
        assert!((0..100).all(|_| rng.random_flip(1.0)));
    }
}
