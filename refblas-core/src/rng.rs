//! Deterministic PRNG for reproducible test and benchmark operands.

use crate::matrix::General;

/// SplitMix64: single `u64` state, period 2^64.
///
/// ```
/// use refblas_core::SplitMix64;
///
/// let mut rng = SplitMix64::new(42);
/// let x = rng.vec(8);
/// assert!(x.iter().all(|v| (-1.0..1.0).contains(v)));
/// ```
#[derive(Debug, Clone)]
pub struct SplitMix64(u64);

impl SplitMix64 {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1) from the top 53 bits.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [lo, hi).
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// `n` values uniform in [-1, 1).
    pub fn vec(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.uniform(-1.0, 1.0)).collect()
    }

    /// Dense `rows × cols` matrix with entries uniform in [-1, 1).
    pub fn general(&mut self, rows: usize, cols: usize) -> General {
        General::from_vec(rows, cols, self.vec(rows * cols))
    }

    /// Well-conditioned `n × n` matrix: random entries with `n + 1` added on
    /// the diagonal, so triangular parts are safe to solve against.
    pub fn diag_dominant(&mut self, n: usize) -> General {
        let mut a = self.general(n, n);
        for i in 0..n {
            let d = a.at(i, i);
            a.set(i, i, d + (n + 1) as f64);
        }
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut a = SplitMix64::new(1);
        let mut b = SplitMix64::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = SplitMix64::new(7);
        for _ in 0..1000 {
            let v = rng.uniform(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&v), "uniform(-2, 3) = {}", v);
        }
    }

    #[test]
    fn test_diag_dominant() {
        let a = SplitMix64::new(3).diag_dominant(5);
        for i in 0..5 {
            let off: f64 = (0..5).filter(|&j| j != i).map(|j| a.at(i, j).abs()).sum();
            assert!(a.at(i, i).abs() > off);
        }
    }
}
