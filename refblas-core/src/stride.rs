//! Strided vector addressing.
//!
//! A strided vector is `(data, n, inc)`. For `inc > 0` logical element `i`
//! lives at `i*inc`; for `inc < 0` iteration starts at `(n-1)*|inc|` and walks
//! backwards, so logical element `i` lives at `(n-1-i)*|inc|`.

use crate::error::BlasError;

/// Maps logical indices of a strided vector onto buffer offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strided {
    start: isize,
    inc: isize,
}

impl Strided {
    /// Accessor for `n` elements with increment `inc`.
    #[inline]
    pub fn new(n: usize, inc: isize) -> Self {
        let start = if inc < 0 && n > 0 {
            (n as isize - 1) * -inc
        } else {
            0
        };
        Self { start, inc }
    }

    /// Buffer offset of logical element `i`.
    #[inline(always)]
    pub fn at(&self, i: usize) -> usize {
        (self.start + i as isize * self.inc) as usize
    }

    /// Offset of logical element 0 (`kx` in the reference loops).
    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start as usize
    }
}

/// True when `n` elements with increment `inc` fit in a buffer of `len`.
#[inline]
pub fn fits(n: usize, inc: isize, len: usize) -> bool {
    n == 0 || (n - 1) * inc.unsigned_abs() < len
}

/// Panic with `ZeroIncX` / `BadX` unless `x` is a valid strided vector.
#[inline]
#[track_caller]
pub fn check_x(n: usize, inc: isize, len: usize) {
    if inc == 0 {
        BlasError::ZeroIncX.raise();
    }
    if !fits(n, inc, len) {
        BlasError::BadX.raise();
    }
}

/// Panic with `ZeroIncY` / `BadY` unless `y` is a valid strided vector.
#[inline]
#[track_caller]
pub fn check_y(n: usize, inc: isize, len: usize) {
    if inc == 0 {
        BlasError::ZeroIncY.raise();
    }
    if !fits(n, inc, len) {
        BlasError::BadY.raise();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_stride() {
        let s = Strided::new(4, 3);
        assert_eq!(s.start(), 0);
        assert_eq!((0..4).map(|i| s.at(i)).collect::<Vec<_>>(), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_negative_stride_walks_backwards() {
        let s = Strided::new(4, -2);
        assert_eq!(s.start(), 6);
        assert_eq!((0..4).map(|i| s.at(i)).collect::<Vec<_>>(), vec![6, 4, 2, 0]);
    }

    #[test]
    fn test_empty_vector() {
        assert_eq!(Strided::new(0, -5).start(), 0);
        assert!(fits(0, 7, 0));
    }

    #[test]
    fn test_fits() {
        assert!(fits(3, 2, 5));
        assert!(!fits(3, 2, 4));
        assert!(fits(3, -2, 5));
        assert!(!fits(2, -3, 3));
    }

    #[test]
    #[should_panic(expected = "blas: zero y index increment")]
    fn test_check_y_zero_inc() {
        check_y(3, 0, 10);
    }

    #[test]
    #[should_panic(expected = "blas: x index out of range")]
    fn test_check_x_short() {
        check_x(3, 1, 2);
    }
}
