//! BLAS Level 2: Matrix-vector operations.
//!
//! Every routine validates its arguments, takes the quick return when the
//! call is a no-op, scales `y` by `beta` and then accumulates `alpha*op(A)*x`
//! straight from row-major storage. Transposed products never materialize
//! `A^T`: they switch from row dot products to row axpys instead.
//!
//! Triangular and symmetric matrices come in three storage schemes (dense
//! with a leading dimension, band, packed). The kernels are written once
//! against [`TriLayout`], which maps `(i, j)` of the stored triangle to a
//! buffer offset.

use std::ops::Range;

use refblas_core::flags::Uplo;
use refblas_core::matrix::{packed_lower_diag, packed_upper_diag};

pub mod general;
pub mod symmetric;
pub mod triangular;

pub use general::{dgbmv, dgemv, dger};
pub use symmetric::{dsbmv, dspmv, dspr, dspr2, dsymv, dsyr, dsyr2};
pub use triangular::{dtbmv, dtbsv, dtpmv, dtpsv, dtrmv, dtrsv};

/// Addressing of one stored triangle of an `n × n` matrix.
pub(crate) trait TriLayout {
    /// Columns of row `i` that are stored, diagonal included.
    fn cols(&self, i: usize) -> Range<usize>;
    /// Buffer offset of `A[i, j]` for `j` in `cols(i)`.
    fn index(&self, i: usize, j: usize) -> usize;
}

/// Triangle of a dense row-major matrix.
pub(crate) struct DenseTri {
    pub n: usize,
    pub lda: usize,
    pub uplo: Uplo,
}

impl TriLayout for DenseTri {
    #[inline(always)]
    fn cols(&self, i: usize) -> Range<usize> {
        match self.uplo {
            Uplo::Upper => i..self.n,
            Uplo::Lower => 0..i + 1,
        }
    }

    #[inline(always)]
    fn index(&self, i: usize, j: usize) -> usize {
        i * self.lda + j
    }
}

/// Triangle with `k` off-diagonals in band storage. Upper rows hold
/// `A[i, i..=i+k]` from column 0; lower rows hold `A[i, i-k..=i]` with the
/// diagonal at column `k`.
pub(crate) struct BandTri {
    pub n: usize,
    pub k: usize,
    pub lda: usize,
    pub uplo: Uplo,
}

impl TriLayout for BandTri {
    #[inline(always)]
    fn cols(&self, i: usize) -> Range<usize> {
        match self.uplo {
            Uplo::Upper => i..self.n.min(i + self.k + 1),
            Uplo::Lower => i.saturating_sub(self.k)..i + 1,
        }
    }

    #[inline(always)]
    fn index(&self, i: usize, j: usize) -> usize {
        match self.uplo {
            Uplo::Upper => i * self.lda + (j - i),
            Uplo::Lower => i * self.lda + self.k + j - i,
        }
    }
}

/// Row-major packed triangle of `n(n+1)/2` elements.
pub(crate) struct PackedTri {
    pub n: usize,
    pub uplo: Uplo,
}

impl TriLayout for PackedTri {
    #[inline(always)]
    fn cols(&self, i: usize) -> Range<usize> {
        match self.uplo {
            Uplo::Upper => i..self.n,
            Uplo::Lower => 0..i + 1,
        }
    }

    #[inline(always)]
    fn index(&self, i: usize, j: usize) -> usize {
        match self.uplo {
            Uplo::Upper => packed_upper_diag(self.n, i) + (j - i),
            Uplo::Lower => packed_lower_diag(i) - i + j,
        }
    }
}

/// Lay out logical `v` with increment `inc`, `fill` in the gaps.
#[cfg(test)]
pub(crate) fn spread(v: &[f64], inc: isize, fill: f64) -> Vec<f64> {
    let n = v.len();
    let mut buf = vec![fill; (n.max(1) - 1) * inc.unsigned_abs() + 1];
    let sv = refblas_core::stride::Strided::new(n, inc);
    for (i, &val) in v.iter().enumerate() {
        buf[sv.at(i)] = val;
    }
    buf
}

/// Read back the `n` logical elements of a strided buffer.
#[cfg(test)]
pub(crate) fn gather(buf: &[f64], n: usize, inc: isize) -> Vec<f64> {
    let sv = refblas_core::stride::Strided::new(n, inc);
    (0..n).map(|i| buf[sv.at(i)]).collect()
}
