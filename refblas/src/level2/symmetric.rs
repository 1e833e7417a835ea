//! Symmetric matrix-vector products and rank updates.
//!
//! Only the `uplo` triangle is read or written. A stored off-diagonal
//! `A[i, j]` contributes to both `y[i]` and `y[j]` in a single pass.

use refblas_core::error::BlasError;
use refblas_core::flags::Uplo;
use refblas_core::matrix::{dense_fits, packed_len};
use refblas_core::stride::{check_x, check_y, Strided};

use super::{BandTri, DenseTri, PackedTri, TriLayout};
use crate::level1::dscal;

/// `y := alpha * A * x + beta * y` for symmetric `A` held in layout `l`.
fn symv<L: TriLayout>(
    l: &L,
    n: usize,
    alpha: f64,
    a: &[f64],
    x: &[f64],
    incx: isize,
    beta: f64,
    y: &mut [f64],
    incy: isize,
) {
    if n == 0 || (alpha == 0.0 && beta == 1.0) {
        return;
    }
    if beta != 1.0 {
        dscal(n, beta, y, incy.abs());
    }
    if alpha == 0.0 {
        return;
    }

    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        let tmp = alpha * x[sx.at(i)];
        let mut sum = 0.0;
        for j in l.cols(i).filter(|&j| j != i) {
            let v = a[l.index(i, j)];
            y[sy.at(j)] += tmp * v;
            sum += v * x[sx.at(j)];
        }
        y[sy.at(i)] += tmp * a[l.index(i, i)] + alpha * sum;
    }
}

/// `A += alpha * x * x^T` on the stored triangle. Rows whose `alpha*x[i]`
/// is zero are skipped.
fn syr<L: TriLayout>(l: &L, n: usize, alpha: f64, x: &[f64], incx: isize, a: &mut [f64]) {
    let sx = Strided::new(n, incx);
    for i in 0..n {
        let tmp = alpha * x[sx.at(i)];
        if tmp == 0.0 {
            continue;
        }
        for j in l.cols(i) {
            a[l.index(i, j)] += tmp * x[sx.at(j)];
        }
    }
}

/// `A += alpha * x * y^T + alpha * y * x^T` on the stored triangle.
fn syr2<L: TriLayout>(
    l: &L,
    n: usize,
    alpha: f64,
    x: &[f64],
    incx: isize,
    y: &[f64],
    incy: isize,
    a: &mut [f64],
) {
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        let tmpx = alpha * x[sx.at(i)];
        let tmpy = alpha * y[sy.at(i)];
        for j in l.cols(i) {
            a[l.index(i, j)] += tmpx * y[sy.at(j)] + tmpy * x[sx.at(j)];
        }
    }
}

#[track_caller]
fn check_xy(n: usize, x: &[f64], incx: isize, y: &[f64], incy: isize) {
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    if incy == 0 {
        BlasError::ZeroIncY.raise();
    }
    check_x(n, incx, x.len());
    check_y(n, incy, y.len());
}

#[track_caller]
fn check_dense_a(n: usize, a_len: usize, lda: usize) {
    if lda < n.max(1) || !dense_fits(n, n, lda, a_len) {
        BlasError::BadLdA.raise();
    }
}

// ============================================================================
// SYMV / SBMV / SPMV
// ============================================================================

/// Symmetric matrix-vector multiply: `y := alpha * A * x + beta * y`.
pub fn dsymv(
    uplo: Uplo,
    n: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    x: &[f64],
    incx: isize,
    beta: f64,
    y: &mut [f64],
    incy: isize,
) {
    if lda < n.max(1) {
        BlasError::BadLdA.raise();
    }
    check_xy(n, x, incx, y, incy);
    check_dense_a(n, a.len(), lda);
    symv(&DenseTri { n, lda, uplo }, n, alpha, a, x, incx, beta, y, incy);
}

/// Symmetric band multiply with `k` off-diagonals.
pub fn dsbmv(
    uplo: Uplo,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    x: &[f64],
    incx: isize,
    beta: f64,
    y: &mut [f64],
    incy: isize,
) {
    if lda < k + 1 {
        BlasError::BadLdA.raise();
    }
    check_xy(n, x, incx, y, incy);
    if n > 0 && a.len() < lda * (n - 1) + k + 1 {
        BlasError::BadLdA.raise();
    }
    symv(&BandTri { n, k, lda, uplo }, n, alpha, a, x, incx, beta, y, incy);
}

/// Symmetric packed multiply.
pub fn dspmv(
    uplo: Uplo,
    n: usize,
    alpha: f64,
    ap: &[f64],
    x: &[f64],
    incx: isize,
    beta: f64,
    y: &mut [f64],
    incy: isize,
) {
    check_xy(n, x, incx, y, incy);
    if ap.len() < packed_len(n) {
        BlasError::BadLdA.raise();
    }
    symv(&PackedTri { n, uplo }, n, alpha, ap, x, incx, beta, y, incy);
}

// ============================================================================
// SYR / SPR: rank-1 updates
// ============================================================================

/// Symmetric rank-1 update `A += alpha * x * x^T`, `uplo` triangle only.
pub fn dsyr(uplo: Uplo, n: usize, alpha: f64, x: &[f64], incx: isize, a: &mut [f64], lda: usize) {
    if lda < n.max(1) {
        BlasError::BadLdA.raise();
    }
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    check_x(n, incx, x.len());
    check_dense_a(n, a.len(), lda);
    if n == 0 || alpha == 0.0 {
        return;
    }
    syr(&DenseTri { n, lda, uplo }, n, alpha, x, incx, a);
}

/// Packed rank-1 update `A += alpha * x * x^T`.
pub fn dspr(uplo: Uplo, n: usize, alpha: f64, x: &[f64], incx: isize, ap: &mut [f64]) {
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    check_x(n, incx, x.len());
    if ap.len() < packed_len(n) {
        BlasError::BadLdA.raise();
    }
    if n == 0 || alpha == 0.0 {
        return;
    }
    syr(&PackedTri { n, uplo }, n, alpha, x, incx, ap);
}

// ============================================================================
// SYR2 / SPR2: rank-2 updates
// ============================================================================

/// Symmetric rank-2 update `A += alpha * (x * y^T + y * x^T)`.
pub fn dsyr2(
    uplo: Uplo,
    n: usize,
    alpha: f64,
    x: &[f64],
    incx: isize,
    y: &[f64],
    incy: isize,
    a: &mut [f64],
    lda: usize,
) {
    if lda < n.max(1) {
        BlasError::BadLdA.raise();
    }
    check_xy(n, x, incx, y, incy);
    check_dense_a(n, a.len(), lda);
    if n == 0 || alpha == 0.0 {
        return;
    }
    syr2(&DenseTri { n, lda, uplo }, n, alpha, x, incx, y, incy, a);
}

/// Packed rank-2 update `A += alpha * (x * y^T + y * x^T)`.
pub fn dspr2(
    uplo: Uplo,
    n: usize,
    alpha: f64,
    x: &[f64],
    incx: isize,
    y: &[f64],
    incy: isize,
    ap: &mut [f64],
) {
    check_xy(n, x, incx, y, incy);
    if ap.len() < packed_len(n) {
        BlasError::BadLdA.raise();
    }
    if n == 0 || alpha == 0.0 {
        return;
    }
    syr2(&PackedTri { n, uplo }, n, alpha, x, incx, y, incy, ap);
}
