//! General and general-band matrix-vector kernels.

use refblas_core::error::BlasError;
use refblas_core::flags::Transpose;
use refblas_core::matrix::{band_len, band_window, dense_fits};
use refblas_core::stride::{check_x, check_y, Strided};
use refblas_core::vecops;

use crate::level1::dscal;

/// Zero increments first, then the `x`/`y` extents.
#[track_caller]
fn check_xy(len_x: usize, x: &[f64], incx: isize, len_y: usize, y: &[f64], incy: isize) {
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    if incy == 0 {
        BlasError::ZeroIncY.raise();
    }
    check_x(len_x, incx, x.len());
    check_y(len_y, incy, y.len());
}

// ============================================================================
// GEMV: y = alpha * op(A) * x + beta * y
// ============================================================================

/// General matrix-vector multiply for an `m × n` row-major `A`:
///
/// `y := alpha * A * x + beta * y` or `y := alpha * A^T * x + beta * y`.
///
/// `x` has `n` elements (`m` when transposed) and `y` the other dimension.
pub fn dgemv(
    trans: Transpose,
    m: usize,
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
    let (len_x, len_y) = if trans.is_trans() { (m, n) } else { (n, m) };
    check_xy(len_x, x, incx, len_y, y, incy);
    if !dense_fits(m, n, lda, a.len()) {
        BlasError::BadLdA.raise();
    }

    if m == 0 || n == 0 || (alpha == 0.0 && beta == 1.0) {
        return;
    }

    dscal(len_y, beta, y, incy.abs());
    if alpha == 0.0 {
        return;
    }

    let (sx, sy) = (Strided::new(len_x, incx), Strided::new(len_y, incy));
    if !trans.is_trans() {
        for i in 0..m {
            let row = &a[i * lda..i * lda + n];
            let dot = if incx == 1 {
                vecops::dot_unitary(row, &x[..n])
            } else {
                vecops::dot_inc(row, x, n, 1, incx, 0, sx.start())
            };
            y[sy.at(i)] += alpha * dot;
        }
        return;
    }

    for i in 0..m {
        let tmp = alpha * x[sx.at(i)];
        if tmp == 0.0 {
            continue;
        }
        let row = &a[i * lda..i * lda + n];
        if incy == 1 {
            vecops::axpy_unitary(tmp, row, &mut y[..n]);
        } else {
            vecops::axpy_inc(tmp, row, y, n, 1, incy, 0, sy.start());
        }
    }
}

// ============================================================================
// GER: A = alpha * x * y^T + A
// ============================================================================

/// Rank-one update of an `m × n` matrix: `A += alpha * x * y^T`.
pub fn dger(
    m: usize,
    n: usize,
    alpha: f64,
    x: &[f64],
    incx: isize,
    y: &[f64],
    incy: isize,
    a: &mut [f64],
    lda: usize,
) {
    check_xy(m, x, incx, n, y, incy);
    if lda < n.max(1) || !dense_fits(m, n, lda, a.len()) {
        BlasError::BadLdA.raise();
    }
    if m == 0 || n == 0 || alpha == 0.0 {
        return;
    }

    let (sx, sy) = (Strided::new(m, incx), Strided::new(n, incy));
    for i in 0..m {
        let tmp = alpha * x[sx.at(i)];
        if tmp == 0.0 {
            continue;
        }
        let row = &mut a[i * lda..i * lda + n];
        if incy == 1 {
            vecops::axpy_unitary(tmp, &y[..n], row);
        } else {
            vecops::axpy_inc(tmp, y, row, n, incy, 1, sy.start(), 0);
        }
    }
}

// ============================================================================
// GBMV: banded y = alpha * op(A) * x + beta * y
// ============================================================================

/// Band matrix-vector multiply. `A` is `m × n` with `kl` sub-diagonals and
/// `ku` super-diagonals; row `i` of `a` holds `A[i, i-kl..=i+ku]` in columns
/// `0..kl+ku+1`. Columns beyond `n` are never read.
pub fn dgbmv(
    trans: Transpose,
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    x: &[f64],
    incx: isize,
    beta: f64,
    y: &mut [f64],
    incy: isize,
) {
    if lda < kl + ku + 1 {
        BlasError::BadLdA.raise();
    }
    let (len_x, len_y) = if trans.is_trans() { (m, n) } else { (n, m) };
    check_xy(len_x, x, incx, len_y, y, incy);
    if a.len() < band_len(m, n, kl, ku, lda) {
        BlasError::BadLdA.raise();
    }

    if m == 0 || n == 0 || (alpha == 0.0 && beta == 1.0) {
        return;
    }

    dscal(len_y, beta, y, incy.abs());
    if alpha == 0.0 {
        return;
    }

    // Rows past n + kl have an empty window and no storage.
    let rows = m.min(n + kl);
    let (sx, sy) = (Strided::new(len_x, incx), Strided::new(len_y, incy));
    if !trans.is_trans() {
        for i in 0..rows {
            let (l, u, off) = band_window(i, n, kl, ku);
            let row = &a[i * lda + l..i * lda + u];
            let mut sum = 0.0;
            for (t, v) in row.iter().enumerate() {
                sum += x[sx.at(off + t)] * v;
            }
            y[sy.at(i)] += sum * alpha;
        }
        return;
    }

    for i in 0..rows {
        let (l, u, off) = band_window(i, n, kl, ku);
        let tmp = alpha * x[sx.at(i)];
        for (t, v) in a[i * lda + l..i * lda + u].iter().enumerate() {
            y[sy.at(off + t)] += tmp * v;
        }
    }
}
