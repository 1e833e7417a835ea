//! Triangular multiply and solve in dense, band and packed storage.
//!
//! The loop direction depends on `(uplo, trans)` so that each element of `x`
//! is overwritten only after every element that reads its old value is done.
//! Solves perform no singularity check: a zero on a non-unit diagonal yields
//! Inf/NaN per IEEE-754.

use refblas_core::error::BlasError;
use refblas_core::flags::{Diag, Transpose, Uplo};
use refblas_core::matrix::{dense_fits, packed_len};
use refblas_core::stride::{check_x, Strided};

use super::{BandTri, DenseTri, PackedTri, TriLayout};

/// `x := op(A) * x`.
fn trmv<L: TriLayout>(
    l: &L,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[f64],
    x: &mut [f64],
    incx: isize,
) {
    let sx = Strided::new(n, incx);
    let nonunit = diag == Diag::NonUnit;

    if !trans.is_trans() {
        let mut row = |i: usize| {
            let xi = sx.at(i);
            let mut sum = if nonunit { a[l.index(i, i)] * x[xi] } else { x[xi] };
            for j in l.cols(i).filter(|&j| j != i) {
                sum += a[l.index(i, j)] * x[sx.at(j)];
            }
            x[xi] = sum;
        };
        match uplo {
            Uplo::Upper => (0..n).for_each(&mut row),
            Uplo::Lower => (0..n).rev().for_each(&mut row),
        }
        return;
    }

    let mut col = |i: usize| {
        let xi = sx.at(i);
        let tmp = x[xi];
        for j in l.cols(i).filter(|&j| j != i) {
            x[sx.at(j)] += tmp * a[l.index(i, j)];
        }
        if nonunit {
            x[xi] *= a[l.index(i, i)];
        }
    };
    match uplo {
        Uplo::Upper => (0..n).rev().for_each(&mut col),
        Uplo::Lower => (0..n).for_each(&mut col),
    }
}

/// Solve `op(A) * x = b`, overwriting `x` (holding `b`) with the solution.
fn trsv<L: TriLayout>(
    l: &L,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[f64],
    x: &mut [f64],
    incx: isize,
) {
    let sx = Strided::new(n, incx);
    let nonunit = diag == Diag::NonUnit;

    if !trans.is_trans() {
        let mut row = |i: usize| {
            let xi = sx.at(i);
            let mut sum = x[xi];
            for j in l.cols(i).filter(|&j| j != i) {
                sum -= a[l.index(i, j)] * x[sx.at(j)];
            }
            if nonunit {
                sum /= a[l.index(i, i)];
            }
            x[xi] = sum;
        };
        match uplo {
            Uplo::Upper => (0..n).rev().for_each(&mut row),
            Uplo::Lower => (0..n).for_each(&mut row),
        }
        return;
    }

    let mut col = |i: usize| {
        let xi = sx.at(i);
        if nonunit {
            x[xi] /= a[l.index(i, i)];
        }
        let tmp = x[xi];
        for j in l.cols(i).filter(|&j| j != i) {
            x[sx.at(j)] -= tmp * a[l.index(i, j)];
        }
    };
    match uplo {
        Uplo::Upper => (0..n).for_each(&mut col),
        Uplo::Lower => (0..n).rev().for_each(&mut col),
    }
}

#[track_caller]
fn check_dense(n: usize, a: &[f64], lda: usize, x: &[f64], incx: isize) {
    if lda < n.max(1) {
        BlasError::BadLdA.raise();
    }
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    check_x(n, incx, x.len());
    if !dense_fits(n, n, lda, a.len()) {
        BlasError::BadLdA.raise();
    }
}

#[track_caller]
fn check_band(n: usize, k: usize, a: &[f64], lda: usize, x: &[f64], incx: isize) {
    if lda < k + 1 {
        BlasError::BadLdA.raise();
    }
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    check_x(n, incx, x.len());
    if n > 0 && a.len() < lda * (n - 1) + k + 1 {
        BlasError::BadLdA.raise();
    }
}

#[track_caller]
fn check_packed(n: usize, ap: &[f64], x: &[f64], incx: isize) {
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    check_x(n, incx, x.len());
    if ap.len() < packed_len(n) {
        BlasError::BadLdA.raise();
    }
}

// ============================================================================
// Dense storage
// ============================================================================

/// Triangular matrix-vector multiply: `x := op(A) * x` for an `n × n`
/// triangular `A` stored in the `uplo` triangle of a dense matrix.
pub fn dtrmv(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[f64],
    lda: usize,
    x: &mut [f64],
    incx: isize,
) {
    check_dense(n, a, lda, x, incx);
    if n == 0 {
        return;
    }
    trmv(&DenseTri { n, lda, uplo }, uplo, trans, diag, n, a, x, incx);
}

/// Triangular solve: `x := op(A)^-1 * x`.
pub fn dtrsv(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[f64],
    lda: usize,
    x: &mut [f64],
    incx: isize,
) {
    check_dense(n, a, lda, x, incx);
    if n == 0 {
        return;
    }
    trsv(&DenseTri { n, lda, uplo }, uplo, trans, diag, n, a, x, incx);
}

// ============================================================================
// Band storage
// ============================================================================

/// Triangular band multiply, `k` off-diagonals.
pub fn dtbmv(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    x: &mut [f64],
    incx: isize,
) {
    check_band(n, k, a, lda, x, incx);
    if n == 0 {
        return;
    }
    trmv(&BandTri { n, k, lda, uplo }, uplo, trans, diag, n, a, x, incx);
}

/// Triangular band solve, `k` off-diagonals.
pub fn dtbsv(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    x: &mut [f64],
    incx: isize,
) {
    check_band(n, k, a, lda, x, incx);
    if n == 0 {
        return;
    }
    trsv(&BandTri { n, k, lda, uplo }, uplo, trans, diag, n, a, x, incx);
}

// ============================================================================
// Packed storage
// ============================================================================

/// Packed triangular multiply `x := op(A) * x`.
pub fn dtpmv(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[f64],
    x: &mut [f64],
    incx: isize,
) {
    check_packed(n, ap, x, incx);
    if n == 0 {
        return;
    }
    trmv(&PackedTri { n, uplo }, uplo, trans, diag, n, ap, x, incx);
}

/// Packed triangular solve `op(A) * x = b`, `x` overwriting `b`.
pub fn dtpsv(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[f64],
    x: &mut [f64],
    incx: isize,
) {
    check_packed(n, ap, x, incx);
    if n == 0 {
        return;
    }
    trsv(&PackedTri { n, uplo }, uplo, trans, diag, n, ap, x, incx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level2::{gather, spread};
    use refblas_core::rng::SplitMix64;

    const UPLOS: [Uplo; 2] = [Uplo::Upper, Uplo::Lower];
    const TRANS: [Transpose; 2] = [Transpose::NoTrans, Transpose::Trans];
    const DIAGS: [Diag; 2] = [Diag::NonUnit, Diag::Unit];

    fn assert_close(got: &[f64], want: &[f64], tol: f64) {
        assert_eq!(got.len(), want.len());
        for (i, (g, w)) in got.iter().zip(want).enumerate() {
            assert!((g - w).abs() <= tol, "index {i}: got {g}, want {w}");
        }
    }

    /// Dense reference for `op(T) * x` built from the selected triangle only.
    fn naive_trmv(
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        n: usize,
        a: &[f64],
        lda: usize,
        x: &[f64],
    ) -> Vec<f64> {
        let t = |i: usize, j: usize| -> f64 {
            let (r, c) = if trans.is_trans() { (j, i) } else { (i, j) };
            let inside = match uplo {
                Uplo::Upper => c >= r,
                Uplo::Lower => c <= r,
            };
            if r == c && diag == Diag::Unit {
                1.0
            } else if inside {
                a[r * lda + c]
            } else {
                0.0
            }
        };
        (0..n).map(|i| (0..n).map(|j| t(i, j) * x[j]).sum::<f64>()).collect()
    }

    fn to_packed(uplo: Uplo, n: usize, a: &[f64]) -> Vec<f64> {
        let l = PackedTri { n, uplo };
        let mut ap = vec![0.0; packed_len(n)];
        for i in 0..n {
            for j in l.cols(i) {
                ap[l.index(i, j)] = a[i * n + j];
            }
        }
        ap
    }

    fn to_band(uplo: Uplo, n: usize, k: usize, a: &[f64]) -> Vec<f64> {
        let l = BandTri { n, k, lda: k + 1, uplo };
        let mut ab = vec![f64::NAN; n * (k + 1)];
        for i in 0..n {
            for j in l.cols(i) {
                ab[l.index(i, j)] = a[i * n + j];
            }
        }
        ab
    }

    /// Zero everything outside the band of width `k` around the diagonal.
    fn band_limit(n: usize, k: usize, a: &mut [f64]) {
        for i in 0..n {
            for j in 0..n {
                if i.abs_diff(j) > k {
                    a[i * n + j] = 0.0;
                }
            }
        }
    }

    #[test]
    fn test_dtrmv_upper_notrans() {
        // [1 2; 0 3] * [1, 1] = [3, 3]
        let a = vec![1.0, 2.0, 99.0, 3.0];
        let mut x = vec![1.0, 1.0];
        dtrmv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 2, &a, 2, &mut x, 1);
        assert_eq!(x, vec![3.0, 3.0]);
    }

    #[test]
    fn test_dtrmv_matches_naive() {
        let n = 6;
        let mut rng = SplitMix64::new(11);
        let a = rng.vec(n * n);
        let x0 = rng.vec(n);
        for uplo in UPLOS {
            for trans in TRANS {
                for diag in DIAGS {
                    let want = naive_trmv(uplo, trans, diag, n, &a, n, &x0);
                    let mut x = x0.clone();
                    dtrmv(uplo, trans, diag, n, &a, n, &mut x, 1);
                    assert_close(&x, &want, 1e-13);

                    // Same product through a reversed strided vector.
                    let mut xs = vec![0.0; 2 * n - 1];
                    for i in 0..n {
                        xs[2 * (n - 1 - i)] = x0[i];
                    }
                    dtrmv(uplo, trans, diag, n, &a, n, &mut xs, -2);
                    let back: Vec<f64> = (0..n).map(|i| xs[2 * (n - 1 - i)]).collect();
                    assert_close(&back, &want, 1e-13);
                }
            }
        }
    }

    #[test]
    fn test_dtrsv_inverts_dtrmv() {
        let n = 7;
        let mut rng = SplitMix64::new(5);
        let a = rng.diag_dominant(n).data;
        let b = rng.vec(n);
        for uplo in UPLOS {
            for trans in TRANS {
                for diag in DIAGS {
                    let mut x = b.clone();
                    dtrsv(uplo, trans, diag, n, &a, n, &mut x, 1);
                    dtrmv(uplo, trans, diag, n, &a, n, &mut x, 1);
                    assert_close(&x, &b, 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_dtrsv_zero_pivot_gives_inf() {
        let a = vec![0.0, 1.0, 0.0, 1.0];
        let mut x = vec![1.0, 1.0];
        dtrsv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 2, &a, 2, &mut x, 1);
        assert!(x[0].is_infinite() || x[0].is_nan());
    }

    #[test]
    fn test_packed_matches_dense() {
        let n = 5;
        let mut rng = SplitMix64::new(17);
        let a = rng.diag_dominant(n).data;
        let x0 = rng.vec(n);
        for uplo in UPLOS {
            let ap = to_packed(uplo, n, &a);
            for trans in TRANS {
                for diag in DIAGS {
                    let mut want = x0.clone();
                    let mut got = x0.clone();
                    dtrmv(uplo, trans, diag, n, &a, n, &mut want, 1);
                    dtpmv(uplo, trans, diag, n, &ap, &mut got, 1);
                    assert_eq!(got, want);

                    dtrsv(uplo, trans, diag, n, &a, n, &mut want, 1);
                    dtpsv(uplo, trans, diag, n, &ap, &mut got, 1);
                    assert_eq!(got, want);

                    // Backwards walk with gaps that must stay unread.
                    let naive = naive_trmv(uplo, trans, diag, n, &a, n, &x0);
                    let mut xs = spread(&x0, -2, f64::NAN);
                    dtpmv(uplo, trans, diag, n, &ap, &mut xs, -2);
                    assert_close(&gather(&xs, n, -2), &naive, 1e-13);
                    dtpsv(uplo, trans, diag, n, &ap, &mut xs, -2);
                    assert_close(&gather(&xs, n, -2), &x0, 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_band_matches_dense() {
        let (n, k) = (6, 2);
        let mut rng = SplitMix64::new(23);
        let mut a = rng.diag_dominant(n).data;
        band_limit(n, k, &mut a);
        let x0 = rng.vec(n);
        for uplo in UPLOS {
            let ab = to_band(uplo, n, k, &a);
            for trans in TRANS {
                for diag in DIAGS {
                    let mut want = naive_trmv(uplo, trans, diag, n, &a, n, &x0);
                    let mut got = x0.clone();
                    dtbmv(uplo, trans, diag, n, k, &ab, k + 1, &mut got, 1);
                    assert_close(&got, &want, 1e-13);

                    let mut xs = spread(&x0, -3, f64::NAN);
                    dtbmv(uplo, trans, diag, n, k, &ab, k + 1, &mut xs, -3);
                    assert_close(&gather(&xs, n, -3), &want, 1e-13);
                    dtbsv(uplo, trans, diag, n, k, &ab, k + 1, &mut xs, -3);
                    assert_close(&gather(&xs, n, -3), &x0, 1e-12);

                    dtbsv(uplo, trans, diag, n, k, &ab, k + 1, &mut got, 1);
                    dtrsv(uplo, trans, diag, n, &a, n, &mut want, 1);
                    assert_close(&got, &x0, 1e-12);
                    assert_close(&want, &x0, 1e-12);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "blas: zero x index increment")]
    fn test_dtrmv_zero_inc() {
        dtrmv(Uplo::Upper, Transpose::NoTrans, Diag::Unit, 2, &[1.0; 4], 2, &mut [1.0; 2], 0);
    }

    #[test]
    #[should_panic(expected = "blas: index of a out of range")]
    fn test_dtpmv_short_packed() {
        dtpmv(Uplo::Lower, Transpose::NoTrans, Diag::Unit, 3, &[1.0; 5], &mut [1.0; 3], 1);
    }
}
