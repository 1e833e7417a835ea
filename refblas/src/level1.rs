//! BLAS Level 1: Vector-vector operations.
//!
//! Every routine takes `(n, x, incx[, y, incy])` with signed increments.
//! Routines that pair two vectors walk a negative-increment vector backwards
//! from `(n-1)*|inc|`. The single-vector reductions (`dnrm2`, `dasum`,
//! `idamax`) and `dscal` instead treat a negative increment as "no vector"
//! and return their empty result.

use refblas_core::error::BlasError;
use refblas_core::flags::{DrotmParams, RotmFlag};
use refblas_core::stride::{check_x, check_y, fits, Strided};
use refblas_core::vecops;

/// Validate a pair of strided vectors in reference order: zero increments
/// first (x then y), then the extents.
#[inline]
#[track_caller]
fn check_pair(n: usize, x_len: usize, incx: isize, y_len: usize, incy: isize) {
    if incx == 0 {
        BlasError::ZeroIncX.raise();
    }
    if incy == 0 {
        BlasError::ZeroIncY.raise();
    }
    check_x(n, incx, x_len);
    check_y(n, incy, y_len);
}

/// Validate a single vector whose negative increment means "empty".
/// Returns `false` when the routine should return its empty result.
#[inline]
#[track_caller]
fn check_forward(n: usize, x_len: usize, incx: isize) -> bool {
    if incx < 1 {
        if incx == 0 {
            BlasError::ZeroIncX.raise();
        }
        return false;
    }
    if !fits(n, incx, x_len) {
        BlasError::BadX.raise();
    }
    true
}

// ============================================================================
// DOT: inner product
// ============================================================================

/// Double-precision dot product: result = x^T * y
pub fn ddot(n: usize, x: &[f64], incx: isize, y: &[f64], incy: isize) -> f64 {
    check_pair(n, x.len(), incx, y.len(), incy);
    if n == 0 {
        return 0.0;
    }
    if incx == 1 && incy == 1 {
        return vecops::dot_unitary(&x[..n], &y[..n]);
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    vecops::dot_inc(x, y, n, incx, incy, sx.start(), sy.start())
}

// ============================================================================
// NRM2: Euclidean norm
// ============================================================================

/// Euclidean norm `sqrt(sum x_i^2)` without intermediate overflow or underflow.
///
/// Returns 0 for `n == 0` or a negative increment, and NaN as soon as a NaN
/// element is seen.
pub fn dnrm2(n: usize, x: &[f64], incx: isize) -> f64 {
    if !check_forward(n, x.len(), incx) {
        return 0.0;
    }
    match n {
        0 => return 0.0,
        1 => return x[0].abs(),
        _ => {}
    }

    let mut scale = 0.0f64;
    let mut ssq = 1.0f64;
    for &v in x.iter().step_by(incx as usize).take(n) {
        if v == 0.0 {
            continue;
        }
        let absxi = v.abs();
        if absxi.is_nan() {
            return f64::NAN;
        }
        if scale < absxi {
            let r = scale / absxi;
            ssq = 1.0 + ssq * r * r;
            scale = absxi;
        } else {
            let r = absxi / scale;
            ssq += r * r;
        }
    }
    if scale == f64::INFINITY {
        return f64::INFINITY;
    }
    scale * ssq.sqrt()
}

// ============================================================================
// ASUM: sum of absolute values
// ============================================================================

/// `sum |x_i|`; 0 for a negative increment.
pub fn dasum(n: usize, x: &[f64], incx: isize) -> f64 {
    if !check_forward(n, x.len(), incx) {
        return 0.0;
    }
    x.iter().step_by(incx as usize).take(n).map(|v| v.abs()).sum()
}

// ============================================================================
// IAMAX: index of max absolute value
// ============================================================================

/// Index of the first element with the largest magnitude, or -1 when there is
/// no element (`n == 0` or a negative increment).
pub fn idamax(n: usize, x: &[f64], incx: isize) -> isize {
    if !check_forward(n, x.len(), incx) {
        return -1;
    }
    match n {
        0 => return -1,
        1 => return 0,
        _ => {}
    }
    let mut idx = 0;
    let mut max = x[0].abs();
    for (i, v) in x.iter().step_by(incx as usize).take(n).enumerate().skip(1) {
        let a = v.abs();
        if a > max {
            max = a;
            idx = i;
        }
    }
    idx as isize
}

// ============================================================================
// SWAP / COPY
// ============================================================================

/// Exchange `x` and `y` element by element.
pub fn dswap(n: usize, x: &mut [f64], incx: isize, y: &mut [f64], incy: isize) {
    check_pair(n, x.len(), incx, y.len(), incy);
    if n == 0 {
        return;
    }
    if incx == 1 && incy == 1 {
        x[..n].swap_with_slice(&mut y[..n]);
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        std::mem::swap(&mut x[sx.at(i)], &mut y[sy.at(i)]);
    }
}

/// `y := x`.
pub fn dcopy(n: usize, x: &[f64], incx: isize, y: &mut [f64], incy: isize) {
    check_pair(n, x.len(), incx, y.len(), incy);
    if n == 0 {
        return;
    }
    if incx == 1 && incy == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        y[sy.at(i)] = x[sx.at(i)];
    }
}

// ============================================================================
// AXPY: y = alpha * x + y
// ============================================================================

/// `y := alpha * x + y`. With `alpha == 0` the call validates and returns,
/// leaving `y` bit-for-bit unchanged.
pub fn daxpy(n: usize, alpha: f64, x: &[f64], incx: isize, y: &mut [f64], incy: isize) {
    check_pair(n, x.len(), incx, y.len(), incy);
    if n == 0 || alpha == 0.0 {
        return;
    }
    if incx == 1 && incy == 1 {
        vecops::axpy_unitary(alpha, &x[..n], &mut y[..n]);
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    vecops::axpy_inc(alpha, x, y, n, incx, incy, sx.start(), sy.start());
}

// ============================================================================
// Givens rotations
// ============================================================================

/// Construct the plane rotation that zeroes `b`:
///
/// ```text
/// |  c  s | |a|   |r|
/// | -s  c | |b| = |0|
/// ```
///
/// Returns `(c, s, r, z)`. `r` carries the sign of whichever input has the
/// larger magnitude; `z` is the reconstruction value (`s`, `1/c` or `1`).
pub fn drotg(a: f64, b: f64) -> (f64, f64, f64, f64) {
    if a == 0.0 && b == 0.0 {
        return (1.0, 0.0, a, 0.0);
    }
    let a_gt_b = a.abs() > b.abs();
    let mut r = a.hypot(b);
    r = if a_gt_b { r.copysign(a) } else { r.copysign(b) };
    let c = a / r;
    let s = b / r;
    let z = if a_gt_b {
        s
    } else if c != 0.0 {
        1.0 / c
    } else {
        1.0
    };
    (c, s, r, z)
}

const GAM: f64 = 4096.0;
const GAMSQ: f64 = 16777216.0;
const RGAMSQ: f64 = 5.9604645e-8;

/// Construct the modified Givens transform that zeroes the second component
/// of `(sqrt(d1)*x1, sqrt(d2)*y1)`.
///
/// Returns the transform and the updated `(d1, d2, x1)`. A negative `d1`, or
/// a transform that would need a negative scale, yields `Rescaling` with all
/// outputs zero.
pub fn drotmg(d1: f64, d2: f64, x1: f64, y1: f64) -> (DrotmParams, f64, f64, f64) {
    let mut p = DrotmParams::default();

    if d1 < 0.0 {
        p.flag = RotmFlag::Rescaling;
        return (p, 0.0, 0.0, 0.0);
    }

    let p2 = d2 * y1;
    if p2 == 0.0 {
        p.flag = RotmFlag::Identity;
        return (p, d1, d2, x1);
    }
    let p1 = d1 * x1;
    let q2 = p2 * y1;
    let q1 = p1 * x1;

    if q1.abs() < q2.abs() && q2 < 0.0 {
        p.flag = RotmFlag::Rescaling;
        return (p, 0.0, 0.0, 0.0);
    }

    if d1 == 0.0 {
        p.flag = RotmFlag::Diagonal;
        p.h[0] = p1 / p2;
        p.h[3] = x1 / y1;
        let u = 1.0 + p.h[0] * p.h[3];
        return (p, d2 / u, d1 / u, y1 / u);
    }

    // Both weights are nonzero from here on.
    let (mut rd1, mut rd2, mut rx1) = if q1.abs() > q2.abs() {
        p.flag = RotmFlag::OffDiagonal;
        p.h[1] = -y1 / x1;
        p.h[2] = p2 / p1;
        let u = 1.0 - p.h[2] * p.h[1];
        (d1 / u, d2 / u, x1 * u)
    } else {
        p.flag = RotmFlag::Diagonal;
        p.h[0] = p1 / p2;
        p.h[3] = x1 / y1;
        let u = 1.0 + p.h[0] * p.h[3];
        (d2 / u, d1 / u, y1 * u)
    };

    while rd1 <= RGAMSQ || rd1 >= GAMSQ {
        promote_to_rescaling(&mut p);
        if rd1 <= RGAMSQ {
            rd1 *= GAM * GAM;
            rx1 /= GAM;
            p.h[0] /= GAM;
            p.h[2] /= GAM;
        } else {
            rd1 /= GAM * GAM;
            rx1 *= GAM;
            p.h[0] *= GAM;
            p.h[2] *= GAM;
        }
    }

    while rd2.abs() <= RGAMSQ || rd2.abs() >= GAMSQ {
        promote_to_rescaling(&mut p);
        if rd2.abs() <= RGAMSQ {
            rd2 *= GAM * GAM;
            p.h[1] /= GAM;
            p.h[3] /= GAM;
        } else {
            rd2 /= GAM * GAM;
            p.h[1] *= GAM;
            p.h[3] *= GAM;
        }
    }

    (p, rd1, rd2, rx1)
}

/// Materialize the implied entries so `h` can be scaled as a full matrix.
#[inline]
fn promote_to_rescaling(p: &mut DrotmParams) {
    match p.flag {
        RotmFlag::OffDiagonal => {
            p.h[0] = 1.0;
            p.h[3] = 1.0;
            p.flag = RotmFlag::Rescaling;
        }
        RotmFlag::Diagonal => {
            p.h[1] = -1.0;
            p.h[2] = 1.0;
            p.flag = RotmFlag::Rescaling;
        }
        RotmFlag::Identity | RotmFlag::Rescaling => {}
    }
}

/// Apply a plane rotation: `x' = c*x + s*y`, `y' = c*y - s*x`.
pub fn drot(n: usize, x: &mut [f64], incx: isize, y: &mut [f64], incy: isize, c: f64, s: f64) {
    check_pair(n, x.len(), incx, y.len(), incy);
    if n == 0 {
        return;
    }
    if incx == 1 && incy == 1 {
        for (vx, vy) in x[..n].iter_mut().zip(&mut y[..n]) {
            let (a, b) = (*vx, *vy);
            *vx = c * a + s * b;
            *vy = c * b - s * a;
        }
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        let (ix, iy) = (sx.at(i), sy.at(i));
        let (a, b) = (x[ix], y[iy]);
        x[ix] = c * a + s * b;
        y[iy] = c * b - s * a;
    }
}

/// Apply the modified Givens transform `p` to the 2×n matrix `[x; y]`.
pub fn drotm(n: usize, x: &mut [f64], incx: isize, y: &mut [f64], incy: isize, p: DrotmParams) {
    check_pair(n, x.len(), incx, y.len(), incy);
    if n == 0 || p.flag == RotmFlag::Identity {
        return;
    }
    let [[h11, h12], [h21, h22]] = p.matrix();

    if incx == 1 && incy == 1 {
        for (vx, vy) in x[..n].iter_mut().zip(&mut y[..n]) {
            let (a, b) = (*vx, *vy);
            *vx = a * h11 + b * h12;
            *vy = a * h21 + b * h22;
        }
        return;
    }
    let (sx, sy) = (Strided::new(n, incx), Strided::new(n, incy));
    for i in 0..n {
        let (ix, iy) = (sx.at(i), sy.at(i));
        let (a, b) = (x[ix], y[iy]);
        x[ix] = a * h11 + b * h12;
        y[iy] = a * h21 + b * h22;
    }
}

// ============================================================================
// SCAL: x = alpha * x
// ============================================================================

/// `x := alpha * x`. No effect for a negative increment. `alpha == 0` stores
/// zeros, clearing any NaN or Inf already in `x`.
pub fn dscal(n: usize, alpha: f64, x: &mut [f64], incx: isize) {
    if !check_forward(n, x.len(), incx) || n == 0 {
        return;
    }
    let inc = incx as usize;
    if alpha == 0.0 {
        x.iter_mut().step_by(inc).take(n).for_each(|v| *v = 0.0);
        return;
    }
    if inc == 1 {
        vecops::scal_unitary(alpha, &mut x[..n]);
    } else {
        vecops::scal_inc(alpha, x, n, inc);
    }
}
