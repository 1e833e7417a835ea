//! Inner loops shared by the Level-2 and Level-3 kernels.
//!
//! No validation happens here: callers have already checked strides and
//! lengths. Strided variants take the first touched offset and a signed
//! increment, walking `n` elements from there.

#[inline]
pub fn dot_unitary(x: &[f64], y: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        sum += xi * yi;
    }
    sum
}

/// `sum x[ix + i*incx] * y[iy + i*incy]` for `i in 0..n`.
#[inline]
pub fn dot_inc(
    x: &[f64],
    y: &[f64],
    n: usize,
    incx: isize,
    incy: isize,
    ix: usize,
    iy: usize,
) -> f64 {
    let (mut ix, mut iy) = (ix as isize, iy as isize);
    let mut sum = 0.0;
    for _ in 0..n {
        sum += x[ix as usize] * y[iy as usize];
        ix += incx;
        iy += incy;
    }
    sum
}

/// `y += alpha * x` over matching slices.
#[inline]
pub fn axpy_unitary(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// Strided `y += alpha * x`.
#[inline]
pub fn axpy_inc(
    alpha: f64,
    x: &[f64],
    y: &mut [f64],
    n: usize,
    incx: isize,
    incy: isize,
    ix: usize,
    iy: usize,
) {
    let (mut ix, mut iy) = (ix as isize, iy as isize);
    for _ in 0..n {
        y[iy as usize] += alpha * x[ix as usize];
        ix += incx;
        iy += incy;
    }
}

#[inline]
pub fn scal_unitary(alpha: f64, x: &mut [f64]) {
    for v in x {
        *v *= alpha;
    }
}

/// Strided `x *= alpha` for a positive increment.
#[inline]
pub fn scal_inc(alpha: f64, x: &mut [f64], n: usize, incx: usize) {
    for v in x.iter_mut().step_by(incx).take(n) {
        *v *= alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot() {
        assert_eq!(dot_unitary(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        // x forward by 2, y backward from offset 2.
        let x = [1.0, 0.0, 2.0, 0.0, 3.0];
        let y = [6.0, 5.0, 4.0];
        assert_eq!(dot_inc(&x, &y, 3, 2, -1, 0, 2), 4.0 + 10.0 + 18.0);
    }

    #[test]
    fn test_axpy() {
        let mut y = [1.0, 1.0, 1.0];
        axpy_unitary(2.0, &[1.0, 2.0, 3.0], &mut y);
        assert_eq!(y, [3.0, 5.0, 7.0]);

        let mut y = [0.0; 4];
        axpy_inc(1.0, &[1.0, 2.0], &mut y, 2, 1, 3, 0, 0);
        assert_eq!(y, [1.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_scal() {
        let mut x = [1.0, 2.0, 3.0, 4.0, 5.0];
        scal_inc(10.0, &mut x, 2, 3);
        assert_eq!(x, [10.0, 2.0, 3.0, 40.0, 5.0]);
        scal_unitary(0.5, &mut x[..2]);
        assert_eq!(x[..2], [5.0, 1.0]);
    }
}
