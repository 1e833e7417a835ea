//! BLAS Level 3: Matrix-matrix operations.
//!
//! `dgemm` is blocked and parallel: `C` is cut into `block_size × block_size`
//! tiles that are handed to scoped workers through a bounded queue. Each tile
//! owns disjoint row segments of `C`, split off with `chunks_mut`, so workers
//! need neither locks nor `unsafe`. Every tile walks the k-blocks in
//! ascending order, which keeps the per-element summation order of the serial
//! kernel.
//!
//! The remaining Level-3 routines (`dsymm`, `dsyrk`, `dsyr2k`, `dtrmm`,
//! `dtrsm`) are serial and built on the Level-1/2 kernels.

use refblas_core::error::BlasError;
use refblas_core::flags::{Diag, Side, Transpose, Uplo};
use refblas_core::matrix::dense_fits;
use refblas_core::parallel::{blocks, for_each_job, GemmConfig};
use refblas_core::vecops;
use tracing::{debug, trace};

use crate::level2::{dtrmv, dtrsv};

// ============================================================================
// DGEMM: C := alpha * op(A) * op(B) + beta * C
// ============================================================================

/// Double-precision general matrix multiply on row-major data:
///
/// `C := alpha * op(A) * op(B) + beta * C`
///
/// `op(A)` is `m × k`, `op(B)` is `k × n`, `C` is `m × n`. `beta == 0`
/// overwrites `C` without reading it. Large products run on the process-wide
/// [`GemmConfig::global`] worker pool.
///
/// ```
/// use refblas::level3::dgemm;
/// use refblas::Transpose;
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let b = [5.0, 6.0, 7.0, 8.0];
/// let mut c = [0.0; 4];
/// dgemm(Transpose::NoTrans, Transpose::NoTrans, 2, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2);
/// assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn dgemm(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    beta: f64,
    c: &mut [f64],
    ldc: usize,
) {
    if !check_gemm(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc) {
        return;
    }

    if (alpha == 0.0 || k == 0) && beta == 1.0 {
        return;
    }

    scale_rows(m, n, beta, c, ldc);

    if alpha == 0.0 || k == 0 {
        return;
    }

    let config = GemmConfig::global();
    gemm_tiled(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc, alpha, config);
}

/// Validate the shapes of a gemm call in reference order: leading
/// dimensions of A, B, C, then the buffer extents. Returns `false` when `C`
/// is empty and there is nothing to do.
#[track_caller]
fn check_gemm(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &[f64],
    ldc: usize,
) -> bool {
    let (at, bt) = (trans_a.is_trans(), trans_b.is_trans());
    if lda < if at { m.max(1) } else { k.max(1) } {
        BlasError::BadLdA.raise();
    }
    if ldb < if bt { k.max(1) } else { n.max(1) } {
        BlasError::BadLdB.raise();
    }
    if ldc < n.max(1) {
        BlasError::BadLdC.raise();
    }

    if m == 0 || n == 0 {
        return false;
    }

    let (ra, ca) = if at { (k, m) } else { (m, k) };
    if !dense_fits(ra, ca, lda, a.len()) {
        BlasError::BadLdA.raise();
    }
    let (rb, cb) = if bt { (n, k) } else { (k, n) };
    if !dense_fits(rb, cb, ldb, b.len()) {
        BlasError::BadLdB.raise();
    }
    if !dense_fits(m, n, ldc, c.len()) {
        BlasError::BadLdC.raise();
    }
    true
}

/// `C := beta * C` over an `m × n` window; `beta == 0` stores zeros.
fn scale_rows(m: usize, n: usize, beta: f64, c: &mut [f64], ldc: usize) {
    if beta == 1.0 {
        return;
    }
    for row in c.chunks_mut(ldc).take(m) {
        let row = &mut row[..n];
        if beta == 0.0 {
            row.fill(0.0);
        } else {
            vecops::scal_unitary(beta, row);
        }
    }
}

/// A `block_size × block_size` (or smaller, at the edges) tile of `C`:
/// one mutable segment per row, starting at `C[i, j]`.
struct Tile<'c> {
    i: usize,
    j: usize,
    rows: Vec<&'c mut [f64]>,
}

/// `C += alpha * op(A) * op(B)` split into tiles across `config.workers`.
///
/// Shapes are validated before any tile is dispatched, with the same panics
/// as [`dgemm`]. Falls back to [`dgemm_serial`] when `C` has fewer than
/// `config.min_par_block` tiles.
pub fn dgemm_parallel(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &mut [f64],
    ldc: usize,
    alpha: f64,
    config: &GemmConfig,
) {
    if !check_gemm(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc) {
        return;
    }
    gemm_tiled(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc, alpha, config);
}

fn gemm_tiled(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &mut [f64],
    ldc: usize,
    alpha: f64,
    config: &GemmConfig,
) {
    let bs = config.block_size.max(1);
    let (nb_i, nb_j) = (blocks(m, bs), blocks(n, bs));
    let tiles = nb_i * nb_j;

    if !config.is_parallel(m, n) {
        trace!(m, n, k, tiles, "dgemm: serial");
        gemm_kernel(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc, alpha);
        return;
    }

    let workers = config.workers.min(tiles).max(1);
    let buffer = (config.buff_mul * workers).min(tiles);
    debug!(m, n, k, tiles, workers, buffer, "dgemm: parallel");

    let mut jobs: Vec<Tile<'_>> = (0..tiles)
        .map(|t| Tile {
            i: (t / nb_j) * bs,
            j: (t % nb_j) * bs,
            rows: Vec::with_capacity(bs),
        })
        .collect();
    for (r, row) in c.chunks_mut(ldc).take(m).enumerate() {
        for (jb, seg) in row[..n].chunks_mut(bs).enumerate() {
            jobs[(r / bs) * nb_j + jb].rows.push(seg);
        }
    }

    let (at, bt) = (trans_a.is_trans(), trans_b.is_trans());
    for_each_job(jobs, workers, buffer, |mut tile: Tile<'_>| {
        for kb in (0..k).step_by(bs) {
            let kk = bs.min(k - kb);
            let b_off = if bt { tile.j * ldb + kb } else { kb * ldb + tile.j };
            for (r, seg) in tile.rows.iter_mut().enumerate() {
                let i = tile.i + r;
                let a_off = if at { kb * lda + i } else { i * lda + kb };
                let len = seg.len();
                let (a, b) = (&a[a_off..], &b[b_off..]);
                gemm_kernel(trans_a, trans_b, 1, len, kk, a, lda, b, ldb, seg, len, alpha);
            }
        }
    });
}

/// Unblocked `C += alpha * op(A) * op(B)`, validated like [`dgemm`].
///
/// Loop order depends on the transposes so the innermost loop is always an
/// axpy over a row of `B`, or a dot of two rows when only `B` is transposed.
/// Axpy forms skip terms where `alpha * a` is zero.
pub fn dgemm_serial(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &mut [f64],
    ldc: usize,
    alpha: f64,
) {
    if !check_gemm(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc) {
        return;
    }
    gemm_kernel(trans_a, trans_b, m, n, k, a, lda, b, ldb, c, ldc, alpha);
}

fn gemm_kernel(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &mut [f64],
    ldc: usize,
    alpha: f64,
) {
    match (trans_a.is_trans(), trans_b.is_trans()) {
        (false, false) => {
            for i in 0..m {
                let crow = &mut c[i * ldc..i * ldc + n];
                for (l, &av) in a[i * lda..i * lda + k].iter().enumerate() {
                    let tmp = alpha * av;
                    if tmp != 0.0 {
                        vecops::axpy_unitary(tmp, &b[l * ldb..l * ldb + n], crow);
                    }
                }
            }
        }
        (true, false) => {
            for l in 0..k {
                let brow = &b[l * ldb..l * ldb + n];
                for (i, &av) in a[l * lda..l * lda + m].iter().enumerate() {
                    let tmp = alpha * av;
                    if tmp != 0.0 {
                        vecops::axpy_unitary(tmp, brow, &mut c[i * ldc..i * ldc + n]);
                    }
                }
            }
        }
        (false, true) => {
            for i in 0..m {
                let arow = &a[i * lda..i * lda + k];
                for j in 0..n {
                    c[i * ldc + j] += alpha * vecops::dot_unitary(arow, &b[j * ldb..j * ldb + k]);
                }
            }
        }
        (true, true) => {
            for l in 0..k {
                for (i, &av) in a[l * lda..l * lda + m].iter().enumerate() {
                    let tmp = alpha * av;
                    if tmp != 0.0 {
                        let crow = &mut c[i * ldc..i * ldc + n];
                        vecops::axpy_inc(tmp, b, crow, n, ldb as isize, 1, l, 0);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Shared Level-3 validation
// ============================================================================

#[track_caller]
fn check_ld(rows: usize, cols: usize, ld: usize, len: usize, err: BlasError) {
    if ld < cols.max(1) || !dense_fits(rows, cols, ld, len) {
        err.raise();
    }
}

/// Element `(i, j)` of a symmetric matrix stored in the `uplo` triangle.
#[inline(always)]
fn sym_at(uplo: Uplo, a: &[f64], lda: usize, i: usize, j: usize) -> f64 {
    let stored = match uplo {
        Uplo::Upper => j >= i,
        Uplo::Lower => j <= i,
    };
    if stored {
        a[i * lda + j]
    } else {
        a[j * lda + i]
    }
}

/// Stored columns of row `i` in the `uplo` triangle of an `n × n` matrix.
#[inline(always)]
fn tri_cols(uplo: Uplo, n: usize, i: usize) -> std::ops::Range<usize> {
    match uplo {
        Uplo::Upper => i..n,
        Uplo::Lower => 0..i + 1,
    }
}

/// `C := beta * C` on the `uplo` triangle only.
fn scale_triangle(uplo: Uplo, n: usize, beta: f64, c: &mut [f64], ldc: usize) {
    if beta == 1.0 {
        return;
    }
    for i in 0..n {
        let cols = tri_cols(uplo, n, i);
        let seg = &mut c[i * ldc + cols.start..i * ldc + cols.end];
        if beta == 0.0 {
            seg.fill(0.0);
        } else {
            vecops::scal_unitary(beta, seg);
        }
    }
}

// ============================================================================
// DSYMM: C := alpha * A * B + beta * C  or  alpha * B * A + beta * C
// ============================================================================

/// Symmetric matrix multiply. `A` is symmetric, `m × m` for `Side::Left`
/// and `n × n` for `Side::Right`, and only its `uplo` triangle is read.
pub fn dsymm(
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    beta: f64,
    c: &mut [f64],
    ldc: usize,
) {
    let na = if side == Side::Left { m } else { n };
    if lda < na.max(1) {
        BlasError::BadLdA.raise();
    }
    if ldb < n.max(1) {
        BlasError::BadLdB.raise();
    }
    if ldc < n.max(1) {
        BlasError::BadLdC.raise();
    }
    if m == 0 || n == 0 {
        return;
    }
    check_ld(na, na, lda, a.len(), BlasError::BadLdA);
    check_ld(m, n, ldb, b.len(), BlasError::BadLdB);
    check_ld(m, n, ldc, c.len(), BlasError::BadLdC);

    if alpha == 0.0 && beta == 1.0 {
        return;
    }
    scale_rows(m, n, beta, c, ldc);
    if alpha == 0.0 {
        return;
    }

    for i in 0..m {
        let crow = &mut c[i * ldc..i * ldc + n];
        match side {
            Side::Left => {
                for l in 0..m {
                    let tmp = alpha * sym_at(uplo, a, lda, i, l);
                    if tmp != 0.0 {
                        vecops::axpy_unitary(tmp, &b[l * ldb..l * ldb + n], crow);
                    }
                }
            }
            Side::Right => {
                for l in 0..n {
                    let tmp = alpha * b[i * ldb + l];
                    if tmp == 0.0 {
                        continue;
                    }
                    for (j, cv) in crow.iter_mut().enumerate() {
                        *cv += tmp * sym_at(uplo, a, lda, l, j);
                    }
                }
            }
        }
    }
}

// ============================================================================
// DSYRK / DSYR2K: symmetric rank-k and rank-2k updates
// ============================================================================

/// Symmetric rank-k update of the `uplo` triangle of the `n × n` matrix `C`:
///
/// `C := alpha * A * A^T + beta * C` (`A` is `n × k`) or, transposed,
/// `C := alpha * A^T * A + beta * C` (`A` is `k × n`).
pub fn dsyrk(
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    beta: f64,
    c: &mut [f64],
    ldc: usize,
) {
    let t = trans.is_trans();
    let (ra, ca) = if t { (k, n) } else { (n, k) };
    if lda < ca.max(1) {
        BlasError::BadLdA.raise();
    }
    if ldc < n.max(1) {
        BlasError::BadLdC.raise();
    }
    check_ld(ra, ca, lda, a.len(), BlasError::BadLdA);
    check_ld(n, n, ldc, c.len(), BlasError::BadLdC);

    if n == 0 || ((alpha == 0.0 || k == 0) && beta == 1.0) {
        return;
    }
    scale_triangle(uplo, n, beta, c, ldc);
    if alpha == 0.0 {
        return;
    }

    if !t {
        for i in 0..n {
            let ai = &a[i * lda..i * lda + k];
            for j in tri_cols(uplo, n, i) {
                c[i * ldc + j] += alpha * vecops::dot_unitary(ai, &a[j * lda..j * lda + k]);
            }
        }
        return;
    }
    for l in 0..k {
        let arow = &a[l * lda..l * lda + n];
        for i in 0..n {
            let tmp = alpha * arow[i];
            if tmp == 0.0 {
                continue;
            }
            for j in tri_cols(uplo, n, i) {
                c[i * ldc + j] += tmp * arow[j];
            }
        }
    }
}

/// Symmetric rank-2k update of the `uplo` triangle of `C`:
///
/// `C := alpha * (A * B^T + B * A^T) + beta * C` or, transposed,
/// `C := alpha * (A^T * B + B^T * A) + beta * C`.
pub fn dsyr2k(
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    beta: f64,
    c: &mut [f64],
    ldc: usize,
) {
    let t = trans.is_trans();
    let (rows, cols) = if t { (k, n) } else { (n, k) };
    if lda < cols.max(1) {
        BlasError::BadLdA.raise();
    }
    if ldb < cols.max(1) {
        BlasError::BadLdB.raise();
    }
    if ldc < n.max(1) {
        BlasError::BadLdC.raise();
    }
    check_ld(rows, cols, lda, a.len(), BlasError::BadLdA);
    check_ld(rows, cols, ldb, b.len(), BlasError::BadLdB);
    check_ld(n, n, ldc, c.len(), BlasError::BadLdC);

    if n == 0 || ((alpha == 0.0 || k == 0) && beta == 1.0) {
        return;
    }
    scale_triangle(uplo, n, beta, c, ldc);
    if alpha == 0.0 {
        return;
    }

    if !t {
        for i in 0..n {
            let (ai, bi) = (&a[i * lda..i * lda + k], &b[i * ldb..i * ldb + k]);
            for j in tri_cols(uplo, n, i) {
                let (aj, bj) = (&a[j * lda..j * lda + k], &b[j * ldb..j * ldb + k]);
                let s = vecops::dot_unitary(ai, bj) + vecops::dot_unitary(bi, aj);
                c[i * ldc + j] += alpha * s;
            }
        }
        return;
    }
    for l in 0..k {
        let (arow, brow) = (&a[l * lda..l * lda + n], &b[l * ldb..l * ldb + n]);
        for i in 0..n {
            let (tmpa, tmpb) = (alpha * arow[i], alpha * brow[i]);
            for j in tri_cols(uplo, n, i) {
                c[i * ldc + j] += tmpa * brow[j] + tmpb * arow[j];
            }
        }
    }
}

// ============================================================================
// DTRMM / DTRSM: triangular multiply and solve with many right-hand sides
// ============================================================================

#[track_caller]
fn check_tri3(
    side: Side,
    m: usize,
    n: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
) -> bool {
    let na = if side == Side::Left { m } else { n };
    if lda < na.max(1) {
        BlasError::BadLdA.raise();
    }
    if ldb < n.max(1) {
        BlasError::BadLdB.raise();
    }
    if m == 0 || n == 0 {
        return false;
    }
    check_ld(na, na, lda, a.len(), BlasError::BadLdA);
    check_ld(m, n, ldb, b.len(), BlasError::BadLdB);
    true
}

/// Triangular matrix multiply: `B := alpha * op(A) * B` (`Side::Left`, `A`
/// is `m × m`) or `B := alpha * B * op(A)` (`Side::Right`, `A` is `n × n`).
pub fn dtrmm(
    side: Side,
    uplo: Uplo,
    trans_a: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    b: &mut [f64],
    ldb: usize,
) {
    if !check_tri3(side, m, n, a, lda, b, ldb) {
        return;
    }
    if alpha == 0.0 {
        scale_rows(m, n, 0.0, b, ldb);
        return;
    }

    match side {
        // Columns of B are strided vectors with increment ldb.
        Side::Left => {
            for j in 0..n {
                dtrmv(uplo, trans_a, diag, m, a, lda, &mut b[j..], ldb as isize);
            }
        }
        // (B op(A))^T = op(A)^T B^T, so each row sees the toggled transpose.
        Side::Right => {
            for i in 0..m {
                dtrmv(uplo, trans_a.toggled(), diag, n, a, lda, &mut b[i * ldb..i * ldb + n], 1);
            }
        }
    }
    scale_rows(m, n, alpha, b, ldb);
}

/// Triangular solve with many right-hand sides: solves `op(A) * X = alpha * B`
/// (`Side::Left`) or `X * op(A) = alpha * B` (`Side::Right`), overwriting `B`
/// with `X`. No singularity check.
pub fn dtrsm(
    side: Side,
    uplo: Uplo,
    trans_a: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    b: &mut [f64],
    ldb: usize,
) {
    if !check_tri3(side, m, n, a, lda, b, ldb) {
        return;
    }
    scale_rows(m, n, alpha, b, ldb);
    if alpha == 0.0 {
        return;
    }

    match side {
        Side::Left => {
            for j in 0..n {
                dtrsv(uplo, trans_a, diag, m, a, lda, &mut b[j..], ldb as isize);
            }
        }
        Side::Right => {
            for i in 0..m {
                dtrsv(uplo, trans_a.toggled(), diag, n, a, lda, &mut b[i * ldb..i * ldb + n], 1);
            }
        }
    }
}
