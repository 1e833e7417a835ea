//! Row-major matrix storage: dense, banded and packed.
//!
//! Kernels work directly on caller slices with a leading dimension; the
//! helpers here only encode the addressing and length rules. [`General`] is a
//! small owned dense matrix for callers that want one.

/// True when a `rows × cols` matrix with leading dimension `ld` fits in `len`.
///
/// Does not check `ld >= cols`; kernels report that separately.
#[inline]
pub fn dense_fits(rows: usize, cols: usize, ld: usize, len: usize) -> bool {
    rows == 0 || cols == 0 || ld * (rows - 1) + cols <= len
}

/// Minimum length of a general band matrix with `rows` rows and `kl`/`ku`
/// sub/super-diagonals. Rows past `n + kl` hold no entries.
#[inline]
pub fn band_len(rows: usize, cols: usize, kl: usize, ku: usize, ld: usize) -> usize {
    let used = rows.min(cols + kl);
    if used == 0 {
        0
    } else {
        ld * (used - 1) + kl + ku + 1
    }
}

/// Half-open compacted column window `[l, u)` of row `i` of a general band
/// matrix with `n` columns, and the dense column of compacted column `l`.
#[inline]
pub fn band_window(i: usize, n: usize, kl: usize, ku: usize) -> (usize, usize, usize) {
    let l = kl.saturating_sub(i);
    let u = (kl + ku + 1).min(n + kl - i.min(n + kl));
    let off = i.saturating_sub(kl);
    (l, u.max(l), off)
}

/// Number of elements in a packed `n × n` triangle.
#[inline(always)]
pub const fn packed_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Offset of `A[i, i]` in upper packed storage.
#[inline(always)]
pub const fn packed_upper_diag(n: usize, i: usize) -> usize {
    i * (2 * n - i + 1) / 2
}

/// Offset of `A[i, i]` in lower packed storage.
#[inline(always)]
pub const fn packed_lower_diag(i: usize) -> usize {
    i * (i + 1) / 2 + i
}

/// Owned row-major dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct General {
    pub rows: usize,
    pub cols: usize,
    pub ld: usize,
    pub data: Vec<f64>,
}

impl General {
    /// Zero matrix with `ld == cols`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ld: cols.max(1),
            data: vec![0.0; rows * cols.max(1)],
        }
    }

    /// Wrap tightly packed row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "General::from_vec: shape mismatch");
        Self {
            rows,
            cols,
            ld: cols.max(1),
            data,
        }
    }

    #[inline(always)]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.ld + j]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.ld + j] = v;
    }

    /// Explicit transpose copy.
    pub fn transposed(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t.set(j, i, self.at(i, j));
            }
        }
        t
    }

    /// Same shape and every pair of entries within `tol`.
    pub fn equal_within_abs(&self, other: &Self, tol: f64) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        (0..self.rows)
            .all(|i| (0..self.cols).all(|j| (self.at(i, j) - other.at(i, j)).abs() <= tol))
    }
}
