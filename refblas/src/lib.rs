// BLAS functions match CBLAS signatures, so long parameter lists are inherent to the API.
// Numeric kernels use index loops on packed arrays where iterators hurt readability.
#![allow(clippy::too_many_arguments, clippy::needless_range_loop)]

//! # refblas
//!
//! Pure Rust double-precision reference BLAS for row-major data.
//!
//! The kernels follow the historical BLAS numerical contract: NaN and Inf
//! propagate, negative increments walk vectors backwards, `dnrm2` never
//! overflows on representable input, and malformed calls (zero increments,
//! short buffers, leading dimensions too small) panic with a
//! [`BlasError`] message.
//!
//! ## BLAS Levels
//!
//! - **Level 1** (vector-vector): `ddot`, `dnrm2`, `dasum`, `idamax`, `dswap`,
//!   `dcopy`, `daxpy`, `drotg`, `drotmg`, `drot`, `drotm`, `dscal`
//! - **Level 2** (matrix-vector): `dgemv`, `dgbmv`, `dger`, `dtrmv`, `dtrsv`,
//!   `dtbmv`, `dtbsv`, `dtpmv`, `dtpsv`, `dsymv`, `dsbmv`, `dspmv`, `dsyr`,
//!   `dsyr2`, `dspr`, `dspr2`
//! - **Level 3** (matrix-matrix): `dgemm` (blocked, parallel), `dsymm`,
//!   `dsyrk`, `dsyr2k`, `dtrmm`, `dtrsm`
//!
//! ## Parallelism
//!
//! Only `dgemm` fans out. Worker count and tile size come from
//! [`GemmConfig::global`], which honours the `REFBLAS_NUM_THREADS`
//! environment variable; [`level3::dgemm_parallel`] takes an explicit config.
//!
//! ```
//! use refblas::{level1, level2, Transpose};
//!
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let x = [1.0, 1.0];
//! let mut y = [0.0; 2];
//! level2::dgemv(Transpose::NoTrans, 2, 2, 1.0, &a, 2, &x, 1, 0.0, &mut y, 1);
//! assert_eq!(y, [3.0, 7.0]);
//! assert_eq!(level1::dnrm2(2, &[3.0, 4.0], 1), 5.0);
//! ```

pub mod level1;
pub mod level2;
pub mod level3;

mod proptests;

pub use refblas_core::error::BlasError;
pub use refblas_core::flags::{Diag, DrotmParams, RotmFlag, Side, Transpose, Uplo};
pub use refblas_core::parallel::{GemmConfig, BLOCK_SIZE, BUFF_MUL, MIN_PAR_BLOCK};
