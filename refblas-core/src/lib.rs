//! # refblas-core
//!
//! Shared plumbing for the refblas kernels:
//! - **Flags**: CBLAS-coded `Transpose`, `Uplo`, `Diag`, `Side` and the
//!   modified-Givens `RotmFlag`.
//! - **Addressing**: strided vectors and dense/band/packed row-major storage.
//! - **Errors**: the `BlasError` contract-violation taxonomy.
//! - **Parallel execution**: `GemmConfig` and the bounded scoped worker pool.
//! - **RNG**: deterministic operands for tests and benchmarks.

// Inner loops mirror BLAS argument lists.
#![allow(clippy::too_many_arguments)]

pub mod error;
pub mod flags;
pub mod matrix;
pub mod parallel;
pub mod rng;
pub mod stride;
pub mod vecops;

pub use error::BlasError;
pub use flags::{Diag, DrotmParams, RotmFlag, Side, Transpose, Uplo};
pub use matrix::General;
pub use parallel::{GemmConfig, BLOCK_SIZE, BUFF_MUL, MIN_PAR_BLOCK};
pub use rng::SplitMix64;
pub use stride::Strided;
