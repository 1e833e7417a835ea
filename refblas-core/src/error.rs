//! Contract-violation taxonomy.
//!
//! BLAS treats a malformed call (zero increment, short buffer, leading
//! dimension too small, unknown flag) as a programmer error. Kernels never
//! return these as `Result`: they panic through [`BlasError::raise`], so every
//! panic message in the workspace comes from one place. The only recoverable
//! surface is flag decoding from raw CBLAS codes (see [`crate::flags`]).

use thiserror::Error;

/// A violated precondition of a BLAS routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BlasError {
    #[error("blas: zero x index increment")]
    ZeroIncX,
    #[error("blas: zero y index increment")]
    ZeroIncY,
    #[error("blas: x index out of range")]
    BadX,
    #[error("blas: y index out of range")]
    BadY,
    /// `lda` too small for the declared shape, or `a` too short.
    #[error("blas: index of a out of range")]
    BadLdA,
    #[error("blas: index of b out of range")]
    BadLdB,
    #[error("blas: index of c out of range")]
    BadLdC,
    #[error("blas: illegal transpose {0}")]
    BadTranspose(u32),
    #[error("blas: illegal triangle {0}")]
    BadUplo(u32),
    #[error("blas: illegal diagonal {0}")]
    BadDiag(u32),
    #[error("blas: illegal side {0}")]
    BadSide(u32),
    /// Raw modified-Givens flag outside {-2, -1, 0, 1}.
    #[error("blas: illegal rotm flag {0}")]
    BadRotmFlag(i64),
}

impl BlasError {
    /// Abort the current call with this contract violation.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn raise(self) -> ! {
        panic!("{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            BlasError::ZeroIncX.to_string(),
            "blas: zero x index increment"
        );
        assert_eq!(
            BlasError::BadTranspose(7).to_string(),
            "blas: illegal transpose 7"
        );
    }

    #[test]
    #[should_panic(expected = "blas: index of c out of range")]
    fn test_raise_panics_with_message() {
        BlasError::BadLdC.raise();
    }
}
