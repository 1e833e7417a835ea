//! CBLAS-style operation flags.
//!
//! All matrices in refblas are row-major, so there is no layout flag. The
//! discriminants match the CBLAS enumeration values so raw codes coming from
//! foreign callers can be decoded with `TryFrom<u32>`; anything outside the
//! enumerated set is rejected with the matching [`BlasError`].

use crate::error::BlasError;

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Transpose {
    /// No transpose.
    #[default]
    NoTrans = 111,
    /// Transpose.
    Trans = 112,
    /// Conjugate transpose. Identical to `Trans` for real data.
    ConjTrans = 113,
}

impl Transpose {
    /// True for `Trans` and `ConjTrans`.
    #[inline(always)]
    pub fn is_trans(self) -> bool {
        !matches!(self, Transpose::NoTrans)
    }

    /// The opposite operation, with `ConjTrans` folded into `NoTrans`.
    #[inline]
    pub fn toggled(self) -> Self {
        if self.is_trans() {
            Transpose::NoTrans
        } else {
            Transpose::Trans
        }
    }
}

impl TryFrom<u32> for Transpose {
    type Error = BlasError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            111 => Ok(Transpose::NoTrans),
            112 => Ok(Transpose::Trans),
            113 => Ok(Transpose::ConjTrans),
            other => Err(BlasError::BadTranspose(other)),
        }
    }
}

/// BLAS triangle specifier (upper/lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Uplo {
    #[default]
    Upper = 121,
    Lower = 122,
}

impl TryFrom<u32> for Uplo {
    type Error = BlasError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            121 => Ok(Uplo::Upper),
            122 => Ok(Uplo::Lower),
            other => Err(BlasError::BadUplo(other)),
        }
    }
}

/// BLAS diagonal specifier (unit/non-unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Diag {
    #[default]
    NonUnit = 131,
    Unit = 132,
}

impl TryFrom<u32> for Diag {
    type Error = BlasError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            131 => Ok(Diag::NonUnit),
            132 => Ok(Diag::Unit),
            other => Err(BlasError::BadDiag(other)),
        }
    }
}

/// BLAS side specifier (left/right multiplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Side {
    #[default]
    Left = 141,
    Right = 142,
}

impl TryFrom<u32> for Side {
    type Error = BlasError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            141 => Ok(Side::Left),
            142 => Ok(Side::Right),
            other => Err(BlasError::BadSide(other)),
        }
    }
}

/// Shape of the 2×2 modified Givens transform `H`.
///
/// The flag lets `drotm` skip the entries that are implicitly one or zero.
/// Reference values are the historical BLAS `DPARAM(1)` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotmFlag {
    /// `H = I`; applying it is a no-op.
    #[default]
    Identity,
    /// Full matrix `[[h11, h12], [h21, h22]]`.
    Rescaling,
    /// `[[1, h12], [h21, 1]]`.
    OffDiagonal,
    /// `[[h11, 1], [-1, h22]]`.
    Diagonal,
}

impl RotmFlag {
    /// Reference `DPARAM(1)` value.
    pub fn code(self) -> f64 {
        match self {
            RotmFlag::Identity => -2.0,
            RotmFlag::Rescaling => -1.0,
            RotmFlag::OffDiagonal => 0.0,
            RotmFlag::Diagonal => 1.0,
        }
    }
}

impl TryFrom<f64> for RotmFlag {
    type Error = BlasError;

    fn try_from(code: f64) -> Result<Self, Self::Error> {
        if code == -2.0 {
            Ok(RotmFlag::Identity)
        } else if code == -1.0 {
            Ok(RotmFlag::Rescaling)
        } else if code == 0.0 {
            Ok(RotmFlag::OffDiagonal)
        } else if code == 1.0 {
            Ok(RotmFlag::Diagonal)
        } else {
            Err(BlasError::BadRotmFlag(code as i64))
        }
    }
}

/// Modified Givens transform produced by `drotmg` and consumed by `drotm`.
///
/// `h` is stored as `[h11, h21, h12, h22]`; entries implied by `flag` are
/// left untouched and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrotmParams {
    pub flag: RotmFlag,
    pub h: [f64; 4],
}

impl DrotmParams {
    /// Decode the reference five-element `DPARAM` array.
    pub fn from_dparam(p: [f64; 5]) -> Result<Self, BlasError> {
        Ok(Self {
            flag: RotmFlag::try_from(p[0])?,
            h: [p[1], p[2], p[3], p[4]],
        })
    }

    /// The full 2×2 matrix `[[h11, h12], [h21, h22]]` with implied entries filled in.
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        let [h11, h21, h12, h22] = self.h;
        match self.flag {
            RotmFlag::Identity => [[1.0, 0.0], [0.0, 1.0]],
            RotmFlag::Rescaling => [[h11, h12], [h21, h22]],
            RotmFlag::OffDiagonal => [[1.0, h12], [h21, 1.0]],
            RotmFlag::Diagonal => [[h11, 1.0], [-1.0, h22]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_codes() {
        assert_eq!(Transpose::try_from(112), Ok(Transpose::Trans));
        assert_eq!(Transpose::ConjTrans as u32, 113);
        assert_eq!(Transpose::try_from(7), Err(BlasError::BadTranspose(7)));
        assert!(Transpose::ConjTrans.is_trans());
        assert_eq!(Transpose::ConjTrans.toggled(), Transpose::NoTrans);
        assert_eq!(Transpose::NoTrans.toggled(), Transpose::Trans);
    }

    #[test]
    fn test_other_flag_codes() {
        assert_eq!(Uplo::try_from(122), Ok(Uplo::Lower));
        assert_eq!(Uplo::try_from(0), Err(BlasError::BadUplo(0)));
        assert_eq!(Diag::try_from(132), Ok(Diag::Unit));
        assert_eq!(Diag::try_from(130), Err(BlasError::BadDiag(130)));
        assert_eq!(Side::try_from(142), Ok(Side::Right));
        assert_eq!(Side::try_from(143), Err(BlasError::BadSide(143)));
    }

    #[test]
    fn test_rotm_flag_round_trip() {
        for flag in [
            RotmFlag::Identity,
            RotmFlag::Rescaling,
            RotmFlag::OffDiagonal,
            RotmFlag::Diagonal,
        ] {
            assert_eq!(RotmFlag::try_from(flag.code()), Ok(flag));
        }
        assert_eq!(RotmFlag::try_from(2.0), Err(BlasError::BadRotmFlag(2)));
    }

    #[test]
    fn test_dparam_matrix() {
        let p = DrotmParams::from_dparam([1.0, 2.0, 9.0, 9.0, 3.0]).unwrap();
        assert_eq!(p.flag, RotmFlag::Diagonal);
        assert_eq!(p.matrix(), [[2.0, 1.0], [-1.0, 3.0]]);
    }
}
