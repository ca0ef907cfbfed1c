use std::fmt;

/// Errors surfaced by the timing core.
///
/// Status resolution itself never fails; these arise only from the fallible
/// conversions and deposit checks at the crate boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PondCoreError {
    UnknownCadence(u8),
    UnknownCadenceName,
    PondIdTooLong,
    DepositTooLow,
    DepositCapExceeded,
    ArithmeticError,
}

impl fmt::Display for PondCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCadence(discriminant) => {
                write!(f, "unknown cadence discriminant {}", discriminant)
            }
            Self::UnknownCadenceName => write!(f, "unrecognized cadence name"),
            Self::PondIdTooLong => write!(f, "pond id is longer than 32 bytes"),
            Self::DepositTooLow => write!(f, "deposit is below the pond minimum"),
            Self::DepositCapExceeded => write!(f, "deposit would exceed the pond cap"),
            Self::ArithmeticError => write!(f, "arithmetic overflow"),
        }
    }
}

impl std::error::Error for PondCoreError {}
