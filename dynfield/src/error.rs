//! Error types.

use core::fmt;

/// Error type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The modulus is even or not larger than 3.
    InvalidModulus,

    /// The integer is not a canonical residue, i.e. it is not below the modulus.
    NotReduced,

    /// The byte string is longer than the field's encoded length.
    InvalidLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidModulus => write!(f, "field modulus must be odd and greater than 3"),
            Error::NotReduced => write!(f, "value is not reduced modulo the field prime"),
            Error::InvalidLength => write!(f, "encoded field element has invalid length"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
