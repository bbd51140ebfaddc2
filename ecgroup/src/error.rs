//! Error types.

use core::fmt;

/// Error type.
///
/// Failures are raised where malformed input enters: curve lookup, explicit
/// construction and point decoding. Validity predicates such as
/// [`CurvePoint::on_curve`](crate::CurvePoint::on_curve) return `false`
/// instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// No curve is known under the requested name or OID.
    UnknownCurve,

    /// Degenerate domain parameters or blinded multiplier configuration.
    InvalidArgument(&'static str),

    /// Malformed point encoding.
    Decoding(&'static str),

    /// Affine coordinates were requested for the point at infinity.
    PointIsIdentity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownCurve => write!(f, "unknown elliptic curve"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::Decoding(msg) => write!(f, "point decoding failed: {msg}"),
            Error::PointIsIdentity => write!(f, "point at infinity has no affine coordinates"),
        }
    }
}

impl std::error::Error for Error {}

impl From<dynfield::Error> for Error {
    fn from(err: dynfield::Error) -> Error {
        match err {
            dynfield::Error::InvalidModulus => {
                Error::InvalidArgument("modulus must be odd and greater than 3")
            }
            dynfield::Error::NotReduced => Error::InvalidArgument("value is not reduced modulo p"),
            dynfield::Error::InvalidLength => Error::InvalidArgument("value is too long"),
        }
    }
}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
