//! SEC1 octet-string encoding of curve points.
//!
//! | form         | layout                    | length        |
//! |--------------|---------------------------|---------------|
//! | identity     | `00`                      | 1             |
//! | compressed   | `02 \| y&1`, `x`          | 1 + L         |
//! | uncompressed | `04`, `x`, `y`            | 1 + 2L        |
//! | hybrid       | `06 \| y&1`, `x`, `y`     | 1 + 2L        |
//!
//! where `L` is the byte length of the field modulus.

use crate::{CurveGroup, CurvePoint, Error, Result, point_arithmetic::Coordinates};
use dynfield::{FieldElement, PrimeField};

/// Point encoding forms.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PointEncoding {
    /// `04 || x || y`
    #[default]
    Uncompressed,

    /// `02 || x` or `03 || x`, by the parity of `y`
    Compressed,

    /// `06 || x || y` or `07 || x || y`, by the parity of `y`
    Hybrid,
}

/// Leading byte of an encoded point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
enum Tag {
    Identity = 0x00,
    CompressedEvenY = 0x02,
    CompressedOddY = 0x03,
    Uncompressed = 0x04,
    HybridEvenY = 0x06,
    HybridOddY = 0x07,
}

impl Tag {
    fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Tag::Identity),
            0x02 => Ok(Tag::CompressedEvenY),
            0x03 => Ok(Tag::CompressedOddY),
            0x04 => Ok(Tag::Uncompressed),
            0x06 => Ok(Tag::HybridEvenY),
            0x07 => Ok(Tag::HybridOddY),
            _ => Err(Error::Decoding("unknown point encoding tag")),
        }
    }

    fn for_point(encoding: PointEncoding, y_is_odd: bool) -> Self {
        match (encoding, y_is_odd) {
            (PointEncoding::Uncompressed, _) => Tag::Uncompressed,
            (PointEncoding::Compressed, false) => Tag::CompressedEvenY,
            (PointEncoding::Compressed, true) => Tag::CompressedOddY,
            (PointEncoding::Hybrid, false) => Tag::HybridEvenY,
            (PointEncoding::Hybrid, true) => Tag::HybridOddY,
        }
    }

    /// Total encoded length for a field of `field_bytes` bytes.
    fn message_len(self, field_bytes: usize) -> usize {
        match self {
            Tag::Identity => 1,
            Tag::CompressedEvenY | Tag::CompressedOddY => 1 + field_bytes,
            Tag::Uncompressed | Tag::HybridEvenY | Tag::HybridOddY => 1 + 2 * field_bytes,
        }
    }

    fn y_is_odd(self) -> bool {
        matches!(self, Tag::CompressedOddY | Tag::HybridOddY)
    }
}

/// Encode `point` in the requested form. The identity is `[0x00]` in
/// every form.
pub fn encode_point(point: &CurvePoint, encoding: PointEncoding) -> Vec<u8> {
    let Some((x, y)) = point.coordinates().to_affine() else {
        return vec![Tag::Identity as u8];
    };

    let tag = Tag::for_point(encoding, y.is_odd());
    let mut bytes = Vec::with_capacity(tag.message_len(x.field().bytes()));
    bytes.push(tag as u8);
    bytes.extend_from_slice(&x.to_be_bytes());

    if encoding != PointEncoding::Compressed {
        bytes.extend_from_slice(&y.to_be_bytes());
    }

    bytes
}

/// Decode a point of `group`.
///
/// Every malformed input fails with [`Error::Decoding`]: an empty string,
/// an unknown leading byte, the wrong length for the form, coordinates not
/// below `p`, a compressed `x` with no matching `y`, a point off the curve,
/// or a hybrid encoding whose tag disagrees with the parity of `y`.
pub fn decode_point(group: &CurveGroup, bytes: &[u8]) -> Result<CurvePoint> {
    let (&first, body) = bytes
        .split_first()
        .ok_or(Error::Decoding("empty point encoding"))?;

    let tag = Tag::from_u8(first)?;
    let field = group.field();

    if bytes.len() != tag.message_len(field.bytes()) {
        return Err(Error::Decoding("wrong length for point encoding"));
    }

    let coords = match tag {
        Tag::Identity => return Ok(group.identity()),
        Tag::CompressedEvenY | Tag::CompressedOddY => {
            let x = coordinate(field, body)?;
            let y = decompress(group, &x, tag.y_is_odd())?;
            Coordinates::from_affine(x, y)
        }
        Tag::Uncompressed | Tag::HybridEvenY | Tag::HybridOddY => {
            let (x, y) = body.split_at(field.bytes());
            let (x, y) = (coordinate(field, x)?, coordinate(field, y)?);

            if tag != Tag::Uncompressed && y.is_odd() != tag.y_is_odd() {
                return Err(Error::Decoding("hybrid encoding has the wrong y parity"));
            }

            Coordinates::from_affine(x, y)
        }
    };

    let point = CurvePoint::from_coordinates(group.clone(), coords);
    if !point.on_curve() {
        return Err(Error::Decoding("point is not on the curve"));
    }

    Ok(point)
}

fn coordinate(field: &PrimeField, bytes: &[u8]) -> Result<FieldElement> {
    field
        .from_be_bytes(bytes)
        .map_err(|_| Error::Decoding("coordinate is not below the field modulus"))
}

/// Recover `y` from `x` and the parity of `y`.
fn decompress(group: &CurveGroup, x: &FieldElement, y_is_odd: bool) -> Result<FieldElement> {
    let equation = group.equation();
    let alpha = x.cube() + &equation.a * x + &equation.b;
    let beta = alpha
        .sqrt()
        .ok_or(Error::Decoding("compressed x-coordinate has no square root"))?;

    let y = if beta.is_odd() == y_is_odd { beta } else { -beta };

    // y = 0 has only the even encoding
    if y.is_odd() != y_is_odd {
        return Err(Error::Decoding("compressed point has the wrong y parity"));
    }

    Ok(y)
}
