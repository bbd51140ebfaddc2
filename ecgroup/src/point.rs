//! Points on a [`CurveGroup`].

use crate::{
    CurveGroup, Result,
    codec::{self, PointEncoding},
    error::Error,
    point_arithmetic::Coordinates,
};
use core::{
    fmt, mem,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use num_bigint::BigUint;
use rand_core::CryptoRng;
use subtle::Choice;

/// Point on a short Weierstrass curve, in homogeneous projective coordinates.
///
/// Two points compare equal when they have the same affine value, whatever
/// their projective representation.
#[derive(Clone)]
pub struct CurvePoint {
    group: CurveGroup,
    coords: Coordinates,
}

impl CurvePoint {
    pub(crate) fn from_coordinates(group: CurveGroup, coords: Coordinates) -> Self {
        Self { group, coords }
    }

    pub(crate) fn coordinates(&self) -> &Coordinates {
        &self.coords
    }

    /// Group this point belongs to.
    pub fn group(&self) -> &CurveGroup {
        &self.group
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.coords.is_identity()
    }

    /// Does the point satisfy the curve equation? The identity does.
    pub fn on_curve(&self) -> bool {
        self.is_identity() || self.group.equation().is_on_curve(&self.coords)
    }

    /// Negate in place.
    pub fn negate(&mut self) -> &mut Self {
        self.coords = self.coords.neg();
        self
    }

    /// Returns `2 · self`.
    pub fn double(&self) -> Self {
        self.with_coords(self.group.equation().double(&self.coords))
    }

    /// Returns `2ⁿ · self`.
    pub fn double_repeated(&self, n: usize) -> Self {
        let equation = self.group.equation();
        let mut coords = self.coords.clone();
        for _ in 0..n {
            coords = equation.double(&coords);
        }
        self.with_coords(coords)
    }

    /// Group law with the special cases spelled out: an identity operand,
    /// equal operands, which go through the doubling formula, and mutual
    /// negatives.
    fn add_point(&self, rhs: &Self) -> Self {
        self.assert_same_group(rhs);

        if self.is_identity() {
            return rhs.clone();
        }

        if rhs.is_identity() {
            return self.clone();
        }

        let (lhs, rhs_coords) = (&self.coords, &rhs.coords);
        if &lhs.x * &rhs_coords.z == &rhs_coords.x * &lhs.z {
            let lhs_y = &lhs.y * &rhs_coords.z;
            let rhs_y = &rhs_coords.y * &lhs.z;

            if lhs_y == rhs_y {
                return self.double();
            }

            if (lhs_y + rhs_y).is_zero() {
                return self.group.identity();
            }
        }

        self.with_coords(self.group.equation().add(lhs, rhs_coords))
    }

    fn sub_point(&self, rhs: &Self) -> Self {
        self.add_point(&-rhs)
    }

    /// Returns `k · self`.
    ///
    /// Fixed 4-bit windows over the little endian bytes of `k`. The number of
    /// windows depends on the length of `k`, so this is not suitable for
    /// secret scalars; use a [`BlindedMultiplier`](crate::BlindedMultiplier).
    pub fn multiply(&self, k: &BigUint) -> Self {
        let equation = self.group.equation();
        let field = self.group.field();

        let mut pc = Vec::with_capacity(16);
        pc.push(Coordinates::identity(field));
        pc.push(self.coords.clone());

        for i in 2..16 {
            let next = if i % 2 == 0 {
                equation.double(&pc[i / 2])
            } else {
                equation.add(&pc[i - 1], &self.coords)
            };
            pc.push(next);
        }

        let k = k.to_bytes_le();
        let mut q = Coordinates::identity(field);
        let mut pos = k.len() * 8 - 4;

        loop {
            let slot = (k[pos >> 3] >> (pos & 7)) & 0xf;

            let mut t = Coordinates::identity(field);

            for (i, entry) in pc.iter().enumerate().skip(1) {
                t.conditional_assign(
                    entry,
                    Choice::from(((slot as usize ^ i).wrapping_sub(1) >> 8) as u8 & 1),
                );
            }

            q = equation.add(&q, &t);

            if pos == 0 {
                break;
            }

            q = equation.double(&equation.double(&equation.double(&equation.double(&q))));
            pos -= 4;
        }

        self.with_coords(q)
    }

    /// Affine `(x, y)`, or [`Error::PointIsIdentity`].
    pub fn to_affine(&self) -> Result<(BigUint, BigUint)> {
        let (x, y) = self.coords.to_affine().ok_or(Error::PointIsIdentity)?;
        Ok((x.into_value(), y.into_value()))
    }

    /// Affine x-coordinate, or [`Error::PointIsIdentity`].
    pub fn affine_x(&self) -> Result<BigUint> {
        self.to_affine().map(|(x, _)| x)
    }

    /// Affine y-coordinate, or [`Error::PointIsIdentity`].
    pub fn affine_y(&self) -> Result<BigUint> {
        self.to_affine().map(|(_, y)| y)
    }

    /// Rescale the projective coordinates by a random non-zero factor,
    /// keeping the affine value.
    pub fn randomize_representation<R: CryptoRng + ?Sized>(&mut self, rng: &mut R) {
        self.coords.randomize(rng);
    }

    /// Exchange the full state of two points.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Replace `self` with `other` if `choice` is set, touching every limb.
    pub fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        self.assert_same_group(other);
        self.coords.conditional_assign(&other.coords, choice);
    }

    /// SEC1 encoding of this point.
    pub fn encode(&self, encoding: PointEncoding) -> Vec<u8> {
        codec::encode_point(self, encoding)
    }

    fn with_coords(&self, coords: Coordinates) -> Self {
        Self {
            group: self.group.clone(),
            coords,
        }
    }

    fn assert_same_group(&self, other: &Self) {
        assert!(
            self.group == other.group,
            "points belong to different curve groups"
        );
    }
}

impl PartialEq for CurvePoint {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.coords.equivalent(&other.coords)
    }
}

impl Eq for CurvePoint {}

impl fmt::Debug for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_affine() {
            Ok((x, y)) => write!(f, "CurvePoint(0x{x:x}, 0x{y:x})"),
            Err(_) => write!(f, "CurvePoint(identity)"),
        }
    }
}

//
// `core::ops` trait impls
//

macro_rules! point_op {
    ($op:tt, $func:ident, $inner_func:ident) => {
        impl $op<CurvePoint> for CurvePoint {
            type Output = CurvePoint;

            fn $func(self, rhs: CurvePoint) -> CurvePoint {
                CurvePoint::$inner_func(&self, &rhs)
            }
        }

        impl $op<&CurvePoint> for CurvePoint {
            type Output = CurvePoint;

            fn $func(self, rhs: &CurvePoint) -> CurvePoint {
                CurvePoint::$inner_func(&self, rhs)
            }
        }

        impl $op<CurvePoint> for &CurvePoint {
            type Output = CurvePoint;

            fn $func(self, rhs: CurvePoint) -> CurvePoint {
                CurvePoint::$inner_func(self, &rhs)
            }
        }

        impl $op<&CurvePoint> for &CurvePoint {
            type Output = CurvePoint;

            fn $func(self, rhs: &CurvePoint) -> CurvePoint {
                CurvePoint::$inner_func(self, rhs)
            }
        }
    };
}

macro_rules! point_assign_op {
    ($op:tt, $func:ident, $inner_func:ident) => {
        impl $op<CurvePoint> for CurvePoint {
            fn $func(&mut self, rhs: CurvePoint) {
                *self = CurvePoint::$inner_func(self, &rhs);
            }
        }

        impl $op<&CurvePoint> for CurvePoint {
            fn $func(&mut self, rhs: &CurvePoint) {
                *self = CurvePoint::$inner_func(self, rhs);
            }
        }
    };
}

point_op!(Add, add, add_point);
point_op!(Sub, sub, sub_point);
point_assign_op!(AddAssign, add_assign, add_point);
point_assign_op!(SubAssign, sub_assign, sub_point);

impl Neg for CurvePoint {
    type Output = CurvePoint;

    fn neg(mut self) -> CurvePoint {
        self.negate();
        self
    }
}

impl Neg for &CurvePoint {
    type Output = CurvePoint;

    fn neg(self) -> CurvePoint {
        self.with_coords(self.coords.neg())
    }
}

impl Mul<&BigUint> for CurvePoint {
    type Output = CurvePoint;

    fn mul(self, k: &BigUint) -> CurvePoint {
        CurvePoint::multiply(&self, k)
    }
}

impl Mul<&BigUint> for &CurvePoint {
    type Output = CurvePoint;

    fn mul(self, k: &BigUint) -> CurvePoint {
        CurvePoint::multiply(self, k)
    }
}

impl Mul<BigUint> for &CurvePoint {
    type Output = CurvePoint;

    fn mul(self, k: BigUint) -> CurvePoint {
        CurvePoint::multiply(self, &k)
    }
}

impl Mul<&CurvePoint> for &BigUint {
    type Output = CurvePoint;

    fn mul(self, point: &CurvePoint) -> CurvePoint {
        CurvePoint::multiply(point, self)
    }
}

impl MulAssign<&BigUint> for CurvePoint {
    fn mul_assign(&mut self, k: &BigUint) {
        *self = CurvePoint::multiply(self, k);
    }
}

impl MulAssign<BigUint> for CurvePoint {
    fn mul_assign(&mut self, k: BigUint) {
        *self = CurvePoint::multiply(self, &k);
    }
}

#[cfg(test)]
mod tests {
    use crate::{CurveGroup, DomainParameters, Error};
    use num_bigint::BigUint;

    /// `y² = x³ + 2x + 21` over GF(1_000_003); the curve has odd order
    /// 1_001_295 = 3³ · 5 · 7417.
    fn toy_group() -> CurveGroup {
        CurveGroup::new(
            DomainParameters {
                p: BigUint::from(1_000_003u32),
                a: BigUint::from(2u32),
                b: BigUint::from(21u32),
                g_x: BigUint::from(1u32),
                g_y: BigUint::from(173_537u32),
                order: BigUint::from(1_001_295u32),
                cofactor: BigUint::from(1u32),
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn identity_has_no_affine_form() {
        let group = toy_group();
        let identity = group.identity();
        assert!(identity.is_identity());
        assert!(identity.on_curve());
        assert_eq!(identity.affine_x(), Err(Error::PointIsIdentity));
        assert_eq!(identity.affine_y(), Err(Error::PointIsIdentity));
        assert_eq!(-&identity, identity);
    }

    #[test]
    fn unchecked_points_may_lie_off_curve() {
        let group = toy_group();
        let off = group.point(BigUint::from(1u32), BigUint::from(1u32)).unwrap();
        assert!(!off.on_curve());
        assert!(group.point(BigUint::from(1_000_003u32), BigUint::from(1u32)).is_err());
    }

    #[test]
    fn small_multiples() {
        let group = toy_group();
        let g = group.base_point();
        assert!(g.on_curve());

        assert_eq!(&g + &g, g.double());
        assert_eq!(g.double_repeated(3), g.multiply(&BigUint::from(8u32)));
        assert_eq!(&g - &g, group.identity());
        assert_eq!(g.multiply(&BigUint::from(0u32)), group.identity());
        assert_eq!(g.multiply(&BigUint::from(1u32)), g);
        assert!(g.multiply(group.order()).is_identity());

        let mut acc = group.identity();
        for k in 1u32..40 {
            acc += &g;
            assert_eq!(acc, g.multiply(&BigUint::from(k)), "k = {k}");
            assert!(acc.on_curve());
        }
    }

    #[test]
    fn debug_shows_affine_value() {
        let group = toy_group();
        let point = group.point(BigUint::from(10u32), BigUint::from(255u32)).unwrap();
        assert_eq!(format!("{point:?}"), "CurvePoint(0xa, 0xff)");
        assert_eq!(format!("{:?}", group.identity()), "CurvePoint(identity)");
    }
}
