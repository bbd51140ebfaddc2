//! Elliptic curve domain parameters.

use crate::{
    BlindedMultiplier, BlindingWorkspace, CurvePoint, Error, Result,
    blinding::DEFAULT_WINDOW_BITS,
    codec,
    lookup_table::LookupTable,
    named::NamedCurve,
    point_arithmetic::{Coordinates, CurveEquation, EquationA},
    registry::Oid,
};
use core::fmt;
use dynfield::{PrimeField, is_probable_prime, random_in_range};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRng;
use std::sync::{Arc, OnceLock};

/// Miller-Rabin rounds used by [`CurveGroup::verify_group`].
const PRIMALITY_ROUNDS: usize = 32;

/// Embedding degrees checked by the strong group validation.
const MOV_DEGREE_BOUND: u32 = 20;

/// Raw domain parameters of the curve `y² = x³ + ax + b` over `GF(p)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DomainParameters {
    /// Field modulus.
    pub p: BigUint,

    /// 𝒂-coefficient.
    pub a: BigUint,

    /// 𝒃-coefficient.
    pub b: BigUint,

    /// Affine x-coordinate of the base point.
    pub g_x: BigUint,

    /// Affine y-coordinate of the base point.
    pub g_y: BigUint,

    /// Order of the base point.
    pub order: BigUint,

    /// Cofactor `h = #E / order`.
    pub cofactor: BigUint,
}

/// Short Weierstrass curve group with domain parameters chosen at runtime.
///
/// Immutable once built. Clones are handles to the same parameter set, and
/// every [`CurvePoint`] keeps one so the group outlives its points.
#[derive(Clone)]
pub struct CurveGroup {
    inner: Arc<GroupInner>,
}

struct GroupInner {
    field: PrimeField,
    equation: CurveEquation,
    base: Coordinates,
    order: BigUint,
    cofactor: BigUint,
    oid: Option<Oid>,
    name: Option<&'static str>,
    order_bits: usize,
    order_bytes: usize,
    base_table: OnceLock<Arc<LookupTable>>,
}

impl CurveGroup {
    /// Build a group from explicit parameters.
    ///
    /// Only what the arithmetic needs is checked: an odd modulus above 3,
    /// coefficients and base point coordinates reduced modulo `p`, and a
    /// non-zero order and cofactor. Whether the base point lies on the curve
    /// or `p` is prime is left to [`CurveGroup::verify_group`].
    ///
    /// This does not register the group; see
    /// [`CurveRegistry::explicit`](crate::CurveRegistry::explicit).
    pub fn new(params: DomainParameters, oid: Option<Oid>) -> Result<Self> {
        Self::build(params, oid, None)
    }

    pub(crate) fn from_named(curve: &NamedCurve) -> Result<Self> {
        let oid = curve.oid.parse()?;
        Self::build(curve.parameters()?, Some(oid), Some(curve.name))
    }

    fn build(
        params: DomainParameters,
        oid: Option<Oid>,
        name: Option<&'static str>,
    ) -> Result<Self> {
        let DomainParameters {
            p,
            a,
            b,
            g_x,
            g_y,
            order,
            cofactor,
        } = params;

        if order.is_zero() {
            return Err(Error::InvalidArgument("group order must be non-zero"));
        }

        if cofactor.is_zero() {
            return Err(Error::InvalidArgument("cofactor must be non-zero"));
        }

        let field = PrimeField::new(p)?;
        let equation = CurveEquation::new(field.element(a)?, field.element(b)?);
        let base = Coordinates::from_affine(field.element(g_x)?, field.element(g_y)?);
        let order_bits = order.bits() as usize;

        Ok(Self {
            inner: Arc::new(GroupInner {
                field,
                equation,
                base,
                order,
                cofactor,
                oid,
                name,
                order_bits,
                order_bytes: order_bits.div_ceil(8),
                base_table: OnceLock::new(),
            }),
        })
    }

    /// Field modulus `p`.
    pub fn p(&self) -> &BigUint {
        self.inner.field.modulus()
    }

    /// 𝒂-coefficient.
    pub fn a(&self) -> &BigUint {
        self.inner.equation.a.value()
    }

    /// 𝒃-coefficient.
    pub fn b(&self) -> &BigUint {
        self.inner.equation.b.value()
    }

    /// Affine x-coordinate of the base point.
    pub fn g_x(&self) -> &BigUint {
        self.inner.base.x.value()
    }

    /// Affine y-coordinate of the base point.
    pub fn g_y(&self) -> &BigUint {
        self.inner.base.y.value()
    }

    /// Order of the base point.
    pub fn order(&self) -> &BigUint {
        &self.inner.order
    }

    /// Cofactor.
    pub fn cofactor(&self) -> &BigUint {
        &self.inner.cofactor
    }

    /// Object identifier, if the group has one.
    pub fn oid(&self) -> Option<&Oid> {
        self.inner.oid.as_ref()
    }

    /// Canonical name for groups taken from the named curve table.
    pub fn name(&self) -> Option<&str> {
        self.inner.name
    }

    /// Bit length of `p`.
    pub fn p_bits(&self) -> usize {
        self.inner.field.bits()
    }

    /// Byte length of `p`, which is also the width of an encoded coordinate.
    pub fn p_bytes(&self) -> usize {
        self.inner.field.bytes()
    }

    /// Bit length of the order.
    pub fn order_bits(&self) -> usize {
        self.inner.order_bits
    }

    /// Byte length of the order.
    pub fn order_bytes(&self) -> usize {
        self.inner.order_bytes
    }

    /// Is `a ≡ -3 (mod p)`?
    pub fn a_is_minus_3(&self) -> bool {
        self.inner.equation.form == EquationA::IsMinusThree
    }

    /// Is `a = 0`?
    pub fn a_is_zero(&self) -> bool {
        self.inner.equation.a.is_zero()
    }

    /// The base field `GF(p)`.
    pub fn field(&self) -> &PrimeField {
        &self.inner.field
    }

    /// Copy of the raw domain parameters.
    pub fn parameters(&self) -> DomainParameters {
        DomainParameters {
            p: self.p().clone(),
            a: self.a().clone(),
            b: self.b().clone(),
            g_x: self.g_x().clone(),
            g_y: self.g_y().clone(),
            order: self.order().clone(),
            cofactor: self.cofactor().clone(),
        }
    }

    pub(crate) fn equation(&self) -> &CurveEquation {
        &self.inner.equation
    }

    /// Point with the given affine coordinates.
    ///
    /// Curve membership is not checked, see [`CurvePoint::on_curve`]. Fails
    /// with [`Error::InvalidArgument`] if a coordinate is not below `p`.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<CurvePoint> {
        let field = &self.inner.field;
        let coords = Coordinates::from_affine(field.element(x)?, field.element(y)?);
        Ok(CurvePoint::from_coordinates(self.clone(), coords))
    }

    /// The point at infinity.
    pub fn identity(&self) -> CurvePoint {
        CurvePoint::from_coordinates(self.clone(), Coordinates::identity(&self.inner.field))
    }

    /// The base point `G`.
    pub fn base_point(&self) -> CurvePoint {
        CurvePoint::from_coordinates(self.clone(), self.inner.base.clone())
    }

    /// Decode a SEC1 octet string into a point of this group.
    pub fn decode_point(&self, bytes: &[u8]) -> Result<CurvePoint> {
        codec::decode_point(self, bytes)
    }

    /// Uniformly random scalar in `[1, order)`.
    pub fn random_scalar<R: CryptoRng + ?Sized>(&self, rng: &mut R) -> BigUint {
        random_in_range(rng, &BigUint::one(), self.order())
    }

    /// `k mod order`.
    pub fn mod_order(&self, k: &BigUint) -> BigUint {
        k % self.order()
    }

    /// `k⁻¹ mod order`, or `None` when `k` is not invertible.
    pub fn inverse_mod_order(&self, k: &BigUint) -> Option<BigUint> {
        self.mod_order(k).modinv(self.order())
    }

    /// `a · b mod order`.
    pub fn multiply_mod_order(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % self.order()
    }

    /// Shared multiplier over the base point, built on first use.
    pub fn base_point_multiplier(&self) -> BlindedMultiplier {
        let table = self.inner.base_table.get_or_init(|| {
            Arc::new(LookupTable::new(
                &self.inner.equation,
                &self.inner.base,
                DEFAULT_WINDOW_BITS,
            ))
        });

        BlindedMultiplier::from_table(self.clone(), Arc::clone(table))
    }

    /// `k · G` using the side-channel hardened multiplier.
    pub fn blinded_base_point_multiply<R: CryptoRng + ?Sized>(
        &self,
        k: &BigUint,
        rng: &mut R,
        workspace: &mut BlindingWorkspace,
    ) -> CurvePoint {
        self.base_point_multiplier()
            .multiply(k, self.order(), rng, workspace)
    }

    /// `z1 · p + z2 · q`, sharing the doublings between both scalars
    /// (Shamir's trick). Variable time.
    pub fn multi_exponentiate(
        &self,
        p: &CurvePoint,
        z1: &BigUint,
        q: &CurvePoint,
        z2: &BigUint,
    ) -> CurvePoint {
        assert!(
            p.group() == self && q.group() == self,
            "points belong to different curve groups"
        );

        let p_plus_q = p + q;
        let bits = z1.bits().max(z2.bits());
        let mut acc = self.identity();

        for i in (0..bits).rev() {
            acc = acc.double();

            match (z1.bit(i), z2.bit(i)) {
                (true, true) => acc += &p_plus_q,
                (true, false) => acc += p,
                (false, true) => acc += q,
                (false, false) => (),
            }
        }

        acc
    }

    /// Check the domain parameters.
    ///
    /// Tests that `p` and the order are probable primes, the curve is
    /// non-singular, the base point is a point on the curve of the stated
    /// order, and the order and cofactor agree with the Hasse bound. With
    /// `strong` set, anomalous curves (`order = p`) and curves of small
    /// embedding degree are also rejected.
    pub fn verify_group<R: CryptoRng + ?Sized>(&self, rng: &mut R, strong: bool) -> bool {
        let p = self.p();
        let order = self.order();

        if !is_probable_prime(p, rng, PRIMALITY_ROUNDS)
            || !is_probable_prime(order, rng, PRIMALITY_ROUNDS)
        {
            return false;
        }

        let field = &self.inner.field;
        let (a, b) = (&self.inner.equation.a, &self.inner.equation.b);
        let discriminant = field.from_u64(4) * a.cube() + field.from_u64(27) * b.square();
        if discriminant.is_zero() {
            return false;
        }

        let base = self.base_point();
        if !base.on_curve() || !base.multiply(order).is_identity() {
            return false;
        }

        // |p + 1 - h·n| <= 2√p
        let curve_order = self.cofactor() * order;
        let p_plus_one = p + 1u32;
        let trace = if p_plus_one >= curve_order {
            p_plus_one - curve_order
        } else {
            curve_order - p_plus_one
        };
        if &trace * &trace > p * 4u32 {
            return false;
        }

        if strong {
            if order == p {
                return false;
            }

            let mut power = BigUint::one();
            for _ in 0..MOV_DEGREE_BOUND {
                power = (power * p) % order;
                if power.is_one() {
                    return false;
                }
            }
        }

        true
    }

    /// Is `point` usable as a public key in this group?
    ///
    /// Rejects the identity, points of another group, points off the curve
    /// and points outside the subgroup generated by the base point.
    pub fn verify_public_element(&self, point: &CurvePoint) -> bool {
        point.group() == self
            && !point.is_identity()
            && point.on_curve()
            && point.multiply(self.order()).is_identity()
    }
}

impl PartialEq for CurveGroup {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }

        self.inner.field == other.inner.field
            && self.inner.equation.a == other.inner.equation.a
            && self.inner.equation.b == other.inner.equation.b
            && self.inner.base.x == other.inner.base.x
            && self.inner.base.y == other.inner.base.y
            && self.inner.order == other.inner.order
            && self.inner.cofactor == other.inner.cofactor
    }
}

impl Eq for CurveGroup {}

impl fmt::Debug for CurveGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.oid()) {
            (Some(name), _) => write!(f, "CurveGroup({name})"),
            (None, Some(oid)) => write!(f, "CurveGroup({oid})"),
            (None, None) => write!(f, "CurveGroup(p = 0x{:x})", self.p()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CurveGroup, DomainParameters};
    use crate::Error;
    use num_bigint::BigUint;

    /// `y² = x³ - 3x + 1` over GF(1_000_003), base point of prime order 999_979.
    fn toy_parameters() -> DomainParameters {
        let p = BigUint::from(1_000_003u32);
        DomainParameters {
            a: &p - 3u32,
            p,
            b: BigUint::from(1u32),
            g_x: BigUint::from(0u32),
            g_y: BigUint::from(1u32),
            order: BigUint::from(999_979u32),
            cofactor: BigUint::from(1u32),
        }
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut params = toy_parameters();
        params.p = BigUint::from(1_000_004u32);
        assert!(matches!(
            CurveGroup::new(params, None),
            Err(Error::InvalidArgument(_))
        ));

        let mut params = toy_parameters();
        params.order = BigUint::from(0u32);
        assert!(CurveGroup::new(params, None).is_err());

        let mut params = toy_parameters();
        params.g_y = BigUint::from(1_000_003u32);
        assert!(CurveGroup::new(params, None).is_err());
    }

    #[test]
    fn derived_values() {
        let group = CurveGroup::new(toy_parameters(), None).unwrap();
        assert!(group.a_is_minus_3());
        assert!(!group.a_is_zero());
        assert_eq!(group.p_bits(), 20);
        assert_eq!(group.p_bytes(), 3);
        assert_eq!(group.order_bits(), 20);
        assert_eq!(group.parameters(), toy_parameters());
        assert!(group.base_point().on_curve());
    }

    #[test]
    fn order_arithmetic() {
        let group = CurveGroup::new(toy_parameters(), None).unwrap();
        let k = BigUint::from(123_456u32);
        let inv = group.inverse_mod_order(&k).unwrap();
        assert_eq!(group.multiply_mod_order(&k, &inv), BigUint::from(1u32));
        assert!(group.inverse_mod_order(group.order()).is_none());
        assert_eq!(group.mod_order(&BigUint::from(999_980u32)), BigUint::from(1u32));
    }

    #[test]
    fn equality_ignores_identifiers() {
        let plain = CurveGroup::new(toy_parameters(), None).unwrap();
        let oid = "1.3.6.1.4.1.99999.1".parse().unwrap();
        let named = CurveGroup::new(toy_parameters(), Some(oid)).unwrap();
        assert_eq!(plain, named);

        let mut other = toy_parameters();
        other.b = BigUint::from(2u32);
        assert_ne!(plain, CurveGroup::new(other, None).unwrap());
    }
}
