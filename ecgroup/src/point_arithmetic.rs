//! Point arithmetic implementation optimised for different curve equations
//!
//! Support for formulas specialized to the short Weierstrass equation's
//! 𝒂-coefficient.

use dynfield::{FieldElement, PrimeField};
use rand_core::CryptoRng;
use subtle::Choice;

/// Homogeneous projective coordinates `(X : Y : Z)` representing the affine
/// point `(X/Z, Y/Z)`, or the identity when `Z = 0`.
#[derive(Clone, Debug)]
pub(crate) struct Coordinates {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl Coordinates {
    /// Canonical representation of the point at infinity, `(0 : 1 : 0)`.
    pub(crate) fn identity(field: &PrimeField) -> Self {
        Self {
            x: field.zero(),
            y: field.one(),
            z: field.zero(),
        }
    }

    /// Lift affine coordinates with `Z = 1`.
    pub(crate) fn from_affine(x: FieldElement, y: FieldElement) -> Self {
        let z = x.field().one();
        Self { x, y, z }
    }

    pub(crate) fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// `(0 : 0 : 0)`, which is not a point: the projective formulas output it
    /// for input pairs they cannot handle.
    fn is_degenerate(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Affine coordinates, or `None` for the identity.
    pub(crate) fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        let zinv = self.z.invert()?;
        Some((&self.x * &zinv, &self.y * &zinv))
    }

    pub(crate) fn neg(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: -&self.y,
            z: self.z.clone(),
        }
    }

    /// Same logical point, compared by cross multiplication.
    pub(crate) fn equivalent(&self, other: &Self) -> bool {
        match (self.is_identity(), other.is_identity()) {
            (true, true) => true,
            (false, false) => {
                &self.x * &other.z == &other.x * &self.z
                    && &self.y * &other.z == &other.y * &self.z
            }
            _ => false,
        }
    }

    /// Scale every coordinate by a fresh random non-zero factor.
    pub(crate) fn randomize<R: CryptoRng + ?Sized>(&mut self, rng: &mut R) {
        let lambda = self.z.field().random_nonzero(rng);
        self.x *= &lambda;
        self.y *= &lambda;
        self.z *= &lambda;
    }

    pub(crate) fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        self.x.conditional_assign(&other.x, choice);
        self.y.conditional_assign(&other.y, choice);
        self.z.conditional_assign(&other.z, choice);
    }
}

/// Which family of formulas applies to a curve's 𝒂-coefficient.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EquationA {
    /// The 𝒂-coefficient does not have specific properties which allow for
    /// an optimized implementation.
    IsGeneric,

    /// The 𝒂-coefficient is -3.
    IsMinusThree,
}

/// Curve coefficients in field form together with the formulas they select.
#[derive(Clone, Debug)]
pub(crate) struct CurveEquation {
    pub(crate) a: FieldElement,
    pub(crate) b: FieldElement,
    b3: FieldElement,
    pub(crate) form: EquationA,
}

impl CurveEquation {
    pub(crate) fn new(a: FieldElement, b: FieldElement) -> Self {
        let field = a.field().clone();
        let form = if a == -field.from_u64(3) {
            EquationA::IsMinusThree
        } else {
            EquationA::IsGeneric
        };
        let b3 = &b * field.from_u64(3);

        Self { a, b, b3, form }
    }

    /// Does `(X : Y : Z)` satisfy `Y²Z = X³ + aXZ² + bZ³`?
    pub(crate) fn is_on_curve(&self, p: &Coordinates) -> bool {
        let z2 = p.z.square();
        let lhs = p.y.square() * &p.z;
        let rhs = p.x.cube() + &self.a * &p.x * &z2 + &self.b * z2 * &p.z;
        lhs == rhs
    }

    /// Point addition, correct for every pair of inputs including the
    /// identity, equal points and mutual negatives.
    ///
    /// The complete formulas fail only when `lhs - rhs` has order 2, which
    /// requires an even curve order. Those pairs are recomputed in affine
    /// form, so on odd-order curves the sequence of field operations does
    /// not depend on the inputs.
    pub(crate) fn add(&self, lhs: &Coordinates, rhs: &Coordinates) -> Coordinates {
        let sum = match self.form {
            EquationA::IsGeneric => self.add_generic(lhs, rhs),
            EquationA::IsMinusThree => self.add_minus_three(lhs, rhs),
        };

        if sum.is_degenerate() {
            return self.add_affine(lhs, rhs);
        }

        sum
    }

    /// Point doubling. Points of order 2 double to the identity.
    pub(crate) fn double(&self, point: &Coordinates) -> Coordinates {
        let doubled = match self.form {
            EquationA::IsGeneric => self.double_generic(point),
            EquationA::IsMinusThree => self.double_minus_three(point),
        };

        if doubled.is_degenerate() {
            return self.add_affine(point, point);
        }

        doubled
    }

    /// Chord and tangent addition on affine coordinates.
    fn add_affine(&self, lhs: &Coordinates, rhs: &Coordinates) -> Coordinates {
        let field = self.a.field();
        let (Some((x1, y1)), Some((x2, y2))) = (lhs.to_affine(), rhs.to_affine()) else {
            return if lhs.is_identity() {
                rhs.clone()
            } else {
                lhs.clone()
            };
        };

        let (numerator, denominator) = if x1 != x2 {
            (&y2 - &y1, &x2 - &x1)
        } else if (&y1 + &y2).is_zero() {
            return Coordinates::identity(field);
        } else {
            (x1.square() * field.from_u64(3) + &self.a, y1.double())
        };

        // non-zero in both branches: x1 != x2, or y1 = y2 != 0
        let Some(inverse) = denominator.invert() else {
            return Coordinates::identity(field);
        };

        let slope = numerator * inverse;
        let x3 = slope.square() - &x1 - &x2;
        let y3 = slope * (&x1 - &x3) - &y1;
        Coordinates::from_affine(x3, y3)
    }

    /// Implements complete addition for any curve
    ///
    /// Implements the complete addition formula from [Renes-Costello-Batina 2015]
    /// (Algorithm 1). The comments after each line indicate which algorithm steps
    /// are being performed.
    ///
    /// [Renes-Costello-Batina 2015]: https://eprint.iacr.org/2015/1060
    fn add_generic(&self, lhs: &Coordinates, rhs: &Coordinates) -> Coordinates {
        let (a, b3) = (&self.a, &self.b3);

        let t0 = &lhs.x * &rhs.x; // 1
        let t1 = &lhs.y * &rhs.y; // 2
        let t2 = &lhs.z * &rhs.z; // 3
        let t3 = &lhs.x + &lhs.y; // 4
        let t4 = &rhs.x + &rhs.y; // 5
        let t3 = t3 * t4; // 6
        let t4 = &t0 + &t1; // 7
        let t3 = t3 - t4; // 8
        let t4 = &lhs.x + &lhs.z; // 9
        let t5 = &rhs.x + &rhs.z; // 10
        let t4 = t4 * t5; // 11
        let t5 = &t0 + &t2; // 12
        let t4 = t4 - t5; // 13
        let t5 = &lhs.y + &lhs.z; // 14
        let x3 = &rhs.y + &rhs.z; // 15
        let t5 = t5 * x3; // 16
        let x3 = &t1 + &t2; // 17
        let t5 = t5 - x3; // 18
        let z3 = a * &t4; // 19
        let x3 = b3 * &t2; // 20
        let z3 = x3 + z3; // 21
        let x3 = &t1 - &z3; // 22
        let z3 = t1 + z3; // 23
        let y3 = &x3 * &z3; // 24
        let t1 = &t0 + &t0; // 25
        let t1 = t1 + &t0; // 26
        let t2 = a * &t2; // 27
        let t4 = b3 * &t4; // 28
        let t1 = t1 + &t2; // 29
        let t2 = &t0 - &t2; // 30
        let t2 = a * &t2; // 31
        let t4 = t4 + t2; // 32
        let t0 = &t1 * &t4; // 33
        let y3 = y3 + t0; // 34
        let t0 = &t5 * &t4; // 35
        let x3 = &t3 * &x3; // 36
        let x3 = x3 - t0; // 37
        let t0 = t3 * t1; // 38
        let z3 = t5 * z3; // 39
        let z3 = z3 + t0; // 40

        Coordinates {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Implements point doubling for curves with any `a`
    ///
    /// Implements the exception-free point doubling formula from [Renes-Costello-Batina 2015]
    /// (Algorithm 3). The comments after each line indicate which algorithm
    /// steps are being performed.
    ///
    /// [Renes-Costello-Batina 2015]: https://eprint.iacr.org/2015/1060
    fn double_generic(&self, point: &Coordinates) -> Coordinates {
        let (a, b3) = (&self.a, &self.b3);

        let t0 = point.x.square(); // 1
        let t1 = point.y.square(); // 2
        let t2 = point.z.square(); // 3
        let t3 = &point.x * &point.y; // 4
        let t3 = t3.double(); // 5
        let z3 = &point.x * &point.z; // 6
        let z3 = z3.double(); // 7
        let x3 = a * &z3; // 8
        let y3 = b3 * &t2; // 9
        let y3 = x3 + y3; // 10
        let x3 = &t1 - &y3; // 11
        let y3 = &t1 + y3; // 12
        let y3 = &x3 * y3; // 13
        let x3 = t3 * x3; // 14
        let z3 = b3 * z3; // 15
        let t2 = a * t2; // 16
        let t3 = &t0 - &t2; // 17
        let t3 = a * t3; // 18
        let t3 = t3 + z3; // 19
        let z3 = t0.double(); // 20
        let t0 = z3 + t0; // 21
        let t0 = t0 + t2; // 22
        let t0 = t0 * &t3; // 23
        let y3 = y3 + t0; // 24
        let t2 = &point.y * &point.z; // 25
        let t2 = t2.double(); // 26
        let t0 = &t2 * &t3; // 27
        let x3 = x3 - t0; // 28
        let z3 = t2 * t1; // 29
        let z3 = z3.double(); // 30
        let z3 = z3.double(); // 31

        Coordinates {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Implements complete addition for curves with `a = -3`
    ///
    /// Implements the complete addition formula from [Renes-Costello-Batina 2015]
    /// (Algorithm 4). The comments after each line indicate which algorithm steps
    /// are being performed.
    ///
    /// [Renes-Costello-Batina 2015]: https://eprint.iacr.org/2015/1060
    fn add_minus_three(&self, lhs: &Coordinates, rhs: &Coordinates) -> Coordinates {
        debug_assert_eq!(self.form, EquationA::IsMinusThree);
        let b = &self.b;

        let xx = &lhs.x * &rhs.x; // 1
        let yy = &lhs.y * &rhs.y; // 2
        let zz = &lhs.z * &rhs.z; // 3
        let xy_pairs = ((&lhs.x + &lhs.y) * (&rhs.x + &rhs.y)) - (&xx + &yy); // 4, 5, 6, 7, 8
        let yz_pairs = ((&lhs.y + &lhs.z) * (&rhs.y + &rhs.z)) - (&yy + &zz); // 9, 10, 11, 12, 13
        let xz_pairs = ((&lhs.x + &lhs.z) * (&rhs.x + &rhs.z)) - (&xx + &zz); // 14, 15, 16, 17, 18

        let bzz_part = &xz_pairs - (b * &zz); // 19, 20
        let bzz3_part = bzz_part.double() + &bzz_part; // 21, 22
        let yy_m_bzz3 = &yy - &bzz3_part; // 23
        let yy_p_bzz3 = &yy + &bzz3_part; // 24

        let zz3 = zz.double() + &zz; // 26, 27
        let bxz_part = (b * &xz_pairs) - (&zz3 + &xx); // 25, 28, 29
        let bxz3_part = bxz_part.double() + &bxz_part; // 30, 31
        let xx3_m_zz3 = xx.double() + &xx - &zz3; // 32, 33, 34

        Coordinates {
            x: (&yy_p_bzz3 * &xy_pairs) - (&yz_pairs * &bxz3_part), // 35, 39, 40
            y: (&yy_p_bzz3 * &yy_m_bzz3) + (&xx3_m_zz3 * &bxz3_part), // 36, 37, 38
            z: (&yy_m_bzz3 * &yz_pairs) + (&xy_pairs * &xx3_m_zz3), // 41, 42, 43
        }
    }

    /// Implements point doubling for curves with `a = -3`
    ///
    /// Implements the exception-free point doubling formula from [Renes-Costello-Batina 2015]
    /// (Algorithm 6). The comments after each line indicate which algorithm
    /// steps are being performed.
    ///
    /// [Renes-Costello-Batina 2015]: https://eprint.iacr.org/2015/1060
    fn double_minus_three(&self, point: &Coordinates) -> Coordinates {
        debug_assert_eq!(self.form, EquationA::IsMinusThree);
        let b = &self.b;

        let xx = point.x.square(); // 1
        let yy = point.y.square(); // 2
        let zz = point.z.square(); // 3
        let xy2 = (&point.x * &point.y).double(); // 4, 5
        let xz2 = (&point.x * &point.z).double(); // 6, 7

        let bzz_part = (b * &zz) - &xz2; // 8, 9
        let bzz3_part = bzz_part.double() + &bzz_part; // 10, 11
        let yy_m_bzz3 = &yy - &bzz3_part; // 12
        let yy_p_bzz3 = &yy + &bzz3_part; // 13
        let y_frag = &yy_p_bzz3 * &yy_m_bzz3; // 14
        let x_frag = &yy_m_bzz3 * &xy2; // 15

        let zz3 = zz.double() + &zz; // 16, 17
        let bxz2_part = (b * &xz2) - (&zz3 + &xx); // 18, 19, 20
        let bxz6_part = bxz2_part.double() + &bxz2_part; // 21, 22
        let xx3_m_zz3 = xx.double() + &xx - &zz3; // 23, 24, 25

        let y = y_frag + (&xx3_m_zz3 * &bxz6_part); // 26, 27
        let yz2 = (&point.y * &point.z).double(); // 28, 29
        let x = x_frag - (&bxz6_part * &yz2); // 30, 31
        let z = (&yz2 * &yy).double().double(); // 32, 33, 34

        Coordinates { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinates, CurveEquation, EquationA};
    use dynfield::{BigUint, PrimeField};

    /// `y² = x³ - 3x + 1` and `y² = x³ + 2x + 21` over GF(1_000_003), with
    /// odd group orders 999_979 and 1_001_295.
    fn curves() -> (PrimeField, CurveEquation, CurveEquation) {
        let field = PrimeField::new(BigUint::from(1_000_003u32)).unwrap();
        let minus_three = CurveEquation::new(-field.from_u64(3), field.one());
        let generic = CurveEquation::new(field.from_u64(2), field.from_u64(21));
        (field, minus_three, generic)
    }

    /// `y² = x³ - 3x - 110` and `y² = x³ + 2x - 135` over GF(1_000_003),
    /// both through the point `(5, 0)` of order 2.
    fn curves_with_two_torsion() -> (PrimeField, [CurveEquation; 2]) {
        let field = PrimeField::new(BigUint::from(1_000_003u32)).unwrap();
        let minus_three = CurveEquation::new(-field.from_u64(3), -field.from_u64(110));
        let generic = CurveEquation::new(field.from_u64(2), -field.from_u64(135));
        (field, [minus_three, generic])
    }

    /// Find a point by scanning small x-coordinates.
    fn some_point(field: &PrimeField, curve: &CurveEquation) -> Coordinates {
        (1..)
            .map(|x| field.from_u64(x))
            .find_map(|x| {
                let rhs = x.cube() + &curve.a * &x + &curve.b;
                if rhs.is_zero() {
                    return None;
                }
                rhs.sqrt().map(|y| Coordinates::from_affine(x, y))
            })
            .unwrap()
    }

    #[test]
    fn formula_selection() {
        let (_, minus_three, generic) = curves();
        assert_eq!(minus_three.form, EquationA::IsMinusThree);
        assert_eq!(generic.form, EquationA::IsGeneric);
    }

    #[test]
    fn addition_special_cases() {
        let (field, minus_three, generic) = curves();

        for curve in [minus_three, generic] {
            let p = some_point(&field, &curve);
            let identity = Coordinates::identity(&field);

            assert!(curve.add(&p, &identity).equivalent(&p));
            assert!(curve.add(&identity, &p).equivalent(&p));
            assert!(curve.add(&p, &p.neg()).is_identity());
            assert!(curve.add(&p, &p).equivalent(&curve.double(&p)));
            assert!(curve.double(&identity).is_identity());

            let p2 = curve.double(&p);
            assert!(curve.is_on_curve(&p2));
            let p3 = curve.add(&p2, &p);
            assert!(curve.is_on_curve(&p3));
            assert!(curve.add(&p, &p2).equivalent(&p3));
        }
    }

    #[test]
    fn points_of_order_two() {
        let (field, curves) = curves_with_two_torsion();

        for curve in curves {
            let t = Coordinates::from_affine(field.from_u64(5), field.zero());
            let identity = Coordinates::identity(&field);
            assert!(curve.is_on_curve(&t));

            let doubled = curve.double(&t);
            assert!(doubled.is_identity());
            assert!(!doubled.is_degenerate());
            assert!(curve.add(&t, &t).is_identity());
            assert!(curve.add(&t, &identity).equivalent(&t));
            assert!(curve.add(&identity, &t).equivalent(&t));
            assert!(curve.add(&doubled, &t).equivalent(&t));

            // p and p + t differ by a point of order 2
            let p = some_point(&field, &curve);
            let p_plus_t = curve.add(&p, &t);
            assert!(curve.is_on_curve(&p_plus_t));
            assert!(!p_plus_t.is_identity());

            let sum = curve.add(&p, &p_plus_t);
            assert!(!sum.is_degenerate());
            assert!(curve.is_on_curve(&sum));
            assert!(sum.equivalent(&curve.add(&curve.double(&p), &t)));
            assert!(curve.add(&p_plus_t, &p.neg()).equivalent(&t));
        }
    }
}
