//! Modular square root implementations, adapted from <https://eprint.iacr.org/2012/685.pdf>.

use super::FieldElement;
use num_bigint::BigUint;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Upper bound on the candidates tried when searching for a quadratic non-residue.
const NON_RESIDUE_SEARCH_LIMIT: u32 = 1024;

/// Square root algorithms.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) enum Algorithm {
    /// Atkins algorithm for `q ≡ 5 (mod 8)`.
    Atkins,

    /// Shanks algorithm for `q ≡ 3 (mod 4)`.
    Shanks,

    /// Tonelli-Shanks algorithm for any odd prime.
    #[default]
    TonelliShanks,
}

impl Algorithm {
    /// Determine the best algorithm to use with a particular modulus.
    pub(super) fn for_modulus(p: &BigUint) -> Self {
        let low = p.iter_u32_digits().next().unwrap_or(0);

        if low % 4 == 3 {
            Self::Shanks
        } else if low % 8 == 5 {
            Self::Atkins
        } else {
            Self::TonelliShanks
        }
    }
}

/// Parameters for Tonelli-Shanks: `p - 1 = 2^s * t` with `t` odd, and a
/// primitive `2^s`-th root of unity.
pub(super) struct TonelliShanks {
    s: u32,
    t: BigUint,
    root_of_unity: BigUint,
}

impl TonelliShanks {
    /// Returns `None` when no quadratic non-residue turns up, which for a
    /// prime modulus does not happen in practice.
    pub(super) fn for_modulus(p: &BigUint) -> Option<Self> {
        let p_minus_1 = p - 1u32;
        let s = p_minus_1.trailing_zeros()? as u32;
        let t = &p_minus_1 >> s;
        let euler_exp = &p_minus_1 >> 1u32;

        (2..NON_RESIDUE_SEARCH_LIMIT)
            .map(BigUint::from)
            .find(|z| z.modpow(&euler_exp, p) == p_minus_1)
            .map(|z| Self {
                s,
                root_of_unity: z.modpow(&t, p),
                t,
            })
    }
}

impl FieldElement {
    /// Returns the square root of self mod p, or `None` if no square root exists.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(self.clone());
        }

        let root = match self.field.inner.sqrt {
            Algorithm::Atkins => self.sqrt_atkins(),
            Algorithm::Shanks => self.sqrt_shanks(),
            Algorithm::TonelliShanks => self.sqrt_tonelli_shanks()?,
        };

        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    /// Atkins algorithm for `q ≡ 5 (mod 8)`.
    ///
    /// From <https://eprint.iacr.org/2012/685.pdf> (page 10, algorithm 3)
    fn sqrt_atkins(&self) -> Self {
        debug_assert_eq!(Algorithm::for_modulus(self.field.modulus()), Algorithm::Atkins);

        let mod_minus_5_over_8 = (self.field.modulus() - 5u32) >> 3u32;
        let two = self.field.from_u64(2);

        let t = two.pow(&mod_minus_5_over_8);
        let a1 = self.pow(&mod_minus_5_over_8);
        let b = t * &a1;
        let ab = self * &b;
        let i = &two * &ab * &b;
        &ab * (i - self.field.one())
    }

    /// Shanks algorithm for `q ≡ 3 (mod 4)`.
    ///
    /// For `q = 3 (mod 4)`, sqrt can be computed with only one exponentiation as
    /// `self^((q + 1) / 4) (mod q)`.
    fn sqrt_shanks(&self) -> Self {
        debug_assert_eq!(Algorithm::for_modulus(self.field.modulus()), Algorithm::Shanks);

        let mod_plus_1_over_4 = (self.field.modulus() + 1u32) >> 2u32;
        self.pow(&mod_plus_1_over_4)
    }

    /// Tonelli-Shanks algorithm works for every odd prime.
    ///
    /// From <https://eprint.iacr.org/2012/685.pdf> (page 12, algorithm 5)
    fn sqrt_tonelli_shanks(&self) -> Option<Self> {
        let params = self.field.tonelli_shanks()?;
        let one = self.field.one();

        let t_minus_1_over_2 = (&params.t - 1u32) >> 1u32;
        let w = self.pow(&t_minus_1_over_2);

        let mut v = params.s;
        let mut x = self * &w;
        let mut b = &x * &w;
        let mut z = self.field.wrap(params.root_of_unity.clone());

        for max_v in (1..=params.s).rev() {
            let mut k = 1;
            let mut tmp = b.square();
            let mut j_less_than_v = Choice::from(1);

            for j in 2..max_v {
                let tmp_is_one = tmp.ct_eq(&one);
                let squared = Self::conditional_select(&tmp, &z, tmp_is_one).square();
                tmp = Self::conditional_select(&squared, &tmp, tmp_is_one);
                let new_z = Self::conditional_select(&z, &squared, tmp_is_one);
                j_less_than_v &= !j.ct_eq(&v);
                k = u32::conditional_select(&j, &k, tmp_is_one);
                z = Self::conditional_select(&z, &new_z, j_less_than_v);
            }

            let result = &x * &z;
            x = Self::conditional_select(&result, &x, b.ct_eq(&one));
            z = z.square();
            b *= &z;
            v = k;
        }

        Some(x)
    }
}

/// Square root of `a` modulo the odd prime `p`.
///
/// Returns `None` when `a` is a non-residue or `p` is not a usable modulus.
pub fn sqrt_mod_prime(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let field = super::PrimeField::new(p.clone()).ok()?;
    field.reduce(a).sqrt().map(FieldElement::into_value)
}
