//! Prime fields whose modulus is chosen at runtime.

mod sqrt;

pub use self::sqrt::sqrt_mod_prime;

use crate::{Error, ModularReducer, Result, prime::random_below};
use core::{
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRng;
use std::sync::{Arc, OnceLock};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Handle to the prime field `GF(p)`.
///
/// Cloning is cheap: all clones share the same modulus, reducer and cached
/// square root parameters.
#[derive(Clone)]
pub struct PrimeField {
    inner: Arc<FieldInner>,
}

struct FieldInner {
    reducer: ModularReducer,
    bits: usize,
    bytes: usize,
    limbs: usize,
    sqrt: sqrt::Algorithm,
    tonelli_shanks: OnceLock<Option<sqrt::TonelliShanks>>,
}

impl PrimeField {
    /// Create the field with the given modulus.
    ///
    /// The modulus must be odd and greater than 3. Primality is not checked
    /// here, see [`crate::is_probable_prime`].
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus.is_even() || modulus <= BigUint::from(3u8) {
            return Err(Error::InvalidModulus);
        }

        let bits = modulus.bits() as usize;
        let sqrt = sqrt::Algorithm::for_modulus(&modulus);
        let reducer = ModularReducer::new(modulus)?;

        Ok(Self {
            inner: Arc::new(FieldInner {
                reducer,
                bits,
                bytes: bits.div_ceil(8),
                limbs: bits.div_ceil(32),
                sqrt,
                tonelli_shanks: OnceLock::new(),
            }),
        })
    }

    /// Field modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        self.inner.reducer.modulus()
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> usize {
        self.inner.bits
    }

    /// Byte length of the modulus, which is also the encoded length of an element.
    pub fn bytes(&self) -> usize {
        self.inner.bytes
    }

    /// Additive identity.
    pub fn zero(&self) -> FieldElement {
        self.wrap(BigUint::zero())
    }

    /// Multiplicative identity.
    pub fn one(&self) -> FieldElement {
        self.wrap(BigUint::one())
    }

    /// Reduce a small integer into the field.
    pub fn from_u64(&self, n: u64) -> FieldElement {
        self.reduce(&BigUint::from(n))
    }

    /// Reduce an arbitrary integer into the field.
    pub fn reduce(&self, value: &BigUint) -> FieldElement {
        self.wrap(self.inner.reducer.reduce(value))
    }

    /// Wrap an integer which must already be a canonical residue.
    pub fn element(&self, value: BigUint) -> Result<FieldElement> {
        if &value >= self.modulus() {
            return Err(Error::NotReduced);
        }

        Ok(self.wrap(value))
    }

    /// Decode a big endian integer of at most [`PrimeField::bytes`] bytes.
    pub fn from_be_bytes(&self, bytes: &[u8]) -> Result<FieldElement> {
        if bytes.len() > self.bytes() {
            return Err(Error::InvalidLength);
        }

        self.element(BigUint::from_bytes_be(bytes))
    }

    /// Uniformly random element.
    pub fn random<R: CryptoRng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        self.wrap(random_below(rng, self.modulus()))
    }

    /// Uniformly random element of the multiplicative group.
    pub fn random_nonzero<R: CryptoRng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        loop {
            let candidate = self.random(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    fn wrap(&self, value: BigUint) -> FieldElement {
        debug_assert!(&value < self.modulus());
        FieldElement {
            value,
            field: self.clone(),
        }
    }

    fn tonelli_shanks(&self) -> Option<&sqrt::TonelliShanks> {
        self.inner
            .tonelli_shanks
            .get_or_init(|| sqrt::TonelliShanks::for_modulus(self.modulus()))
            .as_ref()
    }
}

impl PartialEq for PrimeField {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.modulus() == other.modulus()
    }
}

impl Eq for PrimeField {}

impl fmt::Debug for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimeField(0x{:x})", self.modulus())
    }
}

/// Element of a [`PrimeField`], always held as its canonical residue.
#[derive(Clone)]
pub struct FieldElement {
    value: BigUint,
    field: PrimeField,
}

impl FieldElement {
    /// Canonical residue in `[0, p)`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Consume the element, returning its canonical residue.
    pub fn into_value(self) -> BigUint {
        self.value
    }

    /// Field this element belongs to.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// Is this element zero?
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Is this element one?
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Is the canonical residue odd?
    pub fn is_odd(&self) -> bool {
        self.value.is_odd()
    }

    /// Returns `self + self`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        self.field.wrap(self.field.inner.reducer.square(&self.value))
    }

    /// Returns `self * self * self`.
    pub fn cube(&self) -> Self {
        self.field.wrap(self.field.inner.reducer.cube(&self.value))
    }

    /// Returns `self^exp`.
    pub fn pow(&self, exp: &BigUint) -> Self {
        self.field.wrap(self.value.modpow(exp, self.field.modulus()))
    }

    /// Multiplicative inverse, or `None` for zero.
    pub fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        let exp = self.field.modulus() - 2u32;
        Some(self.pow(&exp))
    }

    /// Big endian encoding, left padded to [`PrimeField::bytes`] bytes.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let len = self.field.bytes();
        let digits = self.value.to_bytes_be();
        let mut out = vec![0u8; len];
        out[len - digits.len()..].copy_from_slice(&digits);
        out
    }

    /// Returns `b` if `choice` is set and `a` otherwise.
    pub fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = a.clone();
        out.conditional_assign(b, choice);
        out
    }

    /// Replace `self` with `other` if `choice` is set.
    ///
    /// The selection runs over every limb of the fixed-width representation.
    pub fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        debug_assert_eq!(self.field, other.field);
        let mut limbs = self.limbs();
        for (limb, other) in limbs.iter_mut().zip(other.limbs().iter()) {
            limb.conditional_assign(other, choice);
        }
        self.value = BigUint::new(limbs);
    }

    /// Swap `a` and `b` if `choice` is set.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        let tmp = a.clone();
        a.conditional_assign(b, choice);
        b.conditional_assign(&tmp, choice);
    }

    /// Little endian 32-bit limbs, zero padded to the width of the modulus.
    fn limbs(&self) -> Vec<u32> {
        let mut limbs = self.value.to_u32_digits();
        limbs.resize(self.field.inner.limbs, 0);
        limbs
    }

    fn add(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.field, rhs.field);
        let mut value = &self.value + &rhs.value;
        if &value >= self.field.modulus() {
            value -= self.field.modulus();
        }
        self.field.wrap(value)
    }

    fn sub(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.field, rhs.field);
        let value = if self.value >= rhs.value {
            &self.value - &rhs.value
        } else {
            self.field.modulus() - &rhs.value + &self.value
        };
        self.field.wrap(value)
    }

    fn multiply(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.field, rhs.field);
        self.field
            .wrap(self.field.inner.reducer.multiply(&self.value, &rhs.value))
    }

    fn neg(&self) -> Self {
        if self.is_zero() {
            self.clone()
        } else {
            self.field.wrap(self.field.modulus() - &self.value)
        }
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs().as_slice().ct_eq(other.limbs().as_slice())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.field == other.field
    }
}

impl Eq for FieldElement {}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{:x})", self.value)
    }
}

macro_rules! field_op {
    ($op:tt, $func:ident, $inner_func:ident) => {
        impl $op for FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $func(self, rhs: FieldElement) -> FieldElement {
                FieldElement::$inner_func(&self, &rhs)
            }
        }

        impl $op<&FieldElement> for FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $func(self, rhs: &FieldElement) -> FieldElement {
                FieldElement::$inner_func(&self, rhs)
            }
        }

        impl $op<FieldElement> for &FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $func(self, rhs: FieldElement) -> FieldElement {
                FieldElement::$inner_func(self, &rhs)
            }
        }

        impl $op<&FieldElement> for &FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $func(self, rhs: &FieldElement) -> FieldElement {
                FieldElement::$inner_func(self, rhs)
            }
        }
    };
}

macro_rules! field_assign_op {
    ($op:tt, $func:ident, $inner_func:ident) => {
        impl $op<FieldElement> for FieldElement {
            #[inline]
            fn $func(&mut self, rhs: FieldElement) {
                *self = FieldElement::$inner_func(self, &rhs);
            }
        }

        impl $op<&FieldElement> for FieldElement {
            #[inline]
            fn $func(&mut self, rhs: &FieldElement) {
                *self = FieldElement::$inner_func(self, rhs);
            }
        }
    };
}

field_op!(Add, add, add);
field_op!(Sub, sub, sub);
field_op!(Mul, mul, multiply);
field_assign_op!(AddAssign, add_assign, add);
field_assign_op!(SubAssign, sub_assign, sub);
field_assign_op!(MulAssign, mul_assign, multiply);

impl Neg for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn neg(self) -> FieldElement {
        FieldElement::neg(&self)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    #[inline]
    fn neg(self) -> FieldElement {
        FieldElement::neg(self)
    }
}
