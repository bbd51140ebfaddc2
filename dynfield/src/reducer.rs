//! Barrett reduction.

use crate::{Error, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Reduces integers modulo a fixed modulus using Barrett's method.
///
/// With `k` the bit length of the modulus, inputs below `2^(2k)` are reduced
/// with two multiplications and at most two subtractions. Larger inputs fall
/// back to long division. Results are always in `[0, modulus)`.
#[derive(Clone, Debug)]
pub struct ModularReducer {
    modulus: BigUint,
    mu: BigUint,
    bits: u64,
}

impl ModularReducer {
    /// Create a reducer for the given non-zero modulus.
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus.is_zero() {
            return Err(Error::InvalidModulus);
        }

        let bits = modulus.bits();
        let mu = (BigUint::one() << (2 * bits)) / &modulus;
        Ok(Self { modulus, mu, bits })
    }

    /// Modulus this reducer is bound to.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Returns `x mod modulus`.
    pub fn reduce(&self, x: &BigUint) -> BigUint {
        if x < &self.modulus {
            return x.clone();
        }

        if x.bits() > 2 * self.bits {
            return x % &self.modulus;
        }

        // q never exceeds floor(x / modulus) and undershoots by at most 2
        let q = ((x >> (self.bits - 1)) * &self.mu) >> (self.bits + 1);
        let mut r = x - q * &self.modulus;

        while r >= self.modulus {
            r -= &self.modulus;
        }

        r
    }

    /// Returns `x * y mod modulus`.
    pub fn multiply(&self, x: &BigUint, y: &BigUint) -> BigUint {
        self.reduce(&(x * y))
    }

    /// Returns `x^2 mod modulus`.
    pub fn square(&self, x: &BigUint) -> BigUint {
        self.reduce(&(x * x))
    }

    /// Returns `x^3 mod modulus`.
    pub fn cube(&self, x: &BigUint) -> BigUint {
        self.multiply(x, &self.square(x))
    }
}
