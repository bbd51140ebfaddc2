//! Random integers and probabilistic primality testing.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRng;
use zeroize::Zeroizing;

/// Primes used for trial division before running Miller-Rabin.
const SMALL_PRIMES: [u32; 24] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
];

/// Uniformly random integer in `[0, bound)`, by rejection sampling.
///
/// # Panics
/// If `bound` is zero.
pub fn random_below<R: CryptoRng + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    assert!(!bound.is_zero(), "random_below: bound must be non-zero");

    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let top_mask = 0xffu8 >> (len as u64 * 8 - bits);
    let mut buf = Zeroizing::new(vec![0u8; len]);

    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= top_mask;

        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return candidate;
        }
    }
}

/// Uniformly random integer in `[lo, hi)`.
///
/// # Panics
/// If `lo >= hi`.
pub fn random_in_range<R: CryptoRng + ?Sized>(rng: &mut R, lo: &BigUint, hi: &BigUint) -> BigUint {
    assert!(lo < hi, "random_in_range: empty range");
    lo + random_below(rng, &(hi - lo))
}

/// Miller-Rabin probable prime test with `rounds` random bases.
///
/// Deterministic for inputs below the square of the largest trial divisor.
pub fn is_probable_prime<R: CryptoRng + ?Sized>(n: &BigUint, rng: &mut R, rounds: usize) -> bool {
    if n < &BigUint::from(2u32) {
        return false;
    }

    for &small in SMALL_PRIMES.iter() {
        if n == &BigUint::from(small) {
            return true;
        }

        if (n % small).is_zero() {
            return false;
        }
    }

    let largest = SMALL_PRIMES[SMALL_PRIMES.len() - 1];
    if n < &BigUint::from(largest * largest) {
        return true;
    }

    let n_minus_1 = n - 1u32;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;
    let two = BigUint::from(2u32);

    'witness: for _ in 0..rounds {
        let a = random_in_range(rng, &two, &n_minus_1);
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x).mod_floor(n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}
