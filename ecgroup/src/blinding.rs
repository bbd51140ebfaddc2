//! Side-channel hardened multiplication of a fixed base point.

use crate::{
    CurveGroup, CurvePoint, Error, Result, lookup_table::LookupTable, point_arithmetic::Coordinates,
};
use core::fmt;
use dynfield::random_below;
use num_bigint::BigUint;
use rand_core::CryptoRng;
use std::sync::Arc;
use zeroize::Zeroize;

/// Window width used for a group's base point multiplier.
pub const DEFAULT_WINDOW_BITS: u8 = 4;

/// Largest supported window width.
pub const MAX_WINDOW_BITS: u8 = 8;

/// The accumulator is re-randomized after this many windows.
const RANDOMIZE_INTERVAL: usize = 4;

/// Computes `k · G` for a fixed point `G` without a scalar dependent
/// sequence of group operations.
///
/// Each call blinds the scalar with a random multiple of the group order,
/// walks the blinded scalar in fixed-width windows doing the same doublings
/// and one complete addition per window, fetches table entries by scanning
/// the whole table, and periodically rescales the accumulator's projective
/// coordinates.
///
/// The precomputed table is shared between clones.
#[derive(Clone)]
pub struct BlindedMultiplier {
    group: CurveGroup,
    table: Arc<LookupTable>,
}

impl BlindedMultiplier {
    /// Precompute `[G, 2G, ..., (2ʷ - 1)G]` for the window width `w`.
    ///
    /// Fails with [`Error::InvalidArgument`] when `w` is zero or above
    /// [`MAX_WINDOW_BITS`], or when `base` is the identity.
    pub fn new(base: &CurvePoint, window_bits: u8) -> Result<Self> {
        if window_bits == 0 || window_bits > MAX_WINDOW_BITS {
            return Err(Error::InvalidArgument("window width must be between 1 and 8"));
        }

        if base.is_identity() {
            return Err(Error::InvalidArgument("base point must not be the identity"));
        }

        let group = base.group().clone();
        let table = LookupTable::new(group.equation(), base.coordinates(), window_bits);

        Ok(Self::from_table(group, Arc::new(table)))
    }

    pub(crate) fn from_table(group: CurveGroup, table: Arc<LookupTable>) -> Self {
        Self { group, table }
    }

    /// Group of the base point.
    pub fn group(&self) -> &CurveGroup {
        &self.group
    }

    /// Window width `w`.
    pub fn window_bits(&self) -> u8 {
        self.table.window_bits()
    }

    /// Returns `k · G`.
    ///
    /// `order` is the order of `G` and is used for blinding; `k` is normally
    /// below it, but larger scalars give the same result as
    /// [`CurvePoint::multiply`]. The workspace is wiped before returning.
    pub fn multiply<R: CryptoRng + ?Sized>(
        &self,
        k: &BigUint,
        order: &BigUint,
        rng: &mut R,
        workspace: &mut BlindingWorkspace,
    ) -> CurvePoint {
        let equation = self.group.equation();
        let window_bits = usize::from(self.table.window_bits());

        let order_bits = order.bits() as usize;
        let mask_bits = order_bits.div_ceil(2).max(1);
        let mut mask = random_below(rng, &(BigUint::from(1u8) << mask_bits));
        mask |= BigUint::from(1u8) << (mask_bits - 1);

        let blinded = k + mask * order;
        let scalar_bits = (blinded.bits() as usize).max(order_bits + mask_bits + 1);
        workspace.load(&blinded, scalar_bits.div_ceil(window_bits), window_bits);
        drop(blinded);

        let mut acc = Coordinates::identity(self.group.field());
        acc.randomize(rng);

        for (i, &digit) in workspace.digits.iter().enumerate() {
            for _ in 0..window_bits {
                acc = equation.double(&acc);
            }

            acc = equation.add(&acc, &self.table.select(digit));

            if (i + 1) % RANDOMIZE_INTERVAL == 0 {
                acc.randomize(rng);
            }
        }

        workspace.zeroize();
        CurvePoint::from_coordinates(self.group.clone(), acc)
    }
}

impl fmt::Debug for BlindedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlindedMultiplier")
            .field("group", &self.group)
            .field("window_bits", &self.window_bits())
            .finish_non_exhaustive()
    }
}

/// Reusable scratch space for [`BlindedMultiplier::multiply`].
///
/// Holds the blinded scalar and its window digits during a call and is
/// zeroized afterwards and on drop.
#[derive(Default)]
pub struct BlindingWorkspace {
    scalar: Vec<u8>,
    digits: Vec<u8>,
}

impl BlindingWorkspace {
    /// Empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `k` into `windows` digits of `window_bits` bits each, most
    /// significant first.
    fn load(&mut self, k: &BigUint, windows: usize, window_bits: usize) {
        self.zeroize();

        let bytes = (windows * window_bits).div_ceil(8) + 1;
        self.scalar.extend_from_slice(&k.to_bytes_le());
        self.scalar.resize(bytes, 0);

        let mask = (1u16 << window_bits) - 1;
        for i in (0..windows).rev() {
            let bit = i * window_bits;
            let (byte, shift) = (bit / 8, bit % 8);
            let pair = u16::from(self.scalar[byte]) | (u16::from(self.scalar[byte + 1]) << 8);
            self.digits.push(((pair >> shift) & mask) as u8);
        }
    }
}

impl Zeroize for BlindingWorkspace {
    fn zeroize(&mut self) {
        self.scalar.zeroize();
        self.digits.zeroize();
    }
}

impl Drop for BlindingWorkspace {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for BlindingWorkspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlindingWorkspace").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::BlindingWorkspace;
    use num_bigint::BigUint;

    #[test]
    fn digits_most_significant_first() {
        let mut ws = BlindingWorkspace::new();
        ws.load(&BigUint::from(0xabcdu32), 5, 4);
        assert_eq!(ws.digits, [0x0, 0xa, 0xb, 0xc, 0xd]);

        ws.load(&BigUint::from(0b1_0110_1101u32), 3, 3);
        assert_eq!(ws.digits, [0b101, 0b101, 0b101]);

        ws.load(&BigUint::from(0x1234u32), 2, 8);
        assert_eq!(ws.digits, [0x12, 0x34]);
    }

    #[test]
    fn zeroize_clears_scratch() {
        use zeroize::Zeroize;

        let mut ws = BlindingWorkspace::new();
        ws.load(&BigUint::from(u64::MAX), 16, 4);
        ws.zeroize();
        assert!(ws.scalar.is_empty());
        assert!(ws.digits.is_empty());
    }
}
