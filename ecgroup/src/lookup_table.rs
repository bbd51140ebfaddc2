use crate::point_arithmetic::{Coordinates, CurveEquation};
use subtle::ConstantTimeEq;

/// Lookup table containing precomputed values `[p, 2p, 3p, ..., (2ʷ - 1)p]`
#[derive(Clone, Debug)]
pub(crate) struct LookupTable {
    window_bits: u8,
    identity: Coordinates,
    points: Vec<Coordinates>,
}

impl LookupTable {
    /// Compute a new lookup table from the given point.
    ///
    /// Entries are built with the complete addition formula.
    pub(crate) fn new(equation: &CurveEquation, p: &Coordinates, window_bits: u8) -> Self {
        let size = (1usize << window_bits) - 1;
        let mut points = Vec::with_capacity(size);
        points.push(p.clone());

        for j in 0..(size - 1) {
            let next = equation.add(p, &points[j]);
            points.push(next);
        }

        Self {
            window_bits,
            identity: Coordinates::identity(p.z.field()),
            points,
        }
    }

    pub(crate) fn window_bits(&self) -> u8 {
        self.window_bits
    }

    /// Given `0 <= x < 2ʷ`, returns `x * p`, reading every entry.
    pub(crate) fn select(&self, x: u8) -> Coordinates {
        debug_assert!(u32::from(x) < 1u32 << self.window_bits);

        let mut t = self.identity.clone();

        for (j, point) in self.points.iter().enumerate() {
            let c = x.ct_eq(&((j + 1) as u8));
            t.conditional_assign(point, c);
        }

        t
    }
}
