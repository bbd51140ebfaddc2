//! Lookup of curve groups by name or object identifier.

use crate::{
    CurveGroup, DomainParameters, Error, Result,
    named::{CURVE_COUNT, CURVES},
};
use core::{fmt, str::FromStr};
use num_bigint::BigUint;
use std::{
    collections::{BTreeSet, HashMap},
    sync::{LazyLock, OnceLock, PoisonError, RwLock},
};

/// ASN.1 object identifier in dotted decimal form, e.g. `1.2.840.10045.3.1.7`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Oid(String);

impl Oid {
    /// Dotted decimal form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Oid {
    type Err = Error;

    /// Accepts at least two arcs of decimal digits without leading zeros,
    /// the first of which is 0, 1 or 2.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = Error::InvalidArgument("malformed object identifier");
        let arcs: Vec<&str> = s.split('.').collect();

        if arcs.len() < 2 {
            return Err(malformed);
        }

        for arc in &arcs {
            let canonical = !arc.is_empty()
                && arc.bytes().all(|b| b.is_ascii_digit())
                && (arc.len() == 1 || !arc.starts_with('0'));

            if !canonical {
                return Err(malformed);
            }
        }

        if !matches!(arcs[0], "0" | "1" | "2") {
            return Err(malformed);
        }

        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key for [`CurveRegistry::lookup`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CurveId {
    /// Canonical name or alias of a named curve.
    Name(String),

    /// Object identifier.
    Oid(Oid),
}

impl From<Oid> for CurveId {
    fn from(oid: Oid) -> Self {
        CurveId::Oid(oid)
    }
}

impl FromStr for CurveId {
    type Err = Error;

    /// Strings made of digits and dots are read as OIDs, anything else as a
    /// name.
    fn from_str(s: &str) -> Result<Self> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            Ok(CurveId::Oid(s.parse()?))
        } else {
            Ok(CurveId::Name(s.to_owned()))
        }
    }
}

/// Maps curve names and OIDs to groups.
///
/// Named curves are built on first lookup and cached. Groups registered at
/// runtime are keyed by OID and take precedence over the named table, so
/// registering under a standard OID shadows it. Registering the same OID
/// again replaces the earlier group.
pub struct CurveRegistry {
    registered: RwLock<HashMap<Oid, CurveGroup>>,
    named: [OnceLock<CurveGroup>; CURVE_COUNT],
}

static GLOBAL: LazyLock<CurveRegistry> = LazyLock::new(CurveRegistry::new);

impl CurveRegistry {
    /// Registry holding only the named curves.
    pub fn new() -> Self {
        Self {
            registered: RwLock::new(HashMap::new()),
            named: [const { OnceLock::new() }; CURVE_COUNT],
        }
    }

    /// Process-wide registry.
    pub fn global() -> &'static CurveRegistry {
        &GLOBAL
    }

    /// Named curve by canonical name or alias.
    pub fn by_name(&self, name: &str) -> Result<CurveGroup> {
        let index = CURVES
            .iter()
            .position(|curve| curve.answers_to(name))
            .ok_or(Error::UnknownCurve)?;

        self.named_group(index)
    }

    /// Group registered under `oid`, or the named curve with that OID.
    pub fn by_oid(&self, oid: &Oid) -> Result<CurveGroup> {
        let registered = self
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(oid)
            .cloned();

        if let Some(group) = registered {
            return Ok(group);
        }

        let index = CURVES
            .iter()
            .position(|curve| curve.oid == oid.as_str())
            .ok_or(Error::UnknownCurve)?;

        self.named_group(index)
    }

    /// Look up by either kind of identifier.
    pub fn lookup(&self, id: &CurveId) -> Result<CurveGroup> {
        match id {
            CurveId::Name(name) => self.by_name(name),
            CurveId::Oid(oid) => self.by_oid(oid),
        }
    }

    /// Build a group from explicit parameters, registering it when `oid` is
    /// given.
    ///
    /// The base point is not checked against the curve equation; see
    /// [`CurveGroup::verify_group`].
    #[allow(clippy::too_many_arguments)]
    pub fn explicit(
        &self,
        p: BigUint,
        a: BigUint,
        b: BigUint,
        g_x: BigUint,
        g_y: BigUint,
        order: BigUint,
        cofactor: BigUint,
        oid: Option<Oid>,
    ) -> Result<CurveGroup> {
        let params = DomainParameters {
            p,
            a,
            b,
            g_x,
            g_y,
            order,
            cofactor,
        };
        let group = CurveGroup::new(params, oid)?;

        if group.oid().is_some() {
            self.register(group.clone())?;
        }

        Ok(group)
    }

    /// Make `group` findable under its OID.
    pub fn register(&self, group: CurveGroup) -> Result<()> {
        let oid = group
            .oid()
            .cloned()
            .ok_or(Error::InvalidArgument("cannot register a group without an OID"))?;

        self.registered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(oid, group);

        Ok(())
    }

    /// Canonical names of the named curves.
    pub fn known_named_groups(&self) -> BTreeSet<String> {
        CURVES.iter().map(|curve| curve.name.to_owned()).collect()
    }

    /// Canonical name of the named curve with this OID.
    pub fn name_for_oid(&self, oid: &Oid) -> Option<&'static str> {
        CURVES
            .iter()
            .find(|curve| curve.oid == oid.as_str())
            .map(|curve| curve.name)
    }

    /// OID of the named curve with this name or alias.
    pub fn oid_for_name(&self, name: &str) -> Option<Oid> {
        CURVES
            .iter()
            .find(|curve| curve.answers_to(name))
            .and_then(|curve| curve.oid.parse().ok())
    }

    fn named_group(&self, index: usize) -> Result<CurveGroup> {
        if let Some(group) = self.named[index].get() {
            return Ok(group.clone());
        }

        let group = CurveGroup::from_named(&CURVES[index])?;
        Ok(self.named[index].get_or_init(|| group).clone())
    }
}

impl Default for CurveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CurveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered = self
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();

        f.debug_struct("CurveRegistry")
            .field("named", &CURVE_COUNT)
            .field("registered", &registered)
            .finish()
    }
}
