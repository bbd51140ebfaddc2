//! Curve lookup and runtime registration.

use ecgroup::{BigUint, CurveGroup, CurveId, CurveRegistry, DomainParameters, Error, Oid};
use std::{sync::Arc, thread};

fn hex_int(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
}

fn oid(s: &str) -> Oid {
    s.parse().unwrap()
}

#[test]
fn known_named_groups() {
    let names = CurveRegistry::new().known_named_groups();
    let expected = [
        "brainpool256r1",
        "brainpool384r1",
        "brainpool512r1",
        "secp160r1",
        "secp192r1",
        "secp224r1",
        "secp256k1",
        "secp256r1",
        "secp384r1",
        "secp521r1",
        "sm2p256v1",
    ];

    assert_eq!(names.iter().map(String::as_str).collect::<Vec<_>>(), expected);
}

#[test]
fn lookup_by_name_oid_and_alias() {
    let registry = CurveRegistry::new();

    for name in registry.known_named_groups() {
        let by_name = registry.by_name(&name).unwrap();
        let oid = by_name.oid().unwrap().clone();

        assert_eq!(by_name.name(), Some(name.as_str()));
        assert_eq!(registry.by_oid(&oid).unwrap(), by_name);
        assert_eq!(registry.name_for_oid(&oid), Some(name.as_str()));
        assert_eq!(registry.oid_for_name(&name), Some(oid.clone()));
        assert_eq!(registry.lookup(&CurveId::Oid(oid)).unwrap(), by_name);
        assert_eq!(registry.lookup(&name.parse().unwrap()).unwrap(), by_name);
    }

    for (alias, name) in [
        ("P-192", "secp192r1"),
        ("prime192v1", "secp192r1"),
        ("P-224", "secp224r1"),
        ("P-256", "secp256r1"),
        ("prime256v1", "secp256r1"),
        ("P-384", "secp384r1"),
        ("P-521", "secp521r1"),
        ("brainpoolP256r1", "brainpool256r1"),
        ("brainpoolP384r1", "brainpool384r1"),
        ("brainpoolP512r1", "brainpool512r1"),
        ("sm2", "sm2p256v1"),
    ] {
        let group = registry.by_name(alias).unwrap();
        assert_eq!(group.name(), Some(name));
        assert_eq!(group, registry.by_name(name).unwrap());
    }

    assert_eq!(
        registry.oid_for_name("P-384"),
        Some(oid("1.3.132.0.34"))
    );
    assert_eq!(
        registry.lookup(&"1.2.840.10045.3.1.7".parse().unwrap()).unwrap().name(),
        Some("secp256r1")
    );
}

#[test]
fn unknown_curves() {
    let registry = CurveRegistry::new();
    assert_eq!(registry.by_name("secp999r1"), Err(Error::UnknownCurve));
    assert_eq!(registry.by_name(""), Err(Error::UnknownCurve));
    assert_eq!(registry.by_oid(&oid("1.3.132.0.6")), Err(Error::UnknownCurve));
    assert_eq!(registry.name_for_oid(&oid("1.2.3")), None);
    assert_eq!(registry.oid_for_name("curve25519"), None);
}

#[test]
fn explicit_group_with_oid_is_registered() {
    let registry = CurveRegistry::new();
    let secp112r1 = oid("1.3.132.0.6");
    assert_eq!(registry.by_oid(&secp112r1), Err(Error::UnknownCurve));

    let group = registry
        .explicit(
            hex_int("db7c2abf62e35e668076bead208b"),
            hex_int("db7c2abf62e35e668076bead2088"),
            hex_int("659ef8ba043916eede8911702b22"),
            hex_int("09487239995a5ee76b55f9c2f098"),
            hex_int("a89ce5af8724c0a23e0e0ff77500"),
            hex_int("db7c2abf62e35e7628dfac6561c5"),
            BigUint::from(1u32),
            Some(secp112r1.clone()),
        )
        .unwrap();

    assert!(group.a_is_minus_3());
    assert_eq!(group.oid(), Some(&secp112r1));
    assert!(group.base_point().on_curve());

    let found = registry.by_oid(&secp112r1).unwrap();
    assert_eq!(found, group);
    assert_eq!(found.base_point(), group.base_point());
    assert!(found.base_point().multiply(found.order()).is_identity());

    // only the named table answers name lookups
    assert_eq!(registry.name_for_oid(&secp112r1), None);
}

#[test]
fn explicit_group_without_oid_is_not_registered() {
    let registry = CurveRegistry::new();
    let params = registry.by_name("secp192r1").unwrap().parameters();

    let group = registry
        .explicit(
            params.p,
            params.a,
            params.b,
            params.g_x,
            params.g_y,
            params.order,
            params.cofactor,
            None,
        )
        .unwrap();

    assert!(group.oid().is_none());
    assert!(matches!(
        registry.register(group),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn explicit_construction_does_not_check_the_base_point() {
    let registry = CurveRegistry::new();
    let group = registry
        .explicit(
            BigUint::from(1_000_003u32),
            BigUint::from(2u32),
            BigUint::from(21u32),
            BigUint::from(5u32),
            BigUint::from(5u32),
            BigUint::from(1_001_295u32),
            BigUint::from(1u32),
            None,
        )
        .unwrap();
    assert!(!group.base_point().on_curve());

    let rejected = registry.explicit(
        BigUint::from(1_000_003u32),
        BigUint::from(1_000_003u32),
        BigUint::from(21u32),
        BigUint::from(5u32),
        BigUint::from(5u32),
        BigUint::from(1_001_295u32),
        BigUint::from(1u32),
        None,
    );
    assert!(matches!(rejected, Err(Error::InvalidArgument(_))));
}

#[test]
fn registering_again_replaces() {
    let registry = CurveRegistry::new();
    let id = oid("1.3.6.1.4.1.25258.4.1");
    let first = registry.by_name("secp224r1").unwrap().parameters();
    let second = registry.by_name("brainpool256r1").unwrap().parameters();

    let first = CurveGroup::new(first, Some(id.clone())).unwrap();
    registry.register(first.clone()).unwrap();
    assert_eq!(registry.by_oid(&id).unwrap(), first);

    let second = CurveGroup::new(second, Some(id.clone())).unwrap();
    registry.register(second.clone()).unwrap();
    assert_eq!(registry.by_oid(&id).unwrap(), second);
}

#[test]
fn registered_groups_shadow_named_oids() {
    let registry = CurveRegistry::new();
    let p256 = oid("1.2.840.10045.3.1.7");
    let params: DomainParameters = registry.by_name("secp256k1").unwrap().parameters();

    registry.register(CurveGroup::new(params, Some(p256.clone())).unwrap()).unwrap();
    assert!(registry.by_oid(&p256).unwrap().a_is_zero());
    assert!(!registry.by_name("secp256r1").unwrap().a_is_zero());

    // other registries are unaffected
    assert!(!CurveRegistry::new().by_oid(&p256).unwrap().a_is_zero());
}

#[test]
fn concurrent_lookups_share_one_group() {
    let registry = Arc::new(CurveRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let name = if i % 2 == 0 { "secp384r1" } else { "P-384" };
                registry.by_name(name).unwrap()
            })
        })
        .collect();

    let groups: Vec<CurveGroup> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for group in &groups {
        assert_eq!(group, &groups[0]);
        assert_eq!(group.base_point(), groups[0].base_point());
    }
}

#[test]
fn global_registry() {
    let global = CurveRegistry::global();
    assert_eq!(
        global.by_name("secp521r1").unwrap(),
        CurveRegistry::global().by_name("P-521").unwrap()
    );
    assert_eq!(global.known_named_groups().len(), 11);
}
