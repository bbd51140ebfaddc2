//! Point multiplication benchmarks

use criterion::{
    BenchmarkGroup, Criterion, criterion_group, criterion_main, measurement::Measurement,
};
use ecgroup::{
    BigUint, BlindedMultiplier, BlindingWorkspace, CurveGroup, CurveRegistry, PointEncoding,
};
use hex_literal::hex;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

fn test_scalar() -> BigUint {
    BigUint::from_bytes_be(&hex!(
        "519b423d715f8b581f4fa8ee59f4771a5b44c8130b4e3eacca54a56dda72b464"
    ))
}

fn bench_point_mul<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, curve: &CurveGroup) {
    let g = curve.base_point();
    let k = test_scalar();
    group.bench_function("variable-base mul", |b| b.iter(|| g.multiply(&k)));
}

fn bench_blinded_mul<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, curve: &CurveGroup) {
    let g = curve.base_point();
    let k = test_scalar();
    let mut rng = ChaCha8Rng::from_os_rng();
    let mut ws = BlindingWorkspace::new();

    for w in [2, 4, 6] {
        let multiplier = BlindedMultiplier::new(&g, w).unwrap();
        group.bench_function(format!("blinded mul (w = {w})"), |b| {
            b.iter(|| multiplier.multiply(&k, curve.order(), &mut rng, &mut ws))
        });
    }
}

fn bench_add_double<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, curve: &CurveGroup) {
    let g = curve.base_point();
    let h = g.double();
    group.bench_function("add", |b| b.iter(|| &g + &h));
    group.bench_function("double", |b| b.iter(|| h.double()));
}

fn bench_decode<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, curve: &CurveGroup) {
    let bytes = curve.base_point().encode(PointEncoding::Compressed);
    group.bench_function("decompress", |b| b.iter(|| curve.decode_point(&bytes)));
}

fn bench_point(c: &mut Criterion) {
    let curve = CurveRegistry::global().by_name("secp256r1").unwrap();
    let mut group = c.benchmark_group("secp256r1 point operations");
    bench_point_mul(&mut group, &curve);
    bench_blinded_mul(&mut group, &curve);
    bench_add_double(&mut group, &curve);
    bench_decode(&mut group, &curve);
    group.finish();
}

criterion_group!(benches, bench_point);
criterion_main!(benches);
