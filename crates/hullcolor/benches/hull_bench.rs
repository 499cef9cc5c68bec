//! Criterion benchmarks for hull construction and the polygon overlap test.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hullcolor::{compute_hull, intersects, Point};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(m: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..m)
        .map(|_| Point::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)))
        .collect()
}

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull");
    for &m in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("compute_hull", m), &m, |b, &m| {
            b.iter_batched(
                || random_points(m, 43),
                |pts| {
                    let _hull = compute_hull(&pts).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("intersects", m), &m, |b, &m| {
            let a = compute_hull(&random_points(m, 44)).unwrap();
            let shifted: Vec<Point> = random_points(m, 45)
                .into_iter()
                .map(|p| p + Point::new(60.0, 0.0))
                .collect();
            let other = compute_hull(&shifted).unwrap();
            b.iter(|| intersects(&a, &other).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hull);
criterion_main!(benches);
