use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use chebpe_core::*;
use rand::{SeedableRng, rngs::SmallRng};

fn estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    for eps in [1e-2, 1e-3, 1e-4] {
        let config = ChebPeConfig {
            eps,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(eps), &config, |b, config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut oracle = SimulatedOracle::new(0.3, SmallRng::seed_from_u64(seed));
                estimate(config, &mut oracle)
            })
        });
    }
    group.finish();
}

fn confidence(c: &mut Criterion) {
    c.bench_function("clopper_pearson", |b| {
        b.iter(|| clopper_pearson(37, 100, 0.01))
    });
    c.bench_function("worst_case_half_width", |b| {
        b.iter(|| worst_case_half_width(0.01, 100))
    });
}

fn root_finding(c: &mut Criterion) {
    c.bench_function("find_root", |b| {
        b.iter(|| find_root(f64::sin, 0.0, 3.0, 4.0, 1e-12))
    });
}

criterion_group!(benches, estimation, confidence, root_finding);
criterion_main!(benches);
