use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use freak_core::consts::NB_ALL_PAIRS;
use freak_core::FreakConfig;
use freak_select::{BitColumns, PairSelector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random packed all-pairs descriptors
fn random_descriptors(n: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(99);
    (0..n)
        .map(|_| (0..(NB_ALL_PAIRS + 7) / 8).map(|_| rng.gen()).collect())
        .collect()
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_columns");
    for &n in &[1_000usize, 10_000] {
        let descriptors = random_descriptors(n);
        group.bench_with_input(BenchmarkId::new("from_descriptors", n), &descriptors, |b, d| {
            b.iter(|| black_box(BitColumns::from_descriptors(black_box(d), NB_ALL_PAIRS)))
        });
    }
    group.finish();
}

fn bench_correlation(c: &mut Criterion) {
    let columns = BitColumns::from_descriptors(&random_descriptors(10_000), NB_ALL_PAIRS);
    c.bench_function("correlation_10k_rows", |b| {
        b.iter(|| black_box(columns.correlation(black_box(17), black_box(640))))
    });
}

fn bench_selection(c: &mut Criterion) {
    let columns = BitColumns::from_descriptors(&random_descriptors(2_000), NB_ALL_PAIRS);
    let selector = PairSelector::new(&FreakConfig::default()).unwrap();
    let mut group = c.benchmark_group("selection");
    group.sample_size(10);
    group.bench_function("select_from_columns_2k", |b| {
        b.iter(|| black_box(selector.select_from_columns(black_box(&columns)).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_transpose, bench_correlation, bench_selection);
criterion_main!(benches);
