mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use poisson_sampling::prelude::*;

const MIN_DISTANCES: [f64; 4] = [32.0, 16.0, 8.0, 4.0];

fn fill_count(options: &SamplingOptions, seed: u64) -> usize {
    PoissonDiskSampling::seeded(options, seed)
        .map(|mut pds| pds.fill().len())
        .unwrap_or(0)
}

fn fixed_density_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/fixed_density/2d");

    for &min_distance in &MIN_DISTANCES {
        let options = SamplingOptions::new([512.0, 512.0], min_distance);
        let seed = common::seed_for(0xC0FFEE, min_distance);
        group.throughput(common::points_throughput(fill_count(&options, seed)));

        group.bench_with_input(
            BenchmarkId::from_parameter(min_distance),
            &options,
            |b, options| {
                b.iter(|| {
                    let count = fill_count(options, seed);
                    black_box(count);
                });
            },
        );
    }

    group.finish();
}

fn variable_density_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/variable_density/2d");

    for &min_distance in &MIN_DISTANCES {
        let options = SamplingOptions::new([512.0, 512.0], min_distance)
            .with_max_distance(min_distance * 4.0)
            .with_distance_function(|p| p[0] / 512.0);
        let seed = common::seed_for(0xBEEF, min_distance);
        group.throughput(common::points_throughput(fill_count(&options, seed)));

        group.bench_with_input(
            BenchmarkId::from_parameter(min_distance),
            &options,
            |b, options| {
                b.iter(|| {
                    let count = fill_count(options, seed);
                    black_box(count);
                });
            },
        );
    }

    group.finish();
}

fn dimension_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/fixed_density/dimensions");

    for dimension in 1..=4usize {
        let options = SamplingOptions::new(vec![48.0; dimension], 4.0).with_tries(20);
        let seed = common::seed_for(0xA11CE, dimension as f64);
        group.throughput(common::points_throughput(fill_count(&options, seed)));

        group.bench_with_input(
            BenchmarkId::from_parameter(dimension),
            &options,
            |b, options| {
                b.iter(|| {
                    let count = fill_count(options, seed);
                    black_box(count);
                });
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = fixed_density_benches, variable_density_benches, dimension_benches
}
criterion_main!(benches);
