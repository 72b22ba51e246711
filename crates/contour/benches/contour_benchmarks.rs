//! Benchmarks for isoline and isoband extraction.
//!
//! Run with: cargo bench --package contour --bench contour_benchmarks

use contour::{generate_breaks, isobands_from_lattice, isolines_from_lattice, ContourOptions, PointLattice};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_utils::{lattice_axis, ramp_lattice, smooth_lattice};

fn lattice(columns: usize, rows: usize, values: Vec<f64>) -> PointLattice {
    PointLattice::new(
        lattice_axis(0.0, 1.0, columns),
        lattice_axis(0.0, 1.0, rows),
        values,
    )
    .expect("benchmark lattice")
}

/// Smooth field with random noise (many more segments and saddles).
fn noisy_lattice(columns: usize, rows: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    smooth_lattice(columns, rows)
        .into_iter()
        .map(|v| v + rng.gen_range(-5.0..5.0))
        .collect()
}

// =============================================================================
// BREAK GENERATION BENCHMARKS
// =============================================================================

fn bench_generate_breaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_breaks");

    let ranges = [
        (0.0, 100.0, 10.0, "0-100_by_10"),
        (0.0, 100.0, 2.0, "0-100_by_2"),
        (-50.0, 50.0, 5.0, "neg50-50_by_5"),
        (900.0, 1100.0, 4.0, "pressure_4hPa"),
    ];

    for (min, max, interval, name) in ranges {
        group.bench_with_input(
            BenchmarkId::new("breaks", name),
            &(min, max, interval),
            |b, &(min, max, interval)| {
                b.iter(|| generate_breaks(black_box(min), black_box(max), black_box(interval)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// ISOLINE BENCHMARKS
// =============================================================================

fn bench_isolines(c: &mut Criterion) {
    let mut group = c.benchmark_group("isolines");
    let serial = ContourOptions::default().with_parallel(false);

    let sizes = [(64, 64), (128, 128), (256, 256)];

    for (columns, rows) in sizes {
        let smooth = lattice(columns, rows, smooth_lattice(columns, rows));
        let noisy = lattice(columns, rows, noisy_lattice(columns, rows));

        group.throughput(Throughput::Elements((columns * rows) as u64));

        group.bench_with_input(
            BenchmarkId::new("smooth_single_level", format!("{}x{}", columns, rows)),
            &smooth,
            |b, lattice| {
                b.iter(|| isolines_from_lattice(black_box(lattice), &[50.0], &serial));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("noisy_single_level", format!("{}x{}", columns, rows)),
            &noisy,
            |b, lattice| {
                b.iter(|| isolines_from_lattice(black_box(lattice), &[50.0], &serial));
            },
        );
    }

    group.finish();
}

// =============================================================================
// ISOBAND BENCHMARKS
// =============================================================================

fn bench_isobands(c: &mut Criterion) {
    let mut group = c.benchmark_group("isobands");
    group.sample_size(20); // Slower benchmark

    let sizes = [(128, 128), (256, 256)];
    let few = vec![20.0, 40.0, 60.0, 80.0];
    let many = generate_breaks(0.0, 100.0, 5.0);

    for (columns, rows) in sizes {
        let data = lattice(columns, rows, smooth_lattice(columns, rows));
        group.throughput(Throughput::Elements((columns * rows) as u64));

        for (label, breaks) in [("4_breaks", &few), ("21_breaks", &many)] {
            for parallel in [false, true] {
                let options = ContourOptions::default().with_parallel(parallel);
                let mode = if parallel { "parallel" } else { "serial" };
                group.bench_with_input(
                    BenchmarkId::new(format!("{}_{}", label, mode), format!("{}x{}", columns, rows)),
                    &data,
                    |b, lattice| {
                        b.iter(|| isobands_from_lattice(black_box(lattice), breaks, &options));
                    },
                );
            }
        }
    }

    group.finish();
}

fn bench_isobands_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("isobands_ramp");

    // Straight band edges along lattice rows exercise collinear removal.
    let data = lattice(256, 256, ramp_lattice(256, 256, 1.0));
    let breaks = generate_breaks(0.0, 256.0, 16.0);
    let options = ContourOptions::default();

    group.bench_function("256x256_16_bands", |b| {
        b.iter(|| isobands_from_lattice(black_box(&data), &breaks, &options));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_breaks,
    bench_isolines,
    bench_isobands,
    bench_isobands_ramp,
);

criterion_main!(benches);
