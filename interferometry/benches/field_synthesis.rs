use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use interferometry::field::{render_rgb, synthesize_field, FieldConstants, FieldGrid};
use interferometry::recovery::{calculate_radius_by_physics, recover_radius};
use interferometry::{wavelength_to_rgb, MeasurementSample, OpticalParameters, RingKind};

/// Square image sizes in pixels
const GRID_SIZES: &[usize] = &[256, 512, 1024];

fn bench_synthesize_field(c: &mut Criterion) {
    let params = OpticalParameters::default();
    let constants = FieldConstants::canvas();

    let mut group = c.benchmark_group("synthesize_field");
    for &size in GRID_SIZES {
        let grid = FieldGrid::square(size, 11.0);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("canvas", size), &grid, |b, grid| {
            b.iter(|| synthesize_field(black_box(&params), black_box(grid), &constants))
        });
    }
    group.finish();
}

fn bench_render_rgb(c: &mut Criterion) {
    let params = OpticalParameters::default();
    let constants = FieldConstants::canvas();
    let grid = FieldGrid::square(1024, 11.0);
    let field = synthesize_field(&params, &grid, &constants).unwrap();
    let color = wavelength_to_rgb(params.wavelength_nm());

    c.bench_function("render_rgb_1024x1024", |b| {
        b.iter(|| render_rgb(black_box(&field), color, &constants))
    });
}

fn bench_recovery(c: &mut Criterion) {
    let params = OpticalParameters::default();
    let slope = params.diameter_squared_slope();
    let samples: Vec<MeasurementSample> = (1..=50)
        .map(|m| MeasurementSample::new(m, RingKind::Dark, slope * m as f64 + 0.01))
        .collect();

    let mut group = c.benchmark_group("radius_recovery");
    group.bench_function("least_squares_50_rings", |b| {
        b.iter(|| recover_radius(black_box(&samples), params.wavelength()))
    });
    group.bench_function("per_ring_50_rings", |b| {
        b.iter(|| calculate_radius_by_physics(params.wavelength(), black_box(&samples)))
    });
    group.finish();
}

criterion_group!(benches, bench_synthesize_field, bench_render_rgb, bench_recovery);
criterion_main!(benches);
