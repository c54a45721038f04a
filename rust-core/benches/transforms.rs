//! Criterion benchmarks for the transforms and filter application

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use spectral_edit::curve::Curve;
use spectral_edit::filters::Filter;
use spectral_edit::spectrum::{radix2_transform, Decimation, Direction, FftEngine};
use std::f64::consts::PI;

fn sine_sweep(len: usize) -> Vec<Complex64> {
    (0..len)
        .map(|i| {
            let t = i as f64 / len as f64;
            Complex64::new((2.0 * PI * 1000.0 * t * t).sin(), 0.0)
        })
        .collect()
}

fn bench_mixed_radix(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_radix_forward");

    // Powers of two, smooth composites, and one with a large prime factor
    for &n in &[1024usize, 4096, 4410, 44100, 2 * 3 * 5 * 7 * 11 * 13, 4099] {
        let src = sine_sweep(n);
        let mut buf = src.clone();
        let Ok(mut engine) = FftEngine::new(n) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                buf.copy_from_slice(&src);
                let _ = engine.forward(black_box(&mut buf));
            });
        });
    }
    group.finish();
}

fn bench_radix2(c: &mut Criterion) {
    let mut group = c.benchmark_group("radix2_forward");

    for &rank in &[10, 12, 14] {
        let n = 1usize << rank;
        let src = sine_sweep(n);
        let mut buf = src.clone();

        for decimation in [Decimation::Time, Decimation::Frequency] {
            let id = BenchmarkId::new(format!("{:?}", decimation), n);
            group.bench_with_input(id, &n, |b, _| {
                b.iter(|| {
                    buf.copy_from_slice(&src);
                    let _ = radix2_transform(black_box(&mut buf), Direction::Forward, decimation);
                });
            });
        }
    }
    group.finish();
}

fn bench_filter_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_apply");

    let n = 44100;
    let src: Vec<f64> = sine_sweep(n).into_iter().map(|z| z.re).collect();
    let mut buf = src.clone();

    let taps: Vec<(usize, f64)> = (0..32).map(|i| (i * 3, 1.0 / (i + 1) as f64)).collect();
    let fir = Filter::from_taps(true, &taps);
    let iir = Filter::from_taps(false, &taps);
    let curve: Curve = "SPLINE 0 0 0.25 1 0.75 0.2 1 1".parse().unwrap_or_default();

    group.bench_function("fir_32_taps", |b| {
        b.iter(|| {
            buf.copy_from_slice(&src);
            let _ = fir.apply(black_box(&mut buf));
        });
    });
    group.bench_function("iir_32_taps", |b| {
        b.iter(|| {
            buf.copy_from_slice(&src);
            let _ = iir.apply(black_box(&mut buf));
        });
    });
    group.bench_function("moving_fir_32_taps", |b| {
        b.iter(|| {
            buf.copy_from_slice(&src);
            let _ = fir.apply_moving(0, &curve, 0, 1000, black_box(&mut buf));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_mixed_radix, bench_radix2, bench_filter_apply);
criterion_main!(benches);
