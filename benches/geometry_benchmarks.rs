//! Benchmarks for height estimation and smoothing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use person_height_estimation::{geometry::CameraModel, smoothing::HeightHistory};
use rand::Rng;

fn benchmark_estimate_height(c: &mut Criterion) {
    let camera = CameraModel::new(1200.0, 1200.0, 640.0, 360.0, 1.5).expect("valid camera");

    c.bench_function("estimate_height_reference", |b| {
        b.iter(|| {
            black_box(camera.estimate_height(black_box(300.0), black_box(700.0), Some(640.0)))
        });
    });

    let mut rng = rand::thread_rng();
    let points: Vec<(f64, f64, f64)> = (0..100)
        .map(|_| {
            let head = rng.gen_range(0.0..500.0);
            (head, head + rng.gen_range(50.0..400.0), rng.gen_range(0.0..1280.0))
        })
        .collect();

    c.bench_function("estimate_height_sequence_100", |b| {
        b.iter(|| {
            for &(head, foot, u) in &points {
                black_box(camera.estimate_height(head, foot, Some(u)).ok());
            }
        });
    });
}

fn benchmark_history(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let samples: Vec<f64> = (0..100).map(|_| 1.7 + 0.05 * rng.gen::<f64>()).collect();

    c.bench_function("height_history_push_100", |b| {
        b.iter(|| {
            let mut history = HeightHistory::new(10);
            for &h in &samples {
                black_box(history.push(h));
            }
            black_box(history.stats())
        });
    });
}

criterion_group!(benches, benchmark_estimate_height, benchmark_history);
criterion_main!(benches);
