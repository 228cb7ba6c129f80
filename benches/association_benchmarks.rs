//! Benchmarks for IoU and greedy association

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use person_height_estimation::{
    association::{associate, iou},
    bbox::BBox,
};
use rand::Rng;

fn random_boxes(n: usize) -> Vec<BBox> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            BBox::new(
                rng.gen_range(0..1200),
                rng.gen_range(0..640),
                rng.gen_range(40..160),
                rng.gen_range(40..200),
            )
        })
        .collect()
}

/// Candidates near each track, as after a few frames of motion
fn jittered(boxes: &[BBox]) -> Vec<BBox> {
    let mut rng = rand::thread_rng();
    boxes
        .iter()
        .map(|b| BBox::new(b.x + rng.gen_range(-8..=8), b.y + rng.gen_range(-8..=8), b.width, b.height))
        .collect()
}

fn benchmark_iou(c: &mut Criterion) {
    let a = BBox::new(100, 100, 80, 100);
    let b = BBox::new(110, 95, 85, 100);

    c.bench_function("iou_overlapping", |bench| {
        bench.iter(|| black_box(iou(black_box(&a), black_box(&b))));
    });
}

fn benchmark_associate(c: &mut Criterion) {
    let mut group = c.benchmark_group("associate");

    for n in [1usize, 5, 20, 50] {
        let tracks = random_boxes(n);
        let candidates = jittered(&tracks);

        group.bench_with_input(BenchmarkId::new("tracks", n), &(tracks, candidates), |b, (t, c)| {
            b.iter(|| black_box(associate(black_box(t), black_box(c), 0.2)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_iou, benchmark_associate);
criterion_main!(benches);
