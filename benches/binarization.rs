use criterion::{Criterion, black_box, criterion_group, criterion_main};
use imgclean::models::GrayImage;
use imgclean::utils::binarization::{
    adaptive_binarize, adaptive_binarize_parallel, integral_binarize, integral_binarize_parallel,
};

fn page(width: usize, height: usize) -> GrayImage {
    // Light background with a dark stroke every 16 columns
    let pixels = (0..width * height)
        .map(|i| if i % width % 16 < 2 { 30 } else { 200 + (i % 7) as u8 })
        .collect();
    GrayImage::new(width, height, pixels).unwrap()
}

fn bench_adaptive_binarize_medium(c: &mut Criterion) {
    let gray = page(640, 480);
    c.bench_function("adaptive_binarize_640x480", |b| {
        b.iter(|| adaptive_binarize(black_box(&gray), black_box(7)))
    });
}

fn bench_adaptive_binarize_parallel_medium(c: &mut Criterion) {
    let gray = page(640, 480);
    c.bench_function("adaptive_binarize_parallel_640x480", |b| {
        b.iter(|| adaptive_binarize_parallel(black_box(&gray), black_box(7)))
    });
}

fn bench_integral_binarize_medium(c: &mut Criterion) {
    let gray = page(640, 480);
    c.bench_function("integral_binarize_640x480", |b| {
        b.iter(|| integral_binarize(black_box(&gray), black_box(7), black_box(0.85)))
    });
}

fn bench_integral_binarize_large(c: &mut Criterion) {
    let gray = page(1920, 1080);
    c.bench_function("integral_binarize_1920x1080", |b| {
        b.iter(|| integral_binarize(black_box(&gray), black_box(7), black_box(0.85)))
    });
}

fn bench_integral_binarize_parallel_large(c: &mut Criterion) {
    let gray = page(1920, 1080);
    c.bench_function("integral_binarize_parallel_1920x1080", |b| {
        b.iter(|| integral_binarize_parallel(black_box(&gray), black_box(7), black_box(0.85)))
    });
}

criterion_group!(
    benches,
    bench_adaptive_binarize_medium,
    bench_adaptive_binarize_parallel_medium,
    bench_integral_binarize_medium,
    bench_integral_binarize_large,
    bench_integral_binarize_parallel_large
);
criterion_main!(benches);
