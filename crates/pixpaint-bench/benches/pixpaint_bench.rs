//! Benchmarks for the pixpaint engines.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use pixpaint_bench::noisy_gradient;
use pixpaint_core::{PixelBuffer, Point, Rgba8};
use pixpaint_ops::{bilateral, flood, parallel, FillPattern, FilterParams, Rasterizer, Shape};

/// Serial vs row-parallel bilateral filter.
fn bench_bilateral(c: &mut Criterion) {
    let mut group = c.benchmark_group("bilateral");
    group.sample_size(20);
    let params = FilterParams::default();

    for size in [128u32, 256, 512] {
        let src = noisy_gradient(size, size);
        group.throughput(Throughput::Elements(size as u64 * size as u64));

        group.bench_with_input(BenchmarkId::new("serial", size), &src, |b, s| {
            b.iter(|| bilateral::apply(black_box(s), &params))
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &src, |b, s| {
            b.iter(|| parallel::bilateral(black_box(s), &params))
        });
    }

    group.finish();
}

/// Flood fill over an open canvas and one crossed by pattern lines.
fn bench_flood(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood");

    for size in [256u32, 1024] {
        let blank = PixelBuffer::blank(size, size);
        let mut striped = blank.clone();
        let last = size as i32 - 1;
        Rasterizer::default().draw(
            &mut striped,
            &Shape::rectangle(Point::new(0, 0), Point::new(last, last), Rgba8::BLACK)
                .with_pattern(FillPattern::VerticalLines),
        );
        group.throughput(Throughput::Elements(size as u64 * size as u64));

        group.bench_with_input(BenchmarkId::new("blank", size), &blank, |b, canvas| {
            b.iter(|| {
                let mut buf = canvas.clone();
                flood::fill_canvas(&mut buf, Point::new(1, 1), Rgba8::RED, Point::new(0, 0))
            })
        });

        group.bench_with_input(BenchmarkId::new("striped", size), &striped, |b, canvas| {
            b.iter(|| {
                let mut buf = canvas.clone();
                flood::fill_canvas(&mut buf, Point::new(3, 3), Rgba8::RED, Point::new(3, 3))
            })
        });
    }

    group.finish();
}

/// Patterned shape rasterization.
fn bench_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    let raster = Rasterizer::default();
    let canvas = PixelBuffer::blank(1024, 1024);

    for pattern in [FillPattern::None, FillPattern::HorizontalLines, FillPattern::VerticalLines] {
        let circle = Shape::circle(Point::new(512, 512), 400, Rgba8::BLACK)
            .with_pattern(pattern)
            .with_line_width(4);
        group.bench_with_input(BenchmarkId::new("circle", pattern), &circle, |b, shape| {
            b.iter(|| {
                let mut buf = canvas.clone();
                raster.draw(&mut buf, black_box(shape));
                buf
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bilateral, bench_flood, bench_raster);
criterion_main!(benches);
