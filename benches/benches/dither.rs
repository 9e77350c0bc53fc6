//! Benchmark suite for palette matching and dithering
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench dither
//!
//! The first benchmark builds the process-wide palette cache; later ones use it.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use emage_benches::gradient_tile;
use emage_types::dither::{Quality, dither_frame, dither_frame_stable};
use emage_types::frame::FRAME_SIZE;
use emage_types::palette::{QuantizationCache, find_closest_color, init_cache, match_color};
use emage_types::pool::FramePool;
use std::hint::black_box;

/// Benchmark exact CIEDE2000 search against cached lookups
fn bench_palette_match(c: &mut Criterion) {
	let mut group = c.benchmark_group("palette_match");
	let samples: Vec<(u8, u8, u8)> = (0..1024u32).map(|i| ((i * 7) as u8, (i * 13) as u8, (i * 29) as u8)).collect();
	group.throughput(Throughput::Elements(samples.len() as u64));

	group.bench_function("exact", |b| {
		b.iter(|| {
			for &(r, g, bl) in &samples {
				black_box(find_closest_color(r, g, bl));
			}
		});
	});

	group.sample_size(10);
	group.bench_function("build_cache_5bit", |b| {
		b.iter(|| black_box(QuantizationCache::build(5)));
	});

	init_cache();
	group.bench_function("cached", |b| {
		b.iter(|| {
			for &(r, g, bl) in &samples {
				black_box(match_color(i32::from(r), i32::from(g), i32::from(bl)));
			}
		});
	});

	group.finish();
}

/// Benchmark each dither strategy on one tile
fn bench_dither(c: &mut Criterion) {
	init_cache();
	let mut group = c.benchmark_group("dither");
	group.throughput(Throughput::Elements(FRAME_SIZE as u64));
	let tile = gradient_tile(3);

	for quality in Quality::ALL {
		group.bench_with_input(BenchmarkId::new("frame", quality), &tile, |b, tile| {
			b.iter(|| {
				let frame = dither_frame(black_box(tile), quality);
				FramePool::global().release(black_box(frame));
			});
		});
	}

	group.finish();
}

/// Benchmark stable dithering with a small changed region
fn bench_dither_stable(c: &mut Criterion) {
	init_cache();
	let mut group = c.benchmark_group("dither_stable");
	let previous = gradient_tile(3);
	let mut current = previous.clone();
	for pixel in current.iter_mut().skip(4000).take(500) {
		*pixel ^= 0x0030_3030;
	}
	let previous_result = dither_frame(&previous, Quality::Balanced);

	group.bench_function("small_change", |b| {
		b.iter(|| black_box(dither_frame_stable(black_box(&current), &previous, &previous_result, Quality::Balanced)));
	});

	group.finish();
}

criterion_group!(benches, bench_palette_match, bench_dither, bench_dither_stable);

criterion_main!(benches);
