//! Benchmark suite for block encoding and decoding
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench codec

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use emage_benches::{animated_cells, indexed_tile, shapes, static_cells};
use emage_types::codec::{
	decode_animated_grid, decode_single, decode_static_grid, encode_animated_grid, encode_single, encode_static_grid,
	peek_cell_ids,
};
use emage_types::frame::FRAME_SIZE;
use std::hint::black_box;

/// Benchmark single frames at every bit depth
fn bench_single(c: &mut Criterion) {
	let mut group = c.benchmark_group("single");
	group.throughput(Throughput::Bytes(FRAME_SIZE as u64));

	for colors in [2u8, 4, 16, 200] {
		let frame = indexed_tile(colors, 1);
		let blob = encode_single(&frame).unwrap();

		group.bench_with_input(BenchmarkId::new("encode", colors), &frame, |b, frame| {
			b.iter(|| black_box(encode_single(black_box(frame))));
		});
		group.bench_with_input(BenchmarkId::new("decode", colors), &blob, |b, blob| {
			b.iter(|| black_box(decode_single(black_box(blob))));
		});
	}

	group.finish();
}

/// Benchmark static grids of growing size
fn bench_static_grid(c: &mut Criterion) {
	let mut group = c.benchmark_group("static_grid");

	for cells in [shapes::SINGLE, shapes::SMALL, shapes::WALL] {
		let grid = static_cells(cells, 16);
		let blob = encode_static_grid(&grid, 0).unwrap();
		group.throughput(Throughput::Bytes((cells * FRAME_SIZE) as u64));

		group.bench_with_input(BenchmarkId::new("encode", cells), &grid, |b, grid| {
			b.iter(|| black_box(encode_static_grid(black_box(grid), 0)));
		});
		group.bench_with_input(BenchmarkId::new("decode", cells), &blob, |b, blob| {
			b.iter(|| black_box(decode_static_grid(black_box(blob))));
		});
	}

	group.finish();
}

/// Benchmark animated grids, where temporal deltas dominate
fn bench_animated_grid(c: &mut Criterion) {
	let mut group = c.benchmark_group("animated_grid");
	group.sample_size(20);

	for frames in [4usize, 16] {
		let grid = animated_cells(shapes::SMALL, frames, 16);
		let delays = vec![100; frames];
		let blob = encode_animated_grid(&grid, &delays, 0).unwrap();
		group.throughput(Throughput::Bytes((shapes::SMALL * frames * FRAME_SIZE) as u64));

		group.bench_with_input(BenchmarkId::new("encode", frames), &grid, |b, grid| {
			b.iter(|| black_box(encode_animated_grid(black_box(grid), &delays, 0)));
		});
		group.bench_with_input(BenchmarkId::new("decode", frames), &blob, |b, blob| {
			b.iter(|| black_box(decode_animated_grid(black_box(blob))));
		});
	}

	group.finish();
}

/// Benchmark reading cell ids without inflating
fn bench_peek(c: &mut Criterion) {
	let blob = encode_static_grid(&static_cells(shapes::WALL, 16), 0).unwrap();
	c.bench_function("peek_cell_ids", |b| {
		b.iter(|| black_box(peek_cell_ids(black_box(&blob))));
	});
}

criterion_group!(benches, bench_single, bench_static_grid, bench_animated_grid, bench_peek);

criterion_main!(benches);
