//! Unit tests for the frame codec

use super::header::Parsed;
use super::record::RawRecord;
use super::*;

use std::collections::BTreeMap;
use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use proptest::prelude::*;

use crate::frame::{DEFAULT_FRAME_DELAY_MS, FRAME_SIZE, FRAME_WIDTH};

/// A frame with a diagonal stripe pattern over `colors`.
fn striped(colors: &[u8]) -> IndexedFrame {
	let mut frame = IndexedFrame::blank();
	for y in 0..FRAME_WIDTH {
		for x in 0..FRAME_WIDTH {
			frame.set(x, y, colors[(x + y) / 8 % colors.len()]);
		}
	}
	frame
}

/// A frame filled from a small LCG over `colors`.
fn noisy(colors: &[u8], seed: u64) -> IndexedFrame {
	let mut state = seed | 1;
	let pixels = (0..FRAME_SIZE)
		.map(|_| {
			state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
			colors[(state >> 33) as usize % colors.len()]
		})
		.collect();
	IndexedFrame::from_vec(pixels).unwrap()
}

fn zlib(data: &[u8]) -> Vec<u8> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
	encoder.write_all(data).unwrap();
	encoder.finish().unwrap()
}

/// Inflates a grid payload and lists `(reference, mode)` of every record.
fn record_kinds(blob: &[u8]) -> Vec<(Reference, Mode)> {
	let parsed = Parsed::from_bytes(blob).unwrap();
	let raw = deflate::decompress(parsed.payload, parsed.header.raw_len).unwrap();
	let mut reader = ByteReader::new(&raw);

	let mut kinds = Vec::new();
	while reader.remaining() > 0 {
		let record = RawRecord::read(&mut reader, kinds.len()).unwrap();
		kinds.push((record.reference, record.mode));
	}
	kinds
}

#[test]
fn test_single_roundtrip() {
	let frame = striped(&[4, 18, 50, 119, 200]);
	let blob = encode_single(&frame).unwrap();

	let header = Header::from_bytes(&blob).unwrap();
	assert_eq!(header.format, Format::Single);
	assert_eq!(header.colors, 5);
	assert_eq!(header.bits_per_pixel, 4);
	assert_eq!(header.raw_len, FRAME_SIZE / 2);

	assert_eq!(decode_single(&blob), frame);
}

#[test]
fn test_single_full_palette_uses_eight_bits() {
	let pixels: Vec<u8> = (0..FRAME_SIZE).map(|i| (i % 256) as u8).collect();
	let frame = IndexedFrame::from_vec(pixels).unwrap();
	let blob = encode_single(&frame).unwrap();

	assert_eq!(blob[3], 0);
	let header = Header::from_bytes(&blob).unwrap();
	assert_eq!(header.colors, 256);
	assert_eq!(header.bits_per_pixel, 8);
	assert_eq!(decode_single(&blob), frame);
}

#[test]
fn test_legacy_block() {
	let frame = noisy(&[4, 9, 33], 7);
	let compressed = zlib(frame.as_bytes());

	let mut blob = b"EM0".to_vec();
	blob.extend_from_slice(&(FRAME_SIZE as i32).to_be_bytes());
	blob.extend_from_slice(&(compressed.len() as i32).to_be_bytes());
	blob.extend_from_slice(&compressed);

	assert_eq!(Format::detect(&blob).unwrap(), Format::Legacy);
	assert_eq!(try_decode_single(&blob).unwrap(), frame);
	assert_eq!(GridDocument::decode(&blob).unwrap(), GridDocument::Single(frame));
}

#[test_log::test]
fn test_bare_zlib_fallback() {
	let frame = noisy(&[10, 11], 3);
	let blob = zlib(frame.as_bytes());

	assert!(try_decode_single(&blob).is_err());
	assert_eq!(decode_single(&blob), frame);
}

#[test_log::test]
fn test_unreadable_single_is_blank() {
	assert_eq!(decode_single(b"XYZ garbage"), IndexedFrame::blank());
	assert_eq!(decode_single(&[]), IndexedFrame::blank());

	let mut blob = encode_single(&IndexedFrame::filled(40)).unwrap();
	blob.truncate(blob.len() - 2);
	assert_eq!(decode_single(&blob), IndexedFrame::blank());
}

#[test]
fn test_static_grid_sparse_neighbour() {
	let a = striped(&[34, 119]);
	let mut b = a.clone();
	for i in 0..10 {
		let x = i * 7;
		let value = if b.get(x, 3) == 34 { 119 } else { 34 };
		b.set(x, 3, value);
	}

	let cells = BTreeMap::from([(1, a), (2, b)]);
	let blob = encode_static_grid(&cells, 99).unwrap();

	assert_eq!(record_kinds(&blob), vec![(Reference::None, Mode::Literal), (Reference::None, Mode::Sparse)]);
	let header = Header::from_bytes(&blob).unwrap();
	// Literal: marker, length, 2048 packed bytes. Sparse: marker, length, count, 10 entries.
	assert_eq!(header.raw_len, (3 + 2048) + (3 + 2 + 10 * 3));

	let grid = decode_static_grid(&blob).unwrap();
	assert_eq!(grid.grid_id, 99);
	assert_eq!(grid.cells, cells);
}

#[test]
fn test_static_grid_identical_cells() {
	let cells: BTreeMap<i32, IndexedFrame> = (0..4).map(|id| (id, IndexedFrame::filled(50))).collect();
	let blob = encode_static_grid(&cells, 0).unwrap();

	let header = Header::from_bytes(&blob).unwrap();
	assert_eq!(header.colors, 1);
	assert_eq!(header.bits_per_pixel, 1);
	assert_eq!(header.raw_len, 3 + 2048 + 3);

	let kinds = record_kinds(&blob);
	assert_eq!(kinds[0].1, Mode::Literal);
	assert!(kinds[1..].iter().all(|&(_, mode)| mode == Mode::Identical));

	assert_eq!(decode_static_grid(&blob).unwrap().cells, cells);
}

#[test]
fn test_static_grid_keeps_id_order() {
	let cells = BTreeMap::from([(-5, IndexedFrame::filled(6)), (300, IndexedFrame::filled(7)), (12, striped(&[8, 9]))]);
	let blob = encode_static_grid(&cells, -1).unwrap();

	assert_eq!(Header::from_bytes(&blob).unwrap().cell_ids, vec![-5, 12, 300]);
	assert_eq!(peek_cell_ids(&blob).unwrap().into_iter().collect::<Vec<_>>(), vec![-5, 12, 300]);
	assert_eq!(StaticGrid::new(-1, cells.clone()).encode().unwrap(), blob);
}

#[test]
fn test_animated_grid_references() {
	let x = striped(&[20, 21, 22]);
	let mut y = x.clone();
	for i in 0..5 {
		y.set(i, i, 23);
	}

	let cells = BTreeMap::from([(1, vec![x.clone(), x.clone()]), (2, vec![x.clone(), y])]);
	let blob = encode_animated_grid(&cells, &[100, 100], 42).unwrap();

	assert_eq!(
		record_kinds(&blob),
		vec![
			(Reference::None, Mode::Literal),
			(Reference::Spatial, Mode::Identical),
			(Reference::Temporal, Mode::Identical),
			(Reference::Temporal, Mode::Sparse),
		]
	);

	let grid = decode_animated_grid(&blob).unwrap();
	assert_eq!(grid.sync_id, 42);
	assert_eq!(grid.cells, cells);
	assert_eq!(grid.frame_count(), 2);
}

#[test]
fn test_animated_grid_delays() {
	let cells = BTreeMap::from([(0, vec![IndexedFrame::filled(4), IndexedFrame::filled(5), IndexedFrame::filled(6)])]);
	let blob = encode_animated_grid(&cells, &[10, 100, 70_000], 1).unwrap();

	let header = Header::from_bytes(&blob).unwrap();
	assert_eq!(header.frame_count, 3);
	assert_eq!(header.average_delay, 10962);
	assert_eq!(header.delays, vec![20, 100, 32767]);

	let grid = decode_animated_grid(&blob).unwrap();
	assert_eq!(grid.delays, vec![20, 100, 32767]);
	assert_eq!(grid.average_delay(), 10962);

	let cells = grid.into_cells();
	let cell = &cells[&0];
	assert_eq!(cell.frame_count(), 3);
	assert_eq!(cell.frame_at(50).unwrap(), &IndexedFrame::filled(5));
}

#[test]
fn test_animated_grid_validation() {
	let frame = IndexedFrame::filled(9);

	assert!(matches!(encode_animated_grid(&BTreeMap::new(), &[], 0), Err(CodecError::EmptyGrid)));
	assert!(matches!(encode_animated_grid(&BTreeMap::from([(0, vec![])]), &[], 0), Err(CodecError::EmptyGrid)));

	let uneven = BTreeMap::from([(0, vec![frame.clone(), frame.clone()]), (3, vec![frame.clone()])]);
	assert!(matches!(
		encode_animated_grid(&uneven, &[100, 100], 0),
		Err(CodecError::FrameCountMismatch {
			cell_id: 3,
			expected: 2,
			actual: 1
		})
	));

	let cells = BTreeMap::from([(0, vec![frame.clone(), frame])]);
	assert!(matches!(
		encode_animated_grid(&cells, &[100], 0),
		Err(CodecError::DelayCountMismatch {
			expected: 2,
			actual: 1
		})
	));
	assert!(matches!(encode_static_grid(&BTreeMap::new(), 0), Err(CodecError::EmptyGrid)));
}

#[test_log::test]
fn test_animated_lossy_fallback() {
	let frame = striped(&[60, 61]);
	let blob = encode_single(&frame).unwrap();

	assert!(matches!(decode_animated_grid(&blob), Err(CodecError::InvalidMagic(m)) if m == *b"EM1"));
	let grid = decode_animated_grid_lossy(&blob);
	assert_eq!(grid.sync_id, 0);
	assert_eq!(grid.delays, vec![DEFAULT_FRAME_DELAY_MS]);
	assert_eq!(grid.cells, BTreeMap::from([(0, vec![frame])]));

	let grid = decode_animated_grid_lossy(b"nonsense");
	assert_eq!(grid.cells[&0], vec![IndexedFrame::blank()]);
}

#[test]
fn test_peek_cell_ids() {
	let frame = IndexedFrame::filled(4);
	let animated = encode_animated_grid(&BTreeMap::from([(8, vec![frame.clone()]), (3, vec![frame.clone()])]), &[50], 0).unwrap();
	assert_eq!(peek_cell_ids(&animated).unwrap(), BTreeSet::from([3, 8]));

	let single = encode_single(&frame).unwrap();
	assert!(peek_cell_ids(&single).unwrap().is_empty());

	assert!(matches!(peek_cell_ids(b"PNG"), Err(CodecError::InvalidMagic(_))));
	assert!(matches!(peek_cell_ids(b"EGS\0\0"), Err(CodecError::InsufficientData { .. })));
}

#[test]
fn test_grid_document_dispatch() {
	let static_blob = encode_static_grid(&BTreeMap::from([(1, IndexedFrame::filled(4))]), 5).unwrap();
	let document = GridDocument::decode(&static_blob).unwrap();
	assert_eq!(document.format(), Format::StaticGrid);
	assert_eq!(document.cell_ids(), vec![1]);
	assert_eq!(document.encode().unwrap(), static_blob);

	let single = GridDocument::Single(IndexedFrame::filled(4));
	assert_eq!(GridDocument::decode(&single.encode().unwrap()).unwrap(), single);
	assert!(single.cell_ids().is_empty());

	assert!(matches!(GridDocument::decode(b"GIF89a"), Err(CodecError::InvalidMagic(_))));
}

#[test]
fn test_truncated_grid_is_rejected() {
	let cells = BTreeMap::from([(1, striped(&[4, 5, 6])), (2, striped(&[7, 8]))]);
	let blob = encode_static_grid(&cells, 5).unwrap();

	for cut in [3, 12, 20, blob.len() - 1] {
		assert!(decode_static_grid(&blob[..cut]).is_err(), "cut at {cut}");
	}
}

#[test]
fn test_trailing_records_are_rejected() {
	let frame = IndexedFrame::filled(4);
	let blob = encode_static_grid(&BTreeMap::from([(1, frame.clone()), (2, frame)]), 0).unwrap();

	// Declare one cell fewer than the payload holds.
	let mut tail = blob[..13].to_vec();
	tail[12] = 1;
	tail.extend_from_slice(&blob[17..]);

	assert!(matches!(decode_static_grid(&tail), Err(CodecError::CorruptRecord { index: 1, .. })));
}

#[test_log::test]
fn test_oversized_grid_header_is_rejected() {
	// 65535 cells x 65535 frames over an empty payload.
	let mut blob = MAGIC_ANIMATED.to_vec();
	blob.extend_from_slice(&0i64.to_be_bytes());
	blob.extend_from_slice(&u16::MAX.to_be_bytes());
	blob.extend_from_slice(&u16::MAX.to_be_bytes());
	blob.resize(blob.len() + usize::from(u16::MAX) * 4, 0);
	blob.extend_from_slice(&100u16.to_be_bytes());
	blob.resize(blob.len() + usize::from(u16::MAX) * 2, 0);
	blob.extend_from_slice(&[1, 4, 1]);
	let payload = zlib(&[]);
	blob.extend_from_slice(&0i32.to_be_bytes());
	blob.extend_from_slice(&(payload.len() as i32).to_be_bytes());
	blob.extend_from_slice(&payload);

	assert!(matches!(decode_animated_grid(&blob), Err(CodecError::CorruptRecord { index: 0, .. })));
	assert!(matches!(Header::from_bytes(&blob), Err(CodecError::CorruptRecord { .. })));

	let grid = decode_animated_grid_lossy(&blob);
	assert_eq!(grid.cells, BTreeMap::from([(0, vec![IndexedFrame::blank()])]));
	assert_eq!(grid.delays, vec![DEFAULT_FRAME_DELAY_MS]);
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(24))]

	#[test]
	fn roundtrip_single(colors in prop::collection::vec(4u8..220, 1..20), seed in any::<u64>()) {
		let frame = noisy(&colors, seed);
		let blob = encode_single(&frame).unwrap();
		prop_assert_eq!(try_decode_single(&blob).unwrap(), frame);
	}

	#[test]
	fn roundtrip_static_grid(
		colors in prop::collection::vec(4u8..220, 1..8),
		seeds in prop::collection::vec(any::<u64>(), 1..4),
		grid_id in any::<i64>(),
	) {
		let cells: BTreeMap<i32, IndexedFrame> =
			seeds.iter().enumerate().map(|(id, &seed)| (id as i32 * 3, noisy(&colors, seed))).collect();
		let blob = encode_static_grid(&cells, grid_id).unwrap();

		let grid = decode_static_grid(&blob).unwrap();
		prop_assert_eq!(grid.grid_id, grid_id);
		prop_assert_eq!(grid.cells, cells);
	}

	#[test]
	fn roundtrip_animated_grid(
		colors in prop::collection::vec(4u8..220, 1..8),
		seed in any::<u64>(),
		cell_count in 1usize..4,
		delays in prop::collection::vec(20u32..2000, 1..4),
	) {
		let base = noisy(&colors, seed);
		let cells: BTreeMap<i32, Vec<IndexedFrame>> = (0..cell_count)
			.map(|c| {
				let frames = (0..delays.len())
					.map(|f| {
						let mut frame = base.clone();
						frame.set(c, f, colors[(c + f) % colors.len()]);
						frame
					})
					.collect();
				(c as i32, frames)
			})
			.collect();
		let blob = encode_animated_grid(&cells, &delays, 7).unwrap();

		let grid = decode_animated_grid(&blob).unwrap();
		prop_assert_eq!(grid.cells, cells);
		prop_assert_eq!(grid.delays, delays);
	}
}
