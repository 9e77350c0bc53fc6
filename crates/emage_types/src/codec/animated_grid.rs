//! Animated grid blocks (`EGA`).
//!
//! Records are written frame by frame, and within a frame cell by cell in
//! ascending id order. Each record is the smallest of a literal, a delta
//! against the same cell's previous frame (temporal), and a delta against the
//! previous cell of the same frame (spatial).

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::CodecError;
use crate::frame::{AnimatedCell, DEFAULT_FRAME_DELAY_MS, FRAME_SIZE, IndexedFrame, average_delay};

use super::constants::MAGIC_ANIMATED;
use super::header::{Format, Parsed, write_delays};
use super::reader::ByteReader;
use super::record::{Mode, RawRecord, Record, Reference};
use super::single::decode_single;
use super::subpalette::SubPalette;
use super::{deflate, ensure_consumed};

/// A decoded animated grid. Every cell has one frame per delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedGrid {
	/// Identifier shared by grids that play back in sync
	pub sync_id: i64,
	/// Frame sequences keyed by cell id
	pub cells: BTreeMap<i32, Vec<IndexedFrame>>,
	/// Per-frame delays in milliseconds
	pub delays: Vec<u32>,
}

impl AnimatedGrid {
	/// Returns the number of frames per cell.
	pub fn frame_count(&self) -> usize {
		self.delays.len()
	}

	/// Returns the rounded mean delay.
	pub fn average_delay(&self) -> u32 {
		average_delay(&self.delays)
	}

	/// Encodes the grid as an `EGA` block.
	pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
		encode_animated_grid(&self.cells, &self.delays, self.sync_id)
	}

	/// Splits the grid into per-cell animations sharing the same delays.
	pub fn into_cells(self) -> BTreeMap<i32, AnimatedCell> {
		let delays = self.delays;
		self.cells.into_iter().map(|(id, frames)| (id, AnimatedCell::new(frames, delays.clone()))).collect()
	}

	/// Wraps a single frame as a one-cell, one-frame grid (cell id 0, sync id 0).
	pub fn from_single(frame: IndexedFrame) -> Self {
		Self {
			sync_id: 0,
			cells: BTreeMap::from([(0, vec![frame])]),
			delays: vec![DEFAULT_FRAME_DELAY_MS],
		}
	}
}

/// Encodes cells as an `EGA` block.
///
/// Delays are clamped to the accepted range before they are stored.
///
/// # Errors
///
/// - [`CodecError::EmptyGrid`] without cells or frames
/// - [`CodecError::TooManyCells`] / [`CodecError::TooManyFrames`] past `u16::MAX`
/// - [`CodecError::FrameCountMismatch`] if cells differ in length
/// - [`CodecError::DelayCountMismatch`] unless there is one delay per frame
pub fn encode_animated_grid(
	cells: &BTreeMap<i32, Vec<IndexedFrame>>,
	delays: &[u32],
	sync_id: i64,
) -> Result<Vec<u8>, CodecError> {
	let Some(first) = cells.values().next() else {
		return Err(CodecError::EmptyGrid);
	};
	let frame_count = first.len();
	if frame_count == 0 {
		return Err(CodecError::EmptyGrid);
	}

	let cell_count = u16::try_from(cells.len()).map_err(|_| CodecError::TooManyCells(cells.len()))?;
	let frame_count_u16 = u16::try_from(frame_count).map_err(|_| CodecError::TooManyFrames(frame_count))?;
	if let Some((&cell_id, frames)) = cells.iter().find(|(_, frames)| frames.len() != frame_count) {
		return Err(CodecError::FrameCountMismatch {
			cell_id,
			expected: frame_count,
			actual: frames.len(),
		});
	}
	if delays.len() != frame_count {
		return Err(CodecError::DelayCountMismatch {
			expected: frame_count,
			actual: delays.len(),
		});
	}

	let palette = SubPalette::from_frames(cells.values().flatten());
	let bpp = palette.bits_per_pixel();

	let mut records = Vec::new();
	let mut modes = [0usize; 4];
	let mut previous_row: Vec<Vec<u8>> = Vec::new();
	for f in 0..frame_count {
		let mut row: Vec<Vec<u8>> = Vec::with_capacity(cells.len());
		for (c, frames) in cells.values().enumerate() {
			let local = palette.remap(&frames[f]);
			let candidates = [
				(Reference::Temporal, previous_row.get(c).map(Vec::as_slice)),
				(Reference::Spatial, row.last().map(Vec::as_slice)),
			];
			let record = Record::choose(&local, bpp, &candidates);
			modes[record.mode as usize] += 1;
			record.write_to(&mut records);
			row.push(local);
		}
		previous_row = row;
	}
	let compressed = deflate::compress(&records)?;

	let mut out = Vec::with_capacity(3 + 8 + 4 + cells.len() * 4 + 2 + frame_count * 2 + 258 + 8 + compressed.len());
	out.extend_from_slice(&MAGIC_ANIMATED);
	out.extend_from_slice(&sync_id.to_be_bytes());
	out.extend_from_slice(&cell_count.to_be_bytes());
	out.extend_from_slice(&frame_count_u16.to_be_bytes());
	for id in cells.keys() {
		out.extend_from_slice(&id.to_be_bytes());
	}
	write_delays(&mut out, delays);
	palette.write_to(&mut out);
	out.push(bpp);
	out.extend_from_slice(&(records.len() as i32).to_be_bytes());
	out.extend_from_slice(&(compressed.len() as i32).to_be_bytes());
	out.extend_from_slice(&compressed);

	let raw_size = cells.len() * frame_count * FRAME_SIZE;
	debug!(
		"Animated grid compression: {} -> {} bytes ({:.1}%), cells: {}, frames: {}, colors: {}, bpp: {}, \
		 records: {} literal / {} sparse / {} xor / {} identical",
		raw_size,
		out.len(),
		out.len() as f64 * 100.0 / raw_size as f64,
		cells.len(),
		frame_count,
		palette.len(),
		bpp,
		modes[Mode::Literal as usize],
		modes[Mode::Sparse as usize],
		modes[Mode::Xor as usize],
		modes[Mode::Identical as usize],
	);
	Ok(out)
}

/// Decodes an `EGA` block.
pub fn decode_animated_grid(data: &[u8]) -> Result<AnimatedGrid, CodecError> {
	let parsed = Parsed::from_bytes(data)?;
	let header = &parsed.header;
	let palette = match (header.format, parsed.palette.as_ref()) {
		(Format::AnimatedGrid, Some(palette)) => palette,
		_ => return Err(CodecError::InvalidMagic(header.format.magic())),
	};

	let raw = deflate::decompress(parsed.payload, header.raw_len)?;
	let mut reader = ByteReader::new(&raw);
	let mut cells: Vec<Vec<IndexedFrame>> = vec![Vec::new(); header.cell_ids.len()];

	let mut index = 0;
	let mut previous_row: Vec<Vec<u8>> = Vec::new();
	for _ in 0..header.frame_count {
		let mut row: Vec<Vec<u8>> = Vec::new();
		for (c, frames) in cells.iter_mut().enumerate() {
			let record = RawRecord::read(&mut reader, index)?;
			let base = match record.reference {
				Reference::None => None,
				Reference::Temporal => previous_row.get(c),
				Reference::Spatial => row.last(),
			};
			let local = record.reconstruct(base.map(Vec::as_slice), header.bits_per_pixel, index)?;
			frames.push(palette.restore(&local));
			row.push(local);
			index += 1;
		}
		previous_row = row;
	}
	ensure_consumed(&reader, index)?;

	Ok(AnimatedGrid {
		sync_id: header.id,
		cells: header.cell_ids.iter().copied().zip(cells).collect(),
		delays: header.delays.clone(),
	})
}

/// Decodes an animated block, never failing.
///
/// Anything that is not a readable `EGA` block goes through
/// [`decode_single`] and comes back as a one-cell, one-frame grid.
pub fn decode_animated_grid_lossy(data: &[u8]) -> AnimatedGrid {
	match decode_animated_grid(data) {
		Ok(grid) => grid,
		Err(err) => {
			warn!("Falling back to single-frame decode for animated block: {err}");
			AnimatedGrid::from_single(decode_single(data))
		}
	}
}
