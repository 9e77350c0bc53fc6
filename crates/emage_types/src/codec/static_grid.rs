//! Static grid blocks (`EGS`).
//!
//! Cells are written in ascending id order. Each cell after the first may be
//! stored relative to the cell before it.

use std::collections::BTreeMap;

use log::debug;

use crate::error::CodecError;
use crate::frame::{FRAME_SIZE, IndexedFrame};

use super::constants::MAGIC_STATIC;
use super::header::{Format, Parsed};
use super::reader::ByteReader;
use super::record::{RawRecord, Record, Reference};
use super::subpalette::SubPalette;
use super::{deflate, ensure_consumed};

/// A decoded static grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticGrid {
	/// Grid identifier, typically a creation timestamp
	pub grid_id: i64,
	/// Frames keyed by cell id
	pub cells: BTreeMap<i32, IndexedFrame>,
}

impl StaticGrid {
	/// Creates a grid.
	pub fn new(grid_id: i64, cells: BTreeMap<i32, IndexedFrame>) -> Self {
		Self {
			grid_id,
			cells,
		}
	}

	/// Encodes the grid as an `EGS` block.
	pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
		encode_static_grid(&self.cells, self.grid_id)
	}
}

/// Encodes cells as an `EGS` block.
///
/// # Errors
///
/// [`CodecError::EmptyGrid`] without cells, [`CodecError::TooManyCells`] past `u16::MAX`.
pub fn encode_static_grid(cells: &BTreeMap<i32, IndexedFrame>, grid_id: i64) -> Result<Vec<u8>, CodecError> {
	if cells.is_empty() {
		return Err(CodecError::EmptyGrid);
	}
	let cell_count = u16::try_from(cells.len()).map_err(|_| CodecError::TooManyCells(cells.len()))?;

	let palette = SubPalette::from_frames(cells.values());
	let bpp = palette.bits_per_pixel();

	let mut records = Vec::new();
	let mut previous: Option<Vec<u8>> = None;
	for frame in cells.values() {
		let local = palette.remap(frame);
		let record = Record::choose(&local, bpp, &[(Reference::None, previous.as_deref())]);
		record.write_to(&mut records);
		previous = Some(local);
	}
	let compressed = deflate::compress(&records)?;

	let mut out = Vec::with_capacity(3 + 8 + 2 + cells.len() * 4 + 258 + 8 + compressed.len());
	out.extend_from_slice(&MAGIC_STATIC);
	out.extend_from_slice(&grid_id.to_be_bytes());
	out.extend_from_slice(&cell_count.to_be_bytes());
	for id in cells.keys() {
		out.extend_from_slice(&id.to_be_bytes());
	}
	palette.write_to(&mut out);
	out.push(bpp);
	out.extend_from_slice(&(records.len() as i32).to_be_bytes());
	out.extend_from_slice(&(compressed.len() as i32).to_be_bytes());
	out.extend_from_slice(&compressed);

	let raw_size = cells.len() * FRAME_SIZE;
	debug!(
		"Static grid compression: {} -> {} bytes ({:.1}%), cells: {}, colors: {}, bpp: {}",
		raw_size,
		out.len(),
		out.len() as f64 * 100.0 / raw_size as f64,
		cells.len(),
		palette.len(),
		bpp
	);
	Ok(out)
}

/// Decodes an `EGS` block.
pub fn decode_static_grid(data: &[u8]) -> Result<StaticGrid, CodecError> {
	let parsed = Parsed::from_bytes(data)?;
	let header = &parsed.header;
	let palette = match (header.format, parsed.palette.as_ref()) {
		(Format::StaticGrid, Some(palette)) => palette,
		_ => return Err(CodecError::InvalidMagic(header.format.magic())),
	};

	let raw = deflate::decompress(parsed.payload, header.raw_len)?;
	let mut reader = ByteReader::new(&raw);
	let mut cells = BTreeMap::new();
	let mut previous: Option<Vec<u8>> = None;

	for (index, &id) in header.cell_ids.iter().enumerate() {
		let record = RawRecord::read(&mut reader, index)?;
		// Deltas in a static grid are always against the previous cell.
		let local = record.reconstruct(previous.as_deref(), header.bits_per_pixel, index)?;
		cells.insert(id, palette.restore(&local));
		previous = Some(local);
	}
	ensure_consumed(&reader, header.cell_ids.len())?;

	Ok(StaticGrid {
		grid_id: header.id,
		cells,
	})
}
