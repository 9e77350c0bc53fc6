//! Compact storage of indexed frames.
//!
//! Frames are stored in self-describing blocks. All integers are big-endian,
//! and every block starts with three magic bytes.
//!
//! # Block Layouts
//!
//! | Magic | Layout                                                                                      |
//! |-------|---------------------------------------------------------------------------------------------|
//! | `EM1` | sub-palette, `u8` bpp, `i32` packed len, `i32` deflated len, deflated bit-packed frame       |
//! | `EM0` | `i32` raw len, `i32` deflated len, deflated raw indices (decode only)                         |
//! | `EGS` | `i64` grid id, `u16` cells, `i32` ids, sub-palette, `u8` bpp, `i32` raw len, `i32` deflated len, deflated records |
//! | `EGA` | `i64` sync id, `u16` cells, `u16` frames, `i32` ids, `u16` avg delay, `i16` offsets, sub-palette, `u8` bpp, `i32` raw len, `i32` deflated len, deflated records |
//!
//! The sub-palette is a `u8` color count (0 means 256) followed by the global
//! palette indices in ascending order. Pixels are stored as positions into the
//! sub-palette, packed MSB-first at the smallest of 1, 2, 4 or 8 bits.
//!
//! Grid payloads are a sequence of records; see [`Mode`] and [`Reference`].
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use emage_types::codec::{GridDocument, encode_static_grid};
//! use emage_types::frame::IndexedFrame;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cells = BTreeMap::from([(7, IndexedFrame::filled(34)), (8, IndexedFrame::filled(35))]);
//! let blob = encode_static_grid(&cells, 1_700_000_000_000)?;
//!
//! let document = GridDocument::decode(&blob)?;
//! assert_eq!(document.cell_ids(), vec![7, 8]);
//! # Ok(())
//! # }
//! ```

mod animated_grid;
mod bitpack;
mod constants;
mod deflate;
mod header;
mod reader;
mod record;
mod single;
mod static_grid;
mod subpalette;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use crate::error::CodecError;
use crate::frame::IndexedFrame;

pub use animated_grid::{AnimatedGrid, decode_animated_grid, decode_animated_grid_lossy, encode_animated_grid};
pub use bitpack::{SUPPORTED_BIT_DEPTHS, bits_per_pixel};
pub use constants::*;
pub use header::{Format, Header};
pub use record::{Mode, Reference, SPARSE_LIMIT};
pub use single::{decode_single, encode_single, try_decode_single};
pub use static_grid::{StaticGrid, decode_static_grid, encode_static_grid};

use reader::ByteReader;

/// Fails if records were followed by unread bytes.
fn ensure_consumed(reader: &ByteReader<'_>, records: usize) -> Result<(), CodecError> {
	if reader.remaining() > 0 {
		return Err(CodecError::CorruptRecord {
			index: records,
			reason: format!("{} trailing bytes after the last record", reader.remaining()),
		});
	}
	Ok(())
}

/// Any decoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridDocument {
	/// `EM1` or `EM0`
	Single(IndexedFrame),
	/// `EGS`
	Static(StaticGrid),
	/// `EGA`
	Animated(AnimatedGrid),
}

impl GridDocument {
	/// Decodes a block of any format.
	pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
		match Format::detect(data)? {
			Format::Single | Format::Legacy => try_decode_single(data).map(Self::Single),
			Format::StaticGrid => decode_static_grid(data).map(Self::Static),
			Format::AnimatedGrid => decode_animated_grid(data).map(Self::Animated),
		}
	}

	/// Encodes the document in its own format. Single frames are always written as `EM1`.
	pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
		match self {
			Self::Single(frame) => encode_single(frame),
			Self::Static(grid) => grid.encode(),
			Self::Animated(grid) => grid.encode(),
		}
	}

	/// Returns the format [`GridDocument::encode`] writes.
	pub fn format(&self) -> Format {
		match self {
			Self::Single(_) => Format::Single,
			Self::Static(_) => Format::StaticGrid,
			Self::Animated(_) => Format::AnimatedGrid,
		}
	}

	/// Returns the cell ids in ascending order; empty for single frames.
	pub fn cell_ids(&self) -> Vec<i32> {
		match self {
			Self::Single(_) => Vec::new(),
			Self::Static(grid) => grid.cells.keys().copied().collect(),
			Self::Animated(grid) => grid.cells.keys().copied().collect(),
		}
	}
}

/// Reads the cell ids of a grid block without touching its payload.
///
/// Single-frame blocks carry no cell ids and yield an empty set.
pub fn peek_cell_ids(data: &[u8]) -> Result<BTreeSet<i32>, CodecError> {
	let mut reader = ByteReader::new(data);
	let format = Format::from_magic(reader.array()?)?;
	if !format.is_grid() {
		return Ok(BTreeSet::new());
	}

	reader.skip(8)?;
	let count = reader.u16()? as usize;
	if format == Format::AnimatedGrid {
		reader.skip(2)?;
	}
	(0..count).map(|_| reader.i32()).collect()
}
