//! Block headers.

use std::fmt::Display;

use crate::error::CodecError;
use crate::frame::{MIN_FRAME_DELAY_MS, average_delay, clamp_delay};

use super::bitpack;
use super::constants::{MAGIC_ANIMATED, MAGIC_LEGACY, MAGIC_SINGLE, MAGIC_STATIC};
use super::reader::ByteReader;
use super::subpalette::SubPalette;

/// Block kinds, identified by their three magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	/// `EM1`: one frame
	Single,
	/// `EM0`: one frame without palette remapping (decode only)
	Legacy,
	/// `EGS`: static grid
	StaticGrid,
	/// `EGA`: animated grid
	AnimatedGrid,
}

impl Format {
	/// Identifies a block by its first three bytes.
	pub fn from_magic(magic: [u8; 3]) -> Result<Self, CodecError> {
		match magic {
			MAGIC_SINGLE => Ok(Self::Single),
			MAGIC_LEGACY => Ok(Self::Legacy),
			MAGIC_STATIC => Ok(Self::StaticGrid),
			MAGIC_ANIMATED => Ok(Self::AnimatedGrid),
			other => Err(CodecError::InvalidMagic(other)),
		}
	}

	/// Sniffs the format of a block.
	pub fn detect(data: &[u8]) -> Result<Self, CodecError> {
		Self::from_magic(ByteReader::new(data).array()?)
	}

	/// Returns the magic bytes.
	pub fn magic(&self) -> [u8; 3] {
		match self {
			Self::Single => MAGIC_SINGLE,
			Self::Legacy => MAGIC_LEGACY,
			Self::StaticGrid => MAGIC_STATIC,
			Self::AnimatedGrid => MAGIC_ANIMATED,
		}
	}

	/// Returns `true` for the grid formats.
	pub fn is_grid(&self) -> bool {
		matches!(self, Self::StaticGrid | Self::AnimatedGrid)
	}
}

impl Display for Format {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Single => write!(f, "EM1 (single frame)"),
			Self::Legacy => write!(f, "EM0 (legacy frame)"),
			Self::StaticGrid => write!(f, "EGS (static grid)"),
			Self::AnimatedGrid => write!(f, "EGA (animated grid)"),
		}
	}
}

/// Parsed header of any block.
///
/// Fields that a format does not carry hold neutral values: `id` is 0 for
/// single frames, `frame_count` is 1 for everything but animated grids, and
/// `colors` is 0 for legacy blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
	/// Block kind
	pub format: Format,
	/// Grid identifier (static) or sync identifier (animated)
	pub id: i64,
	/// Cell identifiers in stream order
	pub cell_ids: Vec<i32>,
	/// Frames per cell
	pub frame_count: usize,
	/// Per-frame delays in milliseconds (animated grids only)
	pub delays: Vec<u32>,
	/// Stored average delay in milliseconds (animated grids only)
	pub average_delay: u32,
	/// Sub-palette size
	pub colors: usize,
	/// Bits per packed pixel
	pub bits_per_pixel: u8,
	/// Payload size before deflate
	pub raw_len: usize,
	/// Payload size after deflate
	pub compressed_len: usize,
}

impl Header {
	/// Parses the header of any block without inflating its payload.
	pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
		Ok(Parsed::from_bytes(data)?.header)
	}

	/// Total number of frames in the block
	pub fn total_frames(&self) -> usize {
		self.cell_ids.len().max(1) * self.frame_count
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Emage Block Header:\n\
			- Format: {}\n\
			- Id: {}\n\
			- Cells: {}\n\
			- Frames per cell: {}\n\
			- Average delay: {} ms\n\
			- Colors: {}\n\
			- Bits per pixel: {}\n\
			- Payload: {} bytes raw, {} bytes compressed",
			self.format,
			self.id,
			self.cell_ids.len(),
			self.frame_count,
			self.average_delay,
			self.colors,
			self.bits_per_pixel,
			self.raw_len,
			self.compressed_len,
		)
	}
}

/// A header together with its sub-palette and still-compressed payload.
#[derive(Debug)]
pub(super) struct Parsed<'a> {
	pub(super) header: Header,
	pub(super) palette: Option<SubPalette>,
	pub(super) payload: &'a [u8],
}

impl<'a> Parsed<'a> {
	pub(super) fn from_bytes(data: &'a [u8]) -> Result<Self, CodecError> {
		let mut reader = ByteReader::new(data);
		let format = Format::from_magic(reader.array()?)?;

		let mut header = Header {
			format,
			id: 0,
			cell_ids: Vec::new(),
			frame_count: 1,
			delays: Vec::new(),
			average_delay: 0,
			colors: 0,
			bits_per_pixel: 8,
			raw_len: 0,
			compressed_len: 0,
		};

		if format.is_grid() {
			header.id = reader.i64()?;
			let cell_count = reader.u16()? as usize;
			if format == Format::AnimatedGrid {
				header.frame_count = reader.u16()? as usize;
			}
			header.cell_ids = (0..cell_count).map(|_| reader.i32()).collect::<Result<_, _>>()?;
		}

		if format == Format::AnimatedGrid {
			header.average_delay = u32::from(reader.u16()?);
			let average = i32::try_from(header.average_delay).unwrap_or(i32::MAX);
			header.delays = (0..header.frame_count)
				.map(|_| Ok((average + i32::from(reader.i16()?)).max(MIN_FRAME_DELAY_MS as i32) as u32))
				.collect::<Result<_, CodecError>>()?;
		}

		let palette = match format {
			Format::Legacy => None,
			_ => {
				let palette = SubPalette::read(&mut reader)?;
				header.colors = palette.len();
				header.bits_per_pixel = bitpack::validate(reader.u8()?)?;
				Some(palette)
			}
		};

		header.raw_len = reader.length()?;
		// Every record takes at least its marker byte.
		let records = header.cell_ids.len().saturating_mul(header.frame_count);
		if format.is_grid() && records > header.raw_len {
			return Err(CodecError::CorruptRecord {
				index: header.raw_len,
				reason: format!("{records} records cannot fit in {} payload bytes", header.raw_len),
			});
		}
		header.compressed_len = reader.length()?;
		let payload = reader.bytes(header.compressed_len)?;

		Ok(Self {
			header,
			palette,
			payload,
		})
	}
}

/// Writes the animated-grid delay table: average, then one signed offset per frame.
pub(super) fn write_delays(out: &mut Vec<u8>, delays: &[u32]) -> u32 {
	let delays: Vec<u32> = delays.iter().copied().map(clamp_delay).collect();
	let average = average_delay(&delays);

	// Clamped delays and their average both lie in 20..=i16::MAX.
	out.extend_from_slice(&(average as u16).to_be_bytes());
	for delay in delays {
		let offset = (delay as i32 - average as i32) as i16;
		out.extend_from_slice(&offset.to_be_bytes());
	}
	average
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_from_magic() {
		assert_eq!(Format::from_magic(*b"EM1").unwrap(), Format::Single);
		assert_eq!(Format::from_magic(*b"EGA").unwrap(), Format::AnimatedGrid);
		assert!(matches!(Format::from_magic(*b"GIF"), Err(CodecError::InvalidMagic(m)) if m == *b"GIF"));
		assert!(matches!(Format::detect(b"EG"), Err(CodecError::InsufficientData { .. })));
		for format in [Format::Single, Format::Legacy, Format::StaticGrid, Format::AnimatedGrid] {
			assert_eq!(Format::from_magic(format.magic()).unwrap(), format);
		}
	}

	#[test]
	fn test_delay_table() {
		let mut out = Vec::new();
		let average = write_delays(&mut out, &[10, 100, 190, 40_000]);
		// Clamped to 20, 100, 190, 32767.
		assert_eq!(average, 8269);
		assert_eq!(out.len(), 2 + 4 * 2);
		assert_eq!(u16::from_be_bytes([out[0], out[1]]), 8269);
		assert_eq!(i16::from_be_bytes([out[2], out[3]]), 20 - 8269);
		assert_eq!(i16::from_be_bytes([out[8], out[9]]), 32767 - 8269);
	}

	#[test]
	fn test_truncated_header() {
		let err = Header::from_bytes(b"EGS\0\0\0").unwrap_err();
		assert!(matches!(err, CodecError::InsufficientData { .. }));
	}
}
