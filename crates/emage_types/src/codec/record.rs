//! Per-frame records of the grid payloads.
//!
//! Every record starts with a marker byte: the high nibble names the reference
//! frame, the low nibble the encoding. All but `Identical` are followed by a
//! `u16` payload length and the payload.
//!
//! | Mode | Name        | Payload                                          |
//! |------|-------------|--------------------------------------------------|
//! | 0    | `Literal`   | bit-packed frame                                 |
//! | 1    | `Sparse`    | `u16` count, then `count × (u16 pos, u8 value)`  |
//! | 2    | `Xor`       | bit-packed XOR against the reference             |
//! | 3    | `Identical` | none                                             |

use crate::error::CodecError;
use crate::frame::FRAME_SIZE;

use super::bitpack;
use super::reader::ByteReader;

/// Sparse records are only considered below this many changed pixels
pub const SPARSE_LIMIT: usize = FRAME_SIZE / 8;

/// Which earlier frame a delta record is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Reference {
	/// No reference (literal records, static grids)
	None = 0,
	/// Same cell, previous frame
	Temporal = 1,
	/// Previous cell, same frame
	Spatial = 2,
}

impl Reference {
	fn from_nibble(nibble: u8) -> Option<Self> {
		match nibble {
			0 => Some(Self::None),
			1 => Some(Self::Temporal),
			2 => Some(Self::Spatial),
			_ => None,
		}
	}
}

/// Record encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
	/// Full bit-packed frame
	Literal = 0,
	/// Changed pixels only
	Sparse = 1,
	/// Bit-packed XOR against the reference
	Xor = 2,
	/// Same as the reference
	Identical = 3,
}

impl Mode {
	fn from_nibble(nibble: u8) -> Option<Self> {
		match nibble {
			0 => Some(Self::Literal),
			1 => Some(Self::Sparse),
			2 => Some(Self::Xor),
			3 => Some(Self::Identical),
			_ => None,
		}
	}
}

/// One encoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Record {
	pub(super) reference: Reference,
	pub(super) mode: Mode,
	pub(super) payload: Vec<u8>,
}

impl Record {
	pub(super) fn marker(&self) -> u8 {
		((self.reference as u8) << 4) | self.mode as u8
	}

	/// Bytes the record takes in the stream
	pub(super) fn encoded_len(&self) -> usize {
		match self.mode {
			Mode::Identical => 1,
			_ => 3 + self.payload.len(),
		}
	}

	pub(super) fn write_to(&self, out: &mut Vec<u8>) {
		out.push(self.marker());
		if self.mode != Mode::Identical {
			// Payloads are at most one 8 bpp frame, which fits a u16.
			out.extend_from_slice(&(self.payload.len() as u16).to_be_bytes());
			out.extend_from_slice(&self.payload);
		}
	}

	pub(super) fn literal(local: &[u8], bpp: u8) -> Self {
		Self {
			reference: Reference::None,
			mode: Mode::Literal,
			payload: bitpack::pack(local, bpp),
		}
	}

	/// Cheapest delta of `local` against `base`.
	pub(super) fn delta(local: &[u8], base: &[u8], bpp: u8, reference: Reference) -> Self {
		let changed = local.iter().zip(base).filter(|(a, b)| a != b).count();
		if changed == 0 {
			return Self {
				reference,
				mode: Mode::Identical,
				payload: Vec::new(),
			};
		}

		let xor: Vec<u8> = local.iter().zip(base).map(|(a, b)| a ^ b).collect();
		let xor = Self {
			reference,
			mode: Mode::Xor,
			payload: bitpack::pack(&xor, bpp),
		};
		if changed >= SPARSE_LIMIT {
			return xor;
		}

		let mut payload = Vec::with_capacity(2 + changed * 3);
		payload.extend_from_slice(&(changed as u16).to_be_bytes());
		for (position, (&value, _)) in local.iter().zip(base).enumerate().filter(|(_, (a, b))| a != b) {
			payload.extend_from_slice(&(position as u16).to_be_bytes());
			payload.push(value);
		}
		let sparse = Self {
			reference,
			mode: Mode::Sparse,
			payload,
		};

		if sparse.encoded_len() <= xor.encoded_len() {
			sparse
		} else {
			xor
		}
	}

	/// Smallest record for `local` among a literal and deltas against each candidate.
	///
	/// Ties keep the earlier choice, literal first.
	pub(super) fn choose(local: &[u8], bpp: u8, candidates: &[(Reference, Option<&[u8]>)]) -> Self {
		let mut best = Self::literal(local, bpp);
		for &(reference, base) in candidates {
			let Some(base) = base else {
				continue;
			};
			let candidate = Self::delta(local, base, bpp, reference);
			if candidate.encoded_len() < best.encoded_len() {
				best = candidate;
			}
		}
		best
	}
}

/// A record as read from the stream, borrowing its payload.
#[derive(Debug, Clone, Copy)]
pub(super) struct RawRecord<'a> {
	pub(super) reference: Reference,
	pub(super) mode: Mode,
	pub(super) payload: &'a [u8],
}

impl<'a> RawRecord<'a> {
	pub(super) fn read(reader: &mut ByteReader<'a>, index: usize) -> Result<Self, CodecError> {
		let marker = reader.u8()?;
		let corrupt = |reason: String| CodecError::CorruptRecord {
			index,
			reason,
		};

		let reference = Reference::from_nibble(marker >> 4)
			.ok_or_else(|| corrupt(format!("unknown reference in marker {marker:#04X}")))?;
		let mode = Mode::from_nibble(marker & 0x0F).ok_or_else(|| corrupt(format!("unknown mode in marker {marker:#04X}")))?;

		let payload = match mode {
			Mode::Identical => &[][..],
			_ => {
				let len = reader.u16()? as usize;
				reader.bytes(len)?
			}
		};

		Ok(Self {
			reference,
			mode,
			payload,
		})
	}

	/// Rebuilds the local-index frame. A missing reference reads as all zeros.
	pub(super) fn reconstruct(&self, base: Option<&[u8]>, bpp: u8, index: usize) -> Result<Vec<u8>, CodecError> {
		let start = || base.map_or_else(|| vec![0u8; FRAME_SIZE], <[u8]>::to_vec);

		match self.mode {
			Mode::Identical => Ok(start()),
			Mode::Literal => {
				self.check_packed_len(bpp, index)?;
				Ok(bitpack::unpack(self.payload, bpp, FRAME_SIZE))
			}
			Mode::Xor => {
				self.check_packed_len(bpp, index)?;
				let mut local = start();
				for (slot, delta) in local.iter_mut().zip(bitpack::unpack(self.payload, bpp, FRAME_SIZE)) {
					*slot ^= delta;
				}
				Ok(local)
			}
			Mode::Sparse => {
				let mut local = start();
				let mut reader = ByteReader::new(self.payload);
				let count = reader.u16()?;
				for _ in 0..count {
					let position = reader.u16()? as usize;
					let value = reader.u8()?;
					let slot = local.get_mut(position).ok_or_else(|| CodecError::CorruptRecord {
						index,
						reason: format!("sparse position {position} out of range"),
					})?;
					*slot = value;
				}
				Ok(local)
			}
		}
	}

	fn check_packed_len(&self, bpp: u8, index: usize) -> Result<(), CodecError> {
		let expected = bitpack::packed_len(FRAME_SIZE, bpp);
		if self.payload.len() < expected {
			return Err(CodecError::CorruptRecord {
				index,
				reason: format!("payload is {} bytes, expected {expected}", self.payload.len()),
			});
		}
		Ok(())
	}
}
