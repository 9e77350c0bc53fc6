//! Dense remapping of the palette indices a block actually uses.

use crate::error::CodecError;
use crate::frame::{FRAME_SIZE, IndexedFrame};

use super::bitpack;
use super::reader::ByteReader;

/// Maps global palette indices to `0..len` and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SubPalette {
	to_local: [u8; 256],
	to_global: [u8; 256],
	len: usize,
}

impl SubPalette {
	/// Collects the indices used across `frames`, in ascending global order.
	pub(super) fn from_frames<'a>(frames: impl IntoIterator<Item = &'a IndexedFrame>) -> Self {
		let mut used = [false; 256];
		for frame in frames {
			for &index in frame.as_bytes() {
				used[index as usize] = true;
			}
		}

		let mut palette = Self {
			to_local: [0; 256],
			to_global: [0; 256],
			len: 0,
		};
		for (global, _) in used.iter().enumerate().filter(|(_, used)| **used) {
			palette.to_local[global] = palette.len as u8;
			palette.to_global[palette.len] = global as u8;
			palette.len += 1;
		}
		// An empty block still declares one colour.
		palette.len = palette.len.max(1);
		palette
	}

	/// Reads the count byte (0 meaning 256) and the table.
	pub(super) fn read(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
		let len = match reader.u8()? {
			0 => 256,
			n => n as usize,
		};

		let mut to_global = [0u8; 256];
		to_global[..len].copy_from_slice(reader.bytes(len)?);

		let mut to_local = [0u8; 256];
		for (local, &global) in to_global[..len].iter().enumerate() {
			to_local[global as usize] = local as u8;
		}

		Ok(Self {
			to_local,
			to_global,
			len,
		})
	}

	pub(super) fn write_to(&self, out: &mut Vec<u8>) {
		out.push(self.len as u8);
		out.extend_from_slice(&self.to_global[..self.len]);
	}

	/// Number of colours
	pub(super) fn len(&self) -> usize {
		self.len
	}

	pub(super) fn bits_per_pixel(&self) -> u8 {
		bitpack::bits_per_pixel(self.len)
	}

	/// Global indices in local order
	pub(super) fn colors(&self) -> &[u8] {
		&self.to_global[..self.len]
	}

	pub(super) fn remap(&self, frame: &IndexedFrame) -> Vec<u8> {
		frame.as_bytes().iter().map(|&index| self.to_local[index as usize]).collect()
	}

	/// Maps local indices back to a frame. Out-of-table values become index 0.
	pub(super) fn restore(&self, local: &[u8]) -> IndexedFrame {
		debug_assert_eq!(local.len(), FRAME_SIZE);
		let pixels = local.iter().map(|&index| self.to_global[index as usize]).collect::<Vec<_>>();
		IndexedFrame::from_boxed(pixels.into_boxed_slice())
	}
}
