//! Single-frame blocks (`EM1`, and legacy `EM0` on the read side).

use log::{debug, warn};

use crate::error::CodecError;
use crate::frame::{FRAME_SIZE, IndexedFrame};

use super::constants::MAGIC_SINGLE;
use super::header::{Format, Parsed};
use super::subpalette::SubPalette;
use super::{bitpack, deflate};

/// Encodes one frame as an `EM1` block.
pub fn encode_single(frame: &IndexedFrame) -> Result<Vec<u8>, CodecError> {
	let palette = SubPalette::from_frames([frame]);
	let bpp = palette.bits_per_pixel();
	let packed = bitpack::pack(&palette.remap(frame), bpp);
	let compressed = deflate::compress(&packed)?;

	let mut out = Vec::with_capacity(3 + 1 + palette.len() + 1 + 8 + compressed.len());
	out.extend_from_slice(&MAGIC_SINGLE);
	palette.write_to(&mut out);
	out.push(bpp);
	out.extend_from_slice(&(packed.len() as i32).to_be_bytes());
	out.extend_from_slice(&(compressed.len() as i32).to_be_bytes());
	out.extend_from_slice(&compressed);

	debug!(
		"Encoded single frame: {} -> {} bytes, {} colors, {} bpp",
		FRAME_SIZE,
		out.len(),
		palette.len(),
		bpp
	);
	Ok(out)
}

/// Decodes an `EM1` or `EM0` block, reporting why it failed.
pub fn try_decode_single(data: &[u8]) -> Result<IndexedFrame, CodecError> {
	let parsed = Parsed::from_bytes(data)?;
	let header = &parsed.header;

	match (header.format, parsed.palette.as_ref()) {
		(Format::Single, Some(palette)) => {
			let expected = bitpack::packed_len(FRAME_SIZE, header.bits_per_pixel);
			if header.raw_len < expected {
				return Err(CodecError::InsufficientData {
					expected,
					actual: header.raw_len,
				});
			}
			let packed = deflate::decompress(parsed.payload, header.raw_len)?;
			Ok(palette.restore(&bitpack::unpack(&packed, header.bits_per_pixel, FRAME_SIZE)))
		}
		(Format::Legacy, _) => {
			let raw = deflate::decompress(parsed.payload, header.raw_len)?;
			IndexedFrame::from_vec(raw).map_err(|_| CodecError::Decompression {
				expected: FRAME_SIZE,
				actual: header.raw_len,
			})
		}
		_ => Err(CodecError::InvalidMagic(header.format.magic())),
	}
}

/// Decodes a single-frame block, never failing.
///
/// Tries `EM1`/`EM0`, then a bare zlib stream of one frame, and finally
/// returns a blank frame. Each fallback is logged.
pub fn decode_single(data: &[u8]) -> IndexedFrame {
	let err = match try_decode_single(data) {
		Ok(frame) => return frame,
		Err(err) => err,
	};

	match deflate::decompress(data, FRAME_SIZE).map(IndexedFrame::from_vec) {
		Ok(Ok(frame)) => {
			warn!("Decoded frame block as bare zlib after: {err}");
			frame
		}
		_ => {
			warn!("Unreadable frame block ({} bytes), using blank frame: {err}", data.len());
			IndexedFrame::blank()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_two_color_frame_packs_to_one_bit() {
		let mut frame = IndexedFrame::filled(34);
		frame.set(10, 10, 119);

		let blob = encode_single(&frame).unwrap();
		assert_eq!(&blob[..3], b"EM1");
		assert_eq!(blob[3], 2);
		assert_eq!(&blob[4..6], &[34, 119]);
		assert_eq!(blob[6], 1);
		assert_eq!(i32::from_be_bytes(blob[7..11].try_into().unwrap()), 2048);

		assert_eq!(try_decode_single(&blob).unwrap(), frame);
	}

	#[test]
	fn test_grid_magic_is_rejected() {
		let mut blob = encode_single(&IndexedFrame::filled(5)).unwrap();
		blob[1] = b'G';
		blob[2] = b'S';
		assert!(try_decode_single(&blob).is_err());
		assert_eq!(decode_single(&blob), IndexedFrame::blank());
	}
}
