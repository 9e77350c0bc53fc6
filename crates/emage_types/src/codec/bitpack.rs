//! MSB-first bit packing of sub-palette indices.

use crate::error::CodecError;

/// Bit depths a block may declare
pub const SUPPORTED_BIT_DEPTHS: [u8; 4] = [1, 2, 4, 8];

/// Returns the smallest supported depth that can hold `colors` distinct values.
#[inline]
pub fn bits_per_pixel(colors: usize) -> u8 {
	match colors {
		0..=2 => 1,
		3..=4 => 2,
		5..=16 => 4,
		_ => 8,
	}
}

/// Checks a declared bit depth.
pub(super) fn validate(bpp: u8) -> Result<u8, CodecError> {
	if SUPPORTED_BIT_DEPTHS.contains(&bpp) {
		Ok(bpp)
	} else {
		Err(CodecError::UnsupportedBitDepth(bpp))
	}
}

/// Number of bytes `pixels` values occupy at `bpp` bits each.
#[inline]
pub(super) fn packed_len(pixels: usize, bpp: u8) -> usize {
	let per_byte = 8 / bpp as usize;
	pixels.div_ceil(per_byte)
}

/// Packs values MSB-first; pixel `i` lands at bit offset
/// `(per_byte - 1 - i % per_byte) * bpp` of byte `i / per_byte`.
pub(super) fn pack(values: &[u8], bpp: u8) -> Vec<u8> {
	if bpp >= 8 {
		return values.to_vec();
	}

	let per_byte = 8 / bpp as usize;
	let mask = (1u8 << bpp) - 1;
	let mut packed = vec![0u8; packed_len(values.len(), bpp)];

	for (i, &value) in values.iter().enumerate() {
		let shift = (per_byte - 1 - i % per_byte) * bpp as usize;
		packed[i / per_byte] |= (value & mask) << shift;
	}
	packed
}

/// Unpacks `count` values. Missing trailing bytes read as zero.
pub(super) fn unpack(packed: &[u8], bpp: u8, count: usize) -> Vec<u8> {
	if bpp >= 8 {
		let mut values = packed[..packed.len().min(count)].to_vec();
		values.resize(count, 0);
		return values;
	}

	let per_byte = 8 / bpp as usize;
	let mask = (1u8 << bpp) - 1;
	let mut values = vec![0u8; count];

	for (i, slot) in values.iter_mut().enumerate() {
		let Some(&byte) = packed.get(i / per_byte) else {
			break;
		};
		let shift = (per_byte - 1 - i % per_byte) * bpp as usize;
		*slot = (byte >> shift) & mask;
	}
	values
}
