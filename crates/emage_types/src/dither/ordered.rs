//! Ordered (Bayer) dithering.

use crate::frame::{FRAME_SIZE, FRAME_WIDTH, IndexedFrame};
use crate::palette::{self, TRANSPARENT_INDEX};

use super::{is_transparent, pixel_channels};

/// Amplitude of the threshold offset, in sRGB levels
const STRENGTH: f32 = 24.0;

#[rustfmt::skip]
const BAYER_8X8: [[u8; 8]; 8] = [
	[ 0, 32,  8, 40,  2, 34, 10, 42],
	[48, 16, 56, 24, 50, 18, 58, 26],
	[12, 44,  4, 36, 14, 46,  6, 38],
	[60, 28, 52, 20, 62, 30, 54, 22],
	[ 3, 35, 11, 43,  1, 33,  9, 41],
	[51, 19, 59, 27, 49, 17, 57, 25],
	[15, 47,  7, 39, 13, 45,  5, 37],
	[63, 31, 55, 23, 61, 29, 53, 21],
];

/// Signed threshold in `[-0.5, 0.5)` for a pixel position
#[inline]
fn threshold(x: usize, y: usize) -> f32 {
	f32::from(BAYER_8X8[y & 7][x & 7]) / 64.0 - 0.5
}

pub(super) fn dither(pixels: &[u32], out: &mut IndexedFrame) {
	let out = out.as_bytes_mut();

	for (i, slot) in out.iter_mut().enumerate().take(FRAME_SIZE) {
		let Some(&argb) = pixels.get(i) else {
			*slot = TRANSPARENT_INDEX;
			continue;
		};
		if is_transparent(argb) {
			*slot = TRANSPARENT_INDEX;
			continue;
		}

		let offset = threshold(i % FRAME_WIDTH, i / FRAME_WIDTH) * STRENGTH;
		let [r, g, b] = pixel_channels(argb);
		*slot = palette::match_color(
			(f32::from(r) + offset) as i32,
			(f32::from(g) + offset) as i32,
			(f32::from(b) + offset) as i32,
		);
	}
}
