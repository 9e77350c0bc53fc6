//! Error-diffusion dithering in linear light.
//!
//! Error is accumulated per channel in linear RGB. A pixel is delinearized only
//! to look up its palette match, and the error carried forward is the clamped
//! linear value minus the matched entry's linear value.

use crate::frame::{FRAME_SIZE, FRAME_WIDTH, IndexedFrame};
use crate::palette::{self, TRANSPARENT_INDEX};

use super::{is_transparent, pixel_channels};

/// `(dx, dy, weight / 48)` taps of the Jarvis–Judice–Ninke kernel
#[rustfmt::skip]
const JJN_KERNEL: [(isize, usize, f64); 12] = [
	                                          (1, 0, 7.0), (2, 0, 5.0),
	(-2, 1, 3.0), (-1, 1, 5.0), (0, 1, 7.0), (1, 1, 5.0), (2, 1, 3.0),
	(-2, 2, 1.0), (-1, 2, 3.0), (0, 2, 5.0), (1, 2, 3.0), (2, 2, 1.0),
];

const JJN_DIVISOR: f64 = 48.0;

/// Per-task accumulators, reused across frames on the same thread.
pub(super) struct Scratch {
	linear: Vec<[f64; 3]>,
	transparent: Vec<bool>,
}

impl Scratch {
	pub(super) fn new() -> Self {
		Self {
			linear: vec![[0.0; 3]; FRAME_SIZE],
			transparent: vec![false; FRAME_SIZE],
		}
	}

	/// Loads `pixels` into the accumulators as linear light.
	fn load(&mut self, pixels: &[u32]) {
		for i in 0..FRAME_SIZE {
			match pixels.get(i) {
				Some(&argb) if !is_transparent(argb) => {
					let [r, g, b] = pixel_channels(argb);
					self.linear[i] = [palette::linearize(r), palette::linearize(g), palette::linearize(b)];
					self.transparent[i] = false;
				}
				_ => {
					self.linear[i] = [0.0; 3];
					self.transparent[i] = true;
				}
			}
		}
	}

	/// Quantizes pixel `idx` and returns the linear error to diffuse.
	#[inline]
	fn quantize(&self, idx: usize, out: &mut [u8]) -> [f64; 3] {
		let clamped = self.linear[idx].map(|c| c.clamp(0.0, 1.0));
		let index = palette::match_color(
			i32::from(palette::delinearize(clamped[0])),
			i32::from(palette::delinearize(clamped[1])),
			i32::from(palette::delinearize(clamped[2])),
		);
		out[idx] = index;

		let matched = palette::linear_rgb(index);
		[clamped[0] - matched[0], clamped[1] - matched[1], clamped[2] - matched[2]]
	}

	#[inline]
	fn spread(&mut self, idx: usize, error: [f64; 3], weight: f64) {
		let acc = &mut self.linear[idx];
		acc[0] += error[0] * weight;
		acc[1] += error[1] * weight;
		acc[2] += error[2] * weight;
	}
}

/// Floyd–Steinberg with serpentine scanning.
pub(super) fn floyd_steinberg(pixels: &[u32], scratch: &mut Scratch, out: &mut IndexedFrame) {
	scratch.load(pixels);
	let out = out.as_bytes_mut();
	let width = FRAME_WIDTH as isize;

	for y in 0..FRAME_WIDTH {
		let left_to_right = y % 2 == 0;
		let step: isize = if left_to_right {
			1
		} else {
			-1
		};

		for i in 0..FRAME_WIDTH {
			let x = if left_to_right {
				i
			} else {
				FRAME_WIDTH - 1 - i
			};
			let idx = y * FRAME_WIDTH + x;

			if scratch.transparent[idx] {
				out[idx] = TRANSPARENT_INDEX;
				continue;
			}

			let error = scratch.quantize(idx, out);

			let next_x = x as isize + step;
			let prev_x = x as isize - step;
			let next_in_row = (0..width).contains(&next_x);

			if next_in_row {
				scratch.spread(idx.wrapping_add_signed(step), error, 7.0 / 16.0);
			}
			if y + 1 < FRAME_WIDTH {
				let below = (y + 1) * FRAME_WIDTH;
				if (0..width).contains(&prev_x) {
					scratch.spread(below + prev_x as usize, error, 3.0 / 16.0);
				}
				scratch.spread(below + x, error, 5.0 / 16.0);
				if next_in_row {
					scratch.spread(below + next_x as usize, error, 1.0 / 16.0);
				}
			}
		}
	}
}

/// Jarvis–Judice–Ninke, scanned left to right.
pub(super) fn jarvis_judice_ninke(pixels: &[u32], scratch: &mut Scratch, out: &mut IndexedFrame) {
	scratch.load(pixels);
	let out = out.as_bytes_mut();

	for y in 0..FRAME_WIDTH {
		for x in 0..FRAME_WIDTH {
			let idx = y * FRAME_WIDTH + x;

			if scratch.transparent[idx] {
				out[idx] = TRANSPARENT_INDEX;
				continue;
			}

			let error = scratch.quantize(idx, out);

			for &(dx, dy, weight) in &JJN_KERNEL {
				let Some(tx) = x.checked_add_signed(dx).filter(|&tx| tx < FRAME_WIDTH) else {
					continue;
				};
				let ty = y + dy;
				if ty >= FRAME_WIDTH {
					continue;
				}
				scratch.spread(ty * FRAME_WIDTH + tx, error, weight / JJN_DIVISOR);
			}
		}
	}
}
