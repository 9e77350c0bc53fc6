//! Dithering of 128×128 ARGB tiles into palette-indexed frames.
//!
//! Input pixels are packed `0xAARRGGBB`. Pixels with alpha below
//! [`ALPHA_THRESHOLD`] always become [`TRANSPARENT_INDEX`] and take no part in
//! error diffusion. Input shorter than one tile is padded with transparency.
//!
//! Three strategies are available, selected by [`Quality`]:
//!
//! | Quality    | Algorithm                          | Scan          |
//! |------------|------------------------------------|---------------|
//! | `Fast`     | 8×8 Bayer ordered dither           | n/a           |
//! | `Balanced` | Floyd–Steinberg, linear light      | serpentine    |
//! | `High`     | Jarvis–Judice–Ninke, linear light  | left to right |
//!
//! # Stable dithering
//!
//! [`dither_frame_stable`] re-dithers an animation frame against its
//! predecessor. Pixels that did not change (after dilating the changed region
//! by [`STABLE_DILATION_RADIUS`]) keep their previous index, which removes
//! diffusion shimmer from static parts of an animation.
//!
//! # Examples
//!
//! ```
//! use emage_types::dither::{Quality, dither_frame};
//! use emage_types::frame::FRAME_SIZE;
//!
//! let pixels = vec![0x00FF_FFFFu32; FRAME_SIZE];
//! let frame = dither_frame(&pixels, Quality::Fast);
//! assert!(frame.as_bytes().iter().all(|&p| p == 0));
//! ```

mod diffusion;
mod ordered;

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::frame::{FRAME_SIZE, FRAME_WIDTH, IndexedFrame};
use crate::pool::FramePool;

pub use crate::palette::TRANSPARENT_INDEX;

/// Pixels with alpha below this are transparent
pub const ALPHA_THRESHOLD: u8 = 128;

/// Radius, in pixels, by which the changed region is grown in stable mode
pub const STABLE_DILATION_RADIUS: usize = 2;

thread_local! {
	static SCRATCH: RefCell<diffusion::Scratch> = RefCell::new(diffusion::Scratch::new());
}

/// Dithering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
	/// Ordered 8×8 Bayer dither, no error carried between pixels
	Fast,
	/// Floyd–Steinberg error diffusion
	#[default]
	Balanced,
	/// Jarvis–Judice–Ninke error diffusion
	High,
}

impl Quality {
	/// All strategies, fastest first
	pub const ALL: [Quality; 3] = [Quality::Fast, Quality::Balanced, Quality::High];
}

impl fmt::Display for Quality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Fast => write!(f, "fast"),
			Self::Balanced => write!(f, "balanced"),
			Self::High => write!(f, "high"),
		}
	}
}

impl FromStr for Quality {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"fast" => Ok(Self::Fast),
			"balanced" => Ok(Self::Balanced),
			"high" => Ok(Self::High),
			other => Err(SettingsError::InvalidValue {
				key: "dither.quality",
				message: format!("unknown quality `{other}`, expected fast, balanced or high"),
			}),
		}
	}
}

/// Returns `true` if an ARGB pixel is below the alpha threshold.
#[inline]
pub fn is_transparent(argb: u32) -> bool {
	((argb >> 24) as u8) < ALPHA_THRESHOLD
}

/// Splits an ARGB pixel into its `[r, g, b]` channels.
#[inline]
pub fn pixel_channels(argb: u32) -> [u8; 3] {
	[(argb >> 16) as u8, (argb >> 8) as u8, argb as u8]
}

/// Dithers one tile.
///
/// The output buffer comes from the global [`FramePool`]; hand it back with
/// [`FramePool::release`] when it is no longer needed.
pub fn dither_frame(pixels: &[u32], quality: Quality) -> IndexedFrame {
	dither_frame_in(FramePool::global(), pixels, quality)
}

fn dither_frame_in(pool: &FramePool, pixels: &[u32], quality: Quality) -> IndexedFrame {
	let mut out = pool.acquire();
	dither_into(pixels, quality, &mut out);
	out
}

fn dither_into(pixels: &[u32], quality: Quality, out: &mut IndexedFrame) {
	match quality {
		Quality::Fast => ordered::dither(pixels, out),
		Quality::Balanced => SCRATCH.with_borrow_mut(|scratch| diffusion::floyd_steinberg(pixels, scratch, out)),
		Quality::High => SCRATCH.with_borrow_mut(|scratch| diffusion::jarvis_judice_ninke(pixels, scratch, out)),
	}
}

/// Dithers an animation frame, reusing `prev_result` where the source did not change.
///
/// - no pixel changed: returns a copy of `prev_result`
/// - more than half changed: identical to [`dither_frame`]
/// - otherwise the changed region, grown by [`STABLE_DILATION_RADIUS`], is
///   taken from a full dither and everything else from `prev_result`
///
/// Like [`dither_frame`], the result is a buffer from the global [`FramePool`].
pub fn dither_frame_stable(
	pixels: &[u32],
	prev_pixels: &[u32],
	prev_result: &IndexedFrame,
	quality: Quality,
) -> IndexedFrame {
	dither_frame_stable_in(FramePool::global(), pixels, prev_pixels, prev_result, quality)
}

fn dither_frame_stable_in(
	pool: &FramePool,
	pixels: &[u32],
	prev_pixels: &[u32],
	prev_result: &IndexedFrame,
	quality: Quality,
) -> IndexedFrame {
	let mut changed = vec![false; FRAME_SIZE];
	let mut changed_count = 0usize;
	for (i, slot) in changed.iter_mut().enumerate() {
		if pixels.get(i) != prev_pixels.get(i) {
			*slot = true;
			changed_count += 1;
		}
	}

	if changed_count == 0 {
		let mut out = pool.acquire();
		out.as_bytes_mut().copy_from_slice(prev_result.as_bytes());
		return out;
	}
	if changed_count > FRAME_SIZE / 2 {
		return dither_frame_in(pool, pixels, quality);
	}

	// The full dither is scratch and goes back to the pool on drop.
	let mut full = pool.scoped();
	dither_into(pixels, quality, &mut full);

	let region = dilate(&changed, STABLE_DILATION_RADIUS);
	let mut out = pool.acquire();
	let sources = region.iter().zip(full.as_bytes()).zip(prev_result.as_bytes());
	for (slot, ((&keep_new, &fresh), &previous)) in out.as_bytes_mut().iter_mut().zip(sources) {
		*slot = if keep_new {
			fresh
		} else {
			previous
		};
	}
	out
}

/// Grows a tile mask by `radius` in every direction (square structuring element).
fn dilate(mask: &[bool], radius: usize) -> Vec<bool> {
	let mut horizontal = vec![false; FRAME_SIZE];
	for y in 0..FRAME_WIDTH {
		let row = y * FRAME_WIDTH;
		for x in 0..FRAME_WIDTH {
			if mask[row + x] {
				let lo = x.saturating_sub(radius);
				let hi = (x + radius).min(FRAME_WIDTH - 1);
				horizontal[row + lo..=row + hi].fill(true);
			}
		}
	}

	let mut grown = vec![false; FRAME_SIZE];
	for y in 0..FRAME_WIDTH {
		for x in 0..FRAME_WIDTH {
			if horizontal[y * FRAME_WIDTH + x] {
				let lo = y.saturating_sub(radius);
				let hi = (y + radius).min(FRAME_WIDTH - 1);
				for ty in lo..=hi {
					grown[ty * FRAME_WIDTH + x] = true;
				}
			}
		}
	}
	grown
}
