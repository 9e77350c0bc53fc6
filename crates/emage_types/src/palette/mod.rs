//! Palette colour matching.
//!
//! Maps arbitrary 24-bit colours onto the fixed map palette. Matching is done
//! perceptually: colours are converted to CIE Lab and compared with CIEDE2000,
//! with a cheap squared-Euclidean Lab pass pruning the candidate set first.
//!
//! Exact matching costs a few hundred distance evaluations per colour, so bulk
//! work goes through a [`QuantizationCache`]. The process-wide cache is built
//! once by [`init_cache`]; until it is ready, [`match_color`] transparently
//! falls back to the exact path.
//!
//! # Examples
//!
//! ```
//! use emage_types::palette::{self, TRANSPARENT_INDEX};
//!
//! let index = palette::match_color(255, 0, 0);
//! assert!(index >= palette::FIRST_VALID_INDEX);
//! assert_ne!(index, TRANSPARENT_INDEX);
//! ```

mod cache;
mod lab;
mod table;

use std::fmt;
use std::sync::{LazyLock, OnceLock};

pub use cache::QuantizationCache;
pub use lab::Lab;

/// Number of palette entries
pub const PALETTE_SIZE: usize = 256;

/// Index written for transparent pixels
pub const TRANSPARENT_INDEX: u8 = 0;

/// Indices below this render as transparent and are never matched
pub const FIRST_VALID_INDEX: u8 = 4;

/// Matching stops before this index; the entries above are unused
pub const MAX_VALID_INDEX: u8 = 220;

/// Multiplier of the best Euclidean Lab distance when pruning candidates
pub const PRUNE_FACTOR: f64 = 6.0;

/// Offset added to the pruning threshold
pub const PRUNE_OFFSET: f64 = 200.0;

/// A CIEDE2000 distance below this ends the search early
const EXACT_MATCH_EPSILON: f64 = 0.001;

/// Resolution of the delinearization table in bits
const DELINEARIZE_BITS: u32 = 14;
const DELINEARIZE_SIZE: usize = 1 << DELINEARIZE_BITS;

/// An sRGB palette colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
}

impl Color {
	/// Creates a new colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self {
			r,
			g,
			b,
		}
	}

	/// Packs the colour as `0xAARRGGBB` with the given alpha.
	pub const fn to_argb(&self, alpha: u8) -> u32 {
		((alpha as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
	}
}

static LINEAR_TABLE: LazyLock<[f64; 256]> = LazyLock::new(|| {
	std::array::from_fn(|i| {
		let c = i as f64 / 255.0;
		if c <= 0.04045 {
			c / 12.92
		} else {
			((c + 0.055) / 1.055).powf(2.4)
		}
	})
});

static DELINEARIZE_TABLE: LazyLock<Box<[u8]>> = LazyLock::new(|| {
	(0..=DELINEARIZE_SIZE)
		.map(|i| {
			let linear = i as f64 / DELINEARIZE_SIZE as f64;
			let srgb = if linear <= 0.0031308 {
				linear * 12.92
			} else {
				1.055 * linear.powf(1.0 / 2.4) - 0.055
			};
			(srgb * 255.0).round().clamp(0.0, 255.0) as u8
		})
		.collect()
});

static PALETTE_LAB: LazyLock<[Lab; PALETTE_SIZE]> = LazyLock::new(|| {
	std::array::from_fn(|i| {
		let c = table::PALETTE[i];
		Lab::from_srgb(c.r, c.g, c.b)
	})
});

static PALETTE_LINEAR: LazyLock<[[f64; 3]; PALETTE_SIZE]> = LazyLock::new(|| {
	std::array::from_fn(|i| {
		let c = table::PALETTE[i];
		[linearize(c.r), linearize(c.g), linearize(c.b)]
	})
});

static GLOBAL_CACHE: OnceLock<QuantizationCache> = OnceLock::new();

/// Returns the sRGB colour of a palette index.
#[inline]
pub fn palette_rgb(index: u8) -> Color {
	table::PALETTE[index as usize]
}

/// Returns `true` for indices that render as transparent.
#[inline]
pub fn is_transparent(index: u8) -> bool {
	index < FIRST_VALID_INDEX
}

/// Converts an sRGB byte to linear light in `[0, 1]`.
#[inline]
pub fn linearize(srgb: u8) -> f64 {
	LINEAR_TABLE[srgb as usize]
}

/// Converts linear light back to an sRGB byte, clamping out-of-range input.
#[inline]
pub fn delinearize(linear: f64) -> u8 {
	if linear <= 0.0 {
		return 0;
	}
	if linear >= 1.0 {
		return 255;
	}
	DELINEARIZE_TABLE[(linear * DELINEARIZE_SIZE as f64 + 0.5) as usize]
}

/// Returns the linear-light RGB of a palette index.
#[inline]
pub fn linear_rgb(index: u8) -> [f64; 3] {
	PALETTE_LINEAR[index as usize]
}

/// Finds the perceptually closest palette index without touching the cache.
///
/// Only indices in `FIRST_VALID_INDEX..MAX_VALID_INDEX` are candidates. The
/// result falls back to [`FIRST_VALID_INDEX`] if nothing scores lower.
pub fn find_closest_color(r: u8, g: u8, b: u8) -> u8 {
	let target = Lab::from_srgb(r, g, b);
	let candidates = &PALETTE_LAB[FIRST_VALID_INDEX as usize..MAX_VALID_INDEX as usize];

	let best_euclidean = candidates.iter().map(|lab| target.distance_squared(lab)).fold(f64::MAX, f64::min);
	let threshold = best_euclidean * PRUNE_FACTOR + PRUNE_OFFSET;

	let mut best_index = FIRST_VALID_INDEX;
	let mut best_distance = f64::MAX;

	for (offset, lab) in candidates.iter().enumerate() {
		if target.distance_squared(lab) > threshold {
			continue;
		}

		let distance = target.ciede2000(lab);
		if distance < best_distance {
			best_distance = distance;
			best_index = FIRST_VALID_INDEX + offset as u8;
			if distance < EXACT_MATCH_EPSILON {
				break;
			}
		}
	}

	best_index
}

/// Matches a colour to the palette.
///
/// Channels are clamped to `0..=255`. Uses the process-wide cache when it is
/// ready and the exact search otherwise.
#[inline]
pub fn match_color(r: i32, g: i32, b: i32) -> u8 {
	let r = r.clamp(0, 255) as u8;
	let g = g.clamp(0, 255) as u8;
	let b = b.clamp(0, 255) as u8;

	match GLOBAL_CACHE.get() {
		Some(cache) => cache.lookup(r, g, b),
		None => find_closest_color(r, g, b),
	}
}

/// Builds the process-wide cache at the default resolution.
///
/// Concurrent callers block until the first build completes.
pub fn init_cache() -> &'static QuantizationCache {
	init_cache_with_bits(QuantizationCache::DEFAULT_BITS)
}

/// Builds the process-wide cache with `bits` bits per channel.
///
/// Only the first call builds; later calls return the existing cache regardless of `bits`.
pub fn init_cache_with_bits(bits: u8) -> &'static QuantizationCache {
	GLOBAL_CACHE.get_or_init(|| QuantizationCache::build(bits))
}

/// Returns `true` once the process-wide cache has been built.
pub fn is_cache_ready() -> bool {
	GLOBAL_CACHE.get().is_some()
}

/// Returns the process-wide cache if it has been built.
pub fn cache() -> Option<&'static QuantizationCache> {
	GLOBAL_CACHE.get()
}
