//! Quantization cache: a precomputed RGB → palette index table.

use std::time::Instant;

use log::info;
use rayon::prelude::*;

use super::find_closest_color;

/// Lookup table over a down-sampled RGB cube.
///
/// Each channel is reduced to `bits` bits, giving `(2^bits)^3` cells. Every cell
/// stores the exact perceptual match for the colour at that cell, so lookups
/// are a shift and an index.
pub struct QuantizationCache {
	bits: u8,
	table: Box<[u8]>,
}

impl QuantizationCache {
	/// Bits per channel used by the process-wide cache
	pub const DEFAULT_BITS: u8 = 8;

	/// Smallest supported resolution
	pub const MIN_BITS: u8 = 4;

	/// Largest supported resolution
	pub const MAX_BITS: u8 = 8;

	/// Builds a cache with `bits` bits per channel (clamped to 4..=8).
	///
	/// Cells are computed in parallel on the rayon pool, one red plane per task.
	pub fn build(bits: u8) -> Self {
		let bits = bits.clamp(Self::MIN_BITS, Self::MAX_BITS);
		let levels = 1usize << bits;
		let started = Instant::now();

		let mut table = vec![0u8; levels * levels * levels].into_boxed_slice();
		table.par_chunks_mut(levels * levels).enumerate().for_each(|(r, plane)| {
			let r8 = expand(r, bits);
			for g in 0..levels {
				let g8 = expand(g, bits);
				let row = &mut plane[g * levels..(g + 1) * levels];
				for (b, slot) in row.iter_mut().enumerate() {
					*slot = find_closest_color(r8, g8, expand(b, bits));
				}
			}
		});

		info!(
			"Built {}-bit palette cache ({} cells) in {:.2?}",
			bits,
			table.len(),
			started.elapsed()
		);

		Self {
			bits,
			table,
		}
	}

	/// Returns the per-channel resolution.
	pub fn bits(&self) -> u8 {
		self.bits
	}

	/// Returns the number of cells.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	/// Returns `true` if the cache has no cells (never the case once built).
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Looks up the palette index for an sRGB colour.
	#[inline]
	pub fn lookup(&self, r: u8, g: u8, b: u8) -> u8 {
		let shift = 8 - self.bits;
		let bits = self.bits as usize;
		let index = ((r as usize >> shift) << (bits * 2)) | ((g as usize >> shift) << bits) | (b as usize >> shift);
		self.table[index]
	}

	/// Returns the representative sRGB value of a down-sampled channel level.
	pub fn cell_value(&self, level: usize) -> u8 {
		expand(level, self.bits)
	}
}

impl std::fmt::Debug for QuantizationCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QuantizationCache").field("bits", &self.bits).field("cells", &self.table.len()).finish()
	}
}

/// Expands a `bits`-bit level back to 8 bits by bit replication.
#[inline]
fn expand(level: usize, bits: u8) -> u8 {
	let shift = 8 - bits as usize;
	((level << shift) | (level >> (bits as usize - shift))) as u8
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::palette::{Lab, palette_rgb};

	#[test]
	fn test_expand_replicates_bits() {
		assert_eq!(expand(0, 4), 0);
		assert_eq!(expand(15, 4), 255);
		assert_eq!(expand(0b1010, 4), 0b1010_1010);
		assert_eq!(expand(200, 8), 200);
		assert_eq!(expand(31, 5), 255);
	}

	#[test]
	fn test_cache_agrees_on_cell_colors() {
		let cache = QuantizationCache::build(4);
		assert_eq!(cache.len(), 4096);

		for level in 0..16 {
			let v = cache.cell_value(level);
			assert_eq!(cache.lookup(v, 0, 0), find_closest_color(v, 0, 0));
			assert_eq!(cache.lookup(0, v, 255), find_closest_color(0, v, 255));
			assert_eq!(cache.lookup(v, v, v), find_closest_color(v, v, v));
		}
	}

	#[test]
	fn test_off_center_error_is_bounded() {
		let cache = QuantizationCache::build(5);

		for (r, g, b) in [(13u8, 77u8, 201u8), (250, 3, 128), (99, 99, 100), (180, 140, 20)] {
			let cached = cache.lookup(r, g, b);
			let exact = find_closest_color(r, g, b);
			if cached == exact {
				continue;
			}

			// The cached entry was chosen for a colour at most 7 levels away per
			// channel, so it cannot be drastically worse than the exact match.
			let source = Lab::from_srgb(r, g, b);
			let cached_color = palette_rgb(cached);
			let exact_color = palette_rgb(exact);
			let cached_delta =
				source.ciede2000(&Lab::from_srgb(cached_color.r, cached_color.g, cached_color.b)).sqrt();
			let exact_delta = source.ciede2000(&Lab::from_srgb(exact_color.r, exact_color.g, exact_color.b)).sqrt();
			assert!(cached_delta - exact_delta < 10.0, "{cached_delta} vs {exact_delta}");
		}
	}
}
