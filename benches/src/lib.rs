//! Benchmark helper utilities for emage-rs
//!
//! This module provides generators for synthetic tiles and grids. Everything
//! is deterministic so runs are comparable.

use std::collections::BTreeMap;

use emage_types::frame::{FRAME_SIZE, FRAME_WIDTH, IndexedFrame};

/// Generates an ARGB tile: a diagonal colour gradient with a transparent corner.
pub fn gradient_tile(seed: u32) -> Vec<u32> {
	(0..FRAME_SIZE as u32)
		.map(|i| {
			let x = i % FRAME_WIDTH as u32;
			let y = i / FRAME_WIDTH as u32;
			if x + y < 16 {
				return 0;
			}
			let r = (x * 2 + seed) & 0xFF;
			let g = (y * 2 + seed * 3) & 0xFF;
			let b = ((x + y) + seed * 7) & 0xFF;
			0xFF00_0000 | (r << 16) | (g << 8) | b
		})
		.collect()
}

/// Generates an indexed tile using `colors` distinct palette indices.
pub fn indexed_tile(colors: u8, seed: u64) -> IndexedFrame {
	let colors = colors.max(1);
	let mut state = seed | 1;
	let pixels = (0..FRAME_SIZE)
		.map(|i| {
			// Blocks of 8 pixels share a colour, like dithered regions do.
			if i % 8 == 0 {
				state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
			}
			4 + ((state >> 33) % u64::from(colors)) as u8
		})
		.collect();
	IndexedFrame::from_vec(pixels).unwrap_or_default()
}

/// Generates a static grid of `cells` tiles where neighbours differ in a few pixels.
pub fn static_cells(cells: usize, colors: u8) -> BTreeMap<i32, IndexedFrame> {
	let base = indexed_tile(colors, 42);
	(0..cells)
		.map(|c| {
			let mut frame = base.clone();
			for i in 0..c * 16 {
				frame.as_bytes_mut()[(i * 97) % FRAME_SIZE] = 4;
			}
			(c as i32, frame)
		})
		.collect()
}

/// Generates an animated grid where a small square moves across every tile.
pub fn animated_cells(cells: usize, frames: usize, colors: u8) -> BTreeMap<i32, Vec<IndexedFrame>> {
	let base = indexed_tile(colors, 7);
	(0..cells)
		.map(|c| {
			let sequence = (0..frames)
				.map(|f| {
					let mut frame = base.clone();
					let offset = (f * 4 + c) % (FRAME_WIDTH - 8);
					for y in 0..8 {
						for x in 0..8 {
							frame.set(offset + x, offset + y, 5);
						}
					}
					frame
				})
				.collect();
			(c as i32, sequence)
		})
		.collect()
}

/// Common grid shapes
pub mod shapes {
	/// One tile
	pub const SINGLE: usize = 1;
	/// A 2x2 poster
	pub const SMALL: usize = 4;
	/// A 4x4 wall
	pub const WALL: usize = 16;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_gradient_tile() {
		let tile = gradient_tile(0);
		assert_eq!(tile.len(), FRAME_SIZE);
		assert_eq!(tile[0], 0);
		assert_eq!(tile[FRAME_SIZE - 1] >> 24, 0xFF);
	}

	#[test]
	fn test_indexed_tile_colors() {
		let tile = indexed_tile(3, 1);
		assert!(tile.as_bytes().iter().all(|&p| (4..7).contains(&p)));
	}

	#[test]
	fn test_generated_grids() {
		assert_eq!(static_cells(shapes::WALL, 8).len(), 16);

		let cells = animated_cells(shapes::SMALL, 5, 8);
		assert_eq!(cells.len(), 4);
		assert!(cells.values().all(|frames| frames.len() == 5));
	}
}
