//! Turning whole pictures into grids of dithered tiles.
//!
//! A source image is scaled to exactly `columns × rows` tiles and cut into
//! 128×128 pieces in row-major order. Tile `i` becomes cell `first_cell_id + i`.
//!
//! | Source          | Result                                                           |
//! |-----------------|------------------------------------------------------------------|
//! | still image     | [`StaticGrid`], one frame per tile                               |
//! | [`GifAnimation`] | [`AnimatedGrid`], one frame sequence per tile, shared delays    |
//!
//! Tiles are dithered in parallel. Within one animated tile, frames are
//! dithered in order with [`dither_frame_stable`] against the tile's previous
//! frame, so unchanged areas keep their exact indices.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Instant;

use image::{
	RgbaImage,
	imageops::{self, FilterType},
};
use log::debug;
use rayon::prelude::*;

use crate::codec::{AnimatedGrid, StaticGrid};
use crate::dither::{Quality, dither_frame, dither_frame_stable};
use crate::error::CodecError;
use crate::frame::{FRAME_SIZE, FRAME_WIDTH, IndexedFrame, clamp_delay};
use crate::gif::GifAnimation;

/// Tile arrangement of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridLayout {
	columns: u32,
	rows: u32,
}

impl GridLayout {
	/// A single tile
	pub const SINGLE: GridLayout = GridLayout {
		columns: 1,
		rows: 1,
	};

	/// Creates a layout of `columns × rows` tiles.
	///
	/// # Errors
	///
	/// [`CodecError::EmptyGrid`] if either side is zero, [`CodecError::TooManyCells`]
	/// if the grid would not fit a block header.
	pub fn new(columns: u32, rows: u32) -> Result<Self, CodecError> {
		let cells = columns as usize * rows as usize;
		if cells == 0 {
			return Err(CodecError::EmptyGrid);
		}
		if cells > u16::MAX as usize {
			return Err(CodecError::TooManyCells(cells));
		}
		Ok(Self {
			columns,
			rows,
		})
	}

	/// Tiles per row
	pub fn columns(&self) -> u32 {
		self.columns
	}

	/// Tiles per column
	pub fn rows(&self) -> u32 {
		self.rows
	}

	/// Total number of tiles
	pub fn cell_count(&self) -> usize {
		self.columns as usize * self.rows as usize
	}

	/// Size in pixels the source is scaled to
	pub fn pixel_size(&self) -> (u32, u32) {
		(self.columns * FRAME_WIDTH as u32, self.rows * FRAME_WIDTH as u32)
	}
}

impl Display for GridLayout {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}", self.columns, self.rows)
	}
}

/// Packs an RGBA pixel as `0xAARRGGBB`.
#[inline]
pub fn to_argb(pixel: image::Rgba<u8>) -> u32 {
	let [r, g, b, a] = pixel.0;
	(u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Scales `image` to the layout and cuts it into ARGB tiles, row-major.
pub fn split_tiles(image: &RgbaImage, layout: GridLayout) -> Vec<Vec<u32>> {
	let (width, height) = layout.pixel_size();
	let scaled;
	let source = if image.dimensions() == (width, height) {
		image
	} else {
		scaled = imageops::resize(image, width, height, FilterType::Triangle);
		&scaled
	};

	let tile = FRAME_WIDTH as u32;
	(0..layout.rows)
		.flat_map(|row| (0..layout.columns).map(move |column| (column, row)))
		.map(|(column, row)| {
			let piece = imageops::crop_imm(source, column * tile, row * tile, tile, tile).to_image();
			piece.pixels().map(|&pixel| to_argb(pixel)).collect()
		})
		.collect()
}

/// Dithers every tile of a still image.
pub fn dither_image(image: &RgbaImage, layout: GridLayout, quality: Quality) -> Vec<IndexedFrame> {
	let start = Instant::now();
	let frames: Vec<IndexedFrame> =
		split_tiles(image, layout).par_iter().map(|tile| dither_frame(tile, quality)).collect();

	debug!("Dithered {} tiles ({layout}, {quality}) in {:?}", frames.len(), start.elapsed());
	frames
}

/// Dithers every frame of every tile of an animation.
///
/// Returns one frame sequence per tile, row-major.
pub fn dither_animation(animation: &GifAnimation, layout: GridLayout, quality: Quality) -> Vec<Vec<IndexedFrame>> {
	let start = Instant::now();
	// [frame][tile]
	let tiles: Vec<Vec<Vec<u32>>> = animation.frames.par_iter().map(|frame| split_tiles(frame, layout)).collect();

	let sequences: Vec<Vec<IndexedFrame>> = (0..layout.cell_count())
		.into_par_iter()
		.map(|t| {
			let mut sequence: Vec<IndexedFrame> = Vec::with_capacity(tiles.len());
			for (f, frame_tiles) in tiles.iter().enumerate() {
				let pixels = &frame_tiles[t];
				let dithered = match sequence.last() {
					Some(previous) => dither_frame_stable(pixels, &tiles[f - 1][t], previous, quality),
					None => dither_frame(pixels, quality),
				};
				sequence.push(dithered);
			}
			sequence
		})
		.collect();

	debug!(
		"Dithered {} frames x {} tiles ({layout}, {quality}) in {:?}",
		animation.frame_count(),
		sequences.len(),
		start.elapsed()
	);
	sequences
}

/// Keys tiles by consecutive cell ids starting at `first_cell_id`.
fn number_cells<T>(tiles: Vec<T>, first_cell_id: i32) -> BTreeMap<i32, T> {
	tiles.into_iter().enumerate().map(|(i, tile)| (first_cell_id.wrapping_add(i as i32), tile)).collect()
}

/// Builds a static grid from a still image.
pub fn image_to_grid(
	image: &RgbaImage,
	layout: GridLayout,
	quality: Quality,
	grid_id: i64,
	first_cell_id: i32,
) -> StaticGrid {
	StaticGrid::new(grid_id, number_cells(dither_image(image, layout, quality), first_cell_id))
}

/// Builds an animated grid from a decoded GIF.
///
/// Delays are clamped to the range a grid block can store.
pub fn animation_to_grid(
	animation: &GifAnimation,
	layout: GridLayout,
	quality: Quality,
	sync_id: i64,
	first_cell_id: i32,
) -> AnimatedGrid {
	AnimatedGrid {
		sync_id,
		cells: number_cells(dither_animation(animation, layout, quality), first_cell_id),
		delays: animation.delays.iter().copied().map(clamp_delay).collect(),
	}
}
