//! Emage block CLI utility
//!
//! A command-line tool for turning pictures into tile grids and looking inside
//! the resulting blocks.
//!
//! # Features
//!
//! - **convert**: Dither an image or GIF into an `EGS` / `EGA` block
//! - **inspect**: Print the header of a block
//! - **render**: Draw the tiles of a block into a PNG contact sheet
//! - **settings**: Print the effective settings
//!
//! # Usage
//!
//! ```bash
//! # Convert a picture into a 2x2 static grid
//! cargo run --example emage_utils convert poster.png poster.egs --columns 2 --rows 2
//!
//! # Convert an animated GIF, overriding the dither quality
//! cargo run --example emage_utils convert clip.gif clip.ega --quality fast
//!
//! # Show a block header
//! cargo run --example emage_utils inspect clip.ega
//!
//! # Render frame 3 of every cell into a PNG
//! cargo run --example emage_utils render clip.ega sheet.png --frame 3
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use emage_rs::emage_types::codec::{Header, peek_cell_ids};
use emage_rs::emage_types::gif as emage_gif;
use emage_rs::emage_types::palette::is_transparent;
use emage_rs::prelude::*;
use image::{Rgba, RgbaImage};
use log::{error, info};

#[derive(Parser)]
#[command(name = "emage_utils")]
#[command(author = "emage-rs project")]
#[command(version = "1.0")]
#[command(about = "Emage block utility - convert, inspect and render tile grids", long_about = None)]
struct Cli {
	/// Settings file (TOML); `EMAGE__*` environment variables apply on top
	#[arg(short, long, global = true, value_name = "CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Dither an image or GIF into a grid block
	Convert {
		/// Input image or GIF path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output block path
		#[arg(value_name = "OUTPUT")]
		output: PathBuf,

		/// Tiles per row
		#[arg(long, default_value_t = 1)]
		columns: u32,

		/// Tiles per column
		#[arg(long, default_value_t = 1)]
		rows: u32,

		/// Dither quality (fast, balanced, high); defaults to the settings
		#[arg(short, long)]
		quality: Option<Quality>,

		/// Grid or sync id; defaults to the current time in milliseconds
		#[arg(long)]
		id: Option<i64>,

		/// Id of the top-left cell
		#[arg(long, default_value_t = 0)]
		first_cell: i32,
	},

	/// Print the header of a block
	Inspect {
		/// Block path
		#[arg(value_name = "INPUT")]
		input: PathBuf,
	},

	/// Render a block into a PNG contact sheet
	Render {
		/// Block path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output PNG path
		#[arg(value_name = "OUTPUT_PNG")]
		output: PathBuf,

		/// Cells per row of the sheet
		#[arg(long, default_value_t = 8)]
		columns: u32,

		/// Frame of animated cells to draw
		#[arg(long, default_value_t = 0)]
		frame: usize,
	},

	/// Print the effective settings as JSON
	Settings,
}

fn now_millis() -> i64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as i64)
}

/// Converts a tile back to RGBA using the global palette.
fn frame_to_rgba(frame: &IndexedFrame) -> RgbaImage {
	let width = FRAME_WIDTH as u32;
	RgbaImage::from_fn(width, width, |x, y| {
		let index = frame.get(x as usize, y as usize);
		if is_transparent(index) {
			Rgba([0, 0, 0, 0])
		} else {
			let color = palette_rgb(index);
			Rgba([color.r, color.g, color.b, 255])
		}
	})
}

/// Finds the pipeline stage behind a failure, if a library error caused it.
fn failed_stage(err: &anyhow::Error) -> Option<Stage> {
	err.chain().find_map(|cause| cause.downcast_ref::<EmageError>()).map(EmageError::stage)
}

/// Encodes a static grid and recycles its tiles.
fn encode_static(grid: StaticGrid) -> Result<Vec<u8>, EmageError> {
	let blob = grid.encode()?;
	FramePool::global().release_all(grid.cells.into_values());
	Ok(blob)
}

/// Encodes an animated grid and recycles its tiles.
fn encode_animated(grid: AnimatedGrid) -> Result<Vec<u8>, EmageError> {
	let blob = grid.encode()?;
	FramePool::global().release_all(grid.cells.into_values().flatten());
	Ok(blob)
}

fn is_gif(path: &Path, data: &[u8]) -> bool {
	data.starts_with(b"GIF8") || path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}

fn handle_convert(
	settings: &Settings,
	input: &Path,
	output: &Path,
	layout: GridLayout,
	quality: Quality,
	id: i64,
	first_cell: i32,
) -> Result<()> {
	let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
	let start = Instant::now();

	let blob = if is_gif(input, &data) {
		let animation = emage_gif::decode(&data, &settings.gif_options())
			.map_err(EmageError::from)
			.with_context(|| format!("Failed to decode GIF {}", input.display()))?;
		info!(
			"Decoded {}x{} GIF with {} frames, average delay {} ms",
			animation.width,
			animation.height,
			animation.frame_count(),
			animation.average_delay()
		);

		if animation.is_animated() {
			encode_animated(animation_to_grid(&animation, layout, quality, id, first_cell))?
		} else {
			encode_static(image_to_grid(&animation.frames[0], layout, quality, id, first_cell))?
		}
	} else {
		let image = image::load_from_memory(&data)
			.with_context(|| format!("Failed to decode image {}", input.display()))?
			.to_rgba8();
		info!("Loaded {}x{} image", image.width(), image.height());
		encode_static(image_to_grid(&image, layout, quality, id, first_cell))?
	};

	fs::write(output, &blob).with_context(|| format!("Failed to write {}", output.display()))?;
	info!(
		"Wrote {} ({} bytes, {} tiles, {quality}) in {:?}",
		output.display(),
		blob.len(),
		layout.cell_count(),
		start.elapsed()
	);
	Ok(())
}

fn handle_inspect(input: &Path) -> Result<()> {
	let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
	let header = Header::from_bytes(&data)
		.map_err(EmageError::from)
		.with_context(|| format!("Not an emage block: {}", input.display()))?;

	println!("{header}");
	let ids = peek_cell_ids(&data).map_err(EmageError::from)?;
	if !ids.is_empty() {
		let ids: Vec<String> = ids.iter().map(i32::to_string).collect();
		println!("- Cell ids: {}", ids.join(", "));
	}
	if !header.delays.is_empty() {
		let delays: Vec<String> = header.delays.iter().map(u32::to_string).collect();
		println!("- Delays: {} ms", delays.join(", "));
	}
	println!("- Block size: {} bytes ({} bytes unpacked)", data.len(), header.total_frames() * FRAME_SIZE);
	Ok(())
}

fn handle_render(input: &Path, output: &Path, columns: u32, frame: usize) -> Result<()> {
	if columns == 0 {
		bail!("--columns must be at least 1");
	}
	let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

	let tiles: Vec<IndexedFrame> = match GridDocument::decode(&data).map_err(EmageError::from)? {
		GridDocument::Single(tile) => vec![tile],
		GridDocument::Static(grid) => grid.cells.into_values().collect(),
		GridDocument::Animated(grid) => {
			if frame >= grid.frame_count() {
				bail!("Frame {frame} out of range, the block has {} frames", grid.frame_count());
			}
			grid.cells.into_values().map(|mut frames| frames.swap_remove(frame)).collect()
		}
	};

	let tile = FRAME_WIDTH as u32;
	let sheet_columns = columns.min(tiles.len() as u32);
	let sheet_rows = (tiles.len() as u32).div_ceil(sheet_columns);
	let mut sheet = RgbaImage::new(sheet_columns * tile, sheet_rows * tile);
	for (i, frame) in tiles.iter().enumerate() {
		let i = i as u32;
		image::imageops::replace(
			&mut sheet,
			&frame_to_rgba(frame),
			i64::from(i % sheet_columns * tile),
			i64::from(i / sheet_columns * tile),
		);
	}

	sheet.save(output).with_context(|| format!("Failed to write {}", output.display()))?;
	info!("Rendered {} tiles to {}", tiles.len(), output.display());
	Ok(())
}

fn run(cli: Cli) -> Result<()> {
	let settings =
		Settings::load(cli.config.as_deref()).map_err(EmageError::from).context("Failed to load settings")?;
	settings.apply();

	match cli.command {
		Commands::Convert {
			input,
			output,
			columns,
			rows,
			quality,
			id,
			first_cell,
		} => {
			let layout = GridLayout::new(columns, rows).map_err(EmageError::from)?;
			let quality = quality.unwrap_or(settings.dither.quality);
			settings.init_palette_cache();

			handle_convert(&settings, &input, &output, layout, quality, id.unwrap_or_else(now_millis), first_cell)
		}
		Commands::Inspect {
			input,
		} => handle_inspect(&input),
		Commands::Render {
			input,
			output,
			columns,
			frame,
		} => handle_render(&input, &output, columns, frame),
		Commands::Settings => {
			println!("{}", serde_json::to_string_pretty(&settings)?);
			Ok(())
		}
	}
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	run(Cli::parse()).inspect_err(|err| {
		if let Some(stage) = failed_stage(err) {
			error!("Failed in the {stage} stage");
		}
	})
}
