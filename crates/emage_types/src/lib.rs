//! Core types and algorithms for the `emage-rs` project.
//!
//! # Modules
//!
//! - **palette**: the fixed 256-entry palette and perceptual (CIEDE2000) colour matching
//! - **dither**: turning ARGB tiles into palette indices, including temporally stable dithering
//! - **gif**: GIF decoding into fully composited canvases with resource limits
//! - **codec**: the `EM1` / `EGS` / `EGA` block formats (and legacy `EM0` on read)
//! - **grid**: cutting images and animations into dithered tile grids
//! - **pool**: reusable tile buffers
//! - **settings**: TOML / environment configuration
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use emage_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = image::open("poster.png")?.to_rgba8();
//! let layout = GridLayout::new(2, 2)?;
//!
//! let grid = image_to_grid(&image, layout, Quality::Balanced, 1_700_000_000_000, 0);
//! let blob = grid.encode()?;
//! assert_eq!(decode_static_grid(&blob)?, grid);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use emage_types::codec::{decode_single, encode_single};
//! use emage_types::frame::IndexedFrame;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = IndexedFrame::filled(34);
//! let blob = encode_single(&frame)?;
//! assert_eq!(decode_single(&blob), frame);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod dither;
pub mod error;
pub mod frame;
pub mod gif;
pub mod grid;
pub mod palette;
pub mod pool;
pub mod settings;

/// `use emage_types::prelude::*;` to import commonly used items.
pub mod prelude;
