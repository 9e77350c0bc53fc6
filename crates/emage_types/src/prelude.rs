//! Prelude module for `emage_types`.
//!
//! This module provides a convenient way to import commonly used types, functions, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use emage_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let frame = IndexedFrame::blank();
//! let layout = GridLayout::SINGLE;
//! ```

// Codec
#[doc(inline)]
pub use crate::codec::{
	AnimatedGrid, Format, GridDocument, Header, StaticGrid, decode_animated_grid, decode_animated_grid_lossy,
	decode_single, decode_static_grid, encode_animated_grid, encode_single, encode_static_grid, peek_cell_ids,
	try_decode_single,
};

// Dithering
#[doc(inline)]
pub use crate::dither::{Quality, dither_frame, dither_frame_stable};

// Errors
#[doc(inline)]
pub use crate::error::{CodecError, EmageError, FrameError, GifError, SettingsError, Stage};

// Frames
#[doc(inline)]
pub use crate::frame::{AnimatedCell, FRAME_SIZE, FRAME_WIDTH, IndexedFrame};

// GIF
#[doc(inline)]
pub use crate::gif::{GifAnimation, GifDecodeOptions};

// Grids
#[doc(inline)]
pub use crate::grid::{GridLayout, animation_to_grid, image_to_grid};

// Palette
#[doc(inline)]
pub use crate::palette::{Color, TRANSPARENT_INDEX, match_color, palette_rgb};

// Pool
#[doc(inline)]
pub use crate::pool::{FramePool, ScopedFrame};

// Settings
#[doc(inline)]
pub use crate::settings::Settings;
