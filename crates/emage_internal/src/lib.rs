//! This module is separated into its own crate to enable simple dynamic linking for `emage-rs`, and should not be used directly.

/// `use emage_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export emage_types for convenience
pub use emage_types;

// Re-export commonly used types at crate root
pub use emage_types::codec::{
	AnimatedGrid, GridDocument, StaticGrid, decode_animated_grid, decode_single,
	decode_static_grid, encode_animated_grid, encode_single, encode_static_grid,
};
pub use emage_types::dither::{Quality, dither_frame, dither_frame_stable};
pub use emage_types::error::EmageError;
pub use emage_types::frame::{AnimatedCell, FRAME_SIZE, FRAME_WIDTH, IndexedFrame};
pub use emage_types::gif::{GifAnimation, GifDecodeOptions};
pub use emage_types::grid::{GridLayout, animation_to_grid, image_to_grid};
pub use emage_types::settings::Settings;
