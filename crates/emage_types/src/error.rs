//! Error types for quantization, GIF decoding and the frame codec.

use std::fmt::Display;

use thiserror::Error;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Indexed frame construction
	Frame,
	/// GIF decoding
	Gif,
	/// Frame codec (`EM*` / `EG*` blocks)
	Codec,
	/// Settings loading
	Settings,
}

impl Display for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Stage::Frame => write!(f, "frame"),
			Stage::Gif => write!(f, "gif"),
			Stage::Codec => write!(f, "codec"),
			Stage::Settings => write!(f, "settings"),
		}
	}
}

/// Errors that can occur when wrapping raw bytes into an indexed frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
	/// Buffer is not exactly one tile
	#[error("Invalid frame size: expected {expected} bytes, got {actual} bytes")]
	InvalidSize {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},
}

/// Errors that can occur when decoding GIF streams
#[derive(Debug, Error)]
pub enum GifError {
	/// Logical screen larger than the hard ceiling
	#[error("GIF dimensions too large: {width}x{height} (max {max}x{max})")]
	CanvasTooLarge {
		/// Logical screen width
		width: u16,
		/// Logical screen height
		height: u16,
		/// Maximum accepted dimension
		max: u16,
	},

	/// A single canvas would eat too much of the decode budget
	#[error("GIF canvas too large: requires {required} bytes per frame, budget is {budget} bytes")]
	CanvasExceedsBudget {
		/// Bytes needed for one canvas
		required: u64,
		/// Total decode budget in bytes
		budget: u64,
	},

	/// The stream produced no frames at all
	#[error("No frames could be decoded from GIF")]
	NoFrames,

	/// Malformed GIF data
	#[error(transparent)]
	Decode(#[from] gif::DecodingError),
}

/// Errors that can occur when encoding or decoding frame blocks
#[derive(Debug, Error)]
pub enum CodecError {
	/// Not enough data to parse
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Unknown magic bytes
	#[error("Invalid magic bytes: {0:02X?}")]
	InvalidMagic([u8; 3]),

	/// Bit depth other than 1, 2, 4 or 8
	#[error("Unsupported bits per pixel: {0}")]
	UnsupportedBitDepth(u8),

	/// Nothing to encode
	#[error("Cannot encode an empty grid")]
	EmptyGrid,

	/// Cell count does not fit the header
	#[error("Too many cells: {0} (max {max})", max = u16::MAX)]
	TooManyCells(usize),

	/// Frame count does not fit the header
	#[error("Too many frames: {0} (max {max})", max = u16::MAX)]
	TooManyFrames(usize),

	/// Animated cells must play back in lockstep
	#[error("Cell {cell_id} has {actual} frames, expected {expected}")]
	FrameCountMismatch {
		/// Offending cell identifier
		cell_id: i32,
		/// Frame count of the first cell
		expected: usize,
		/// Frame count of the offending cell
		actual: usize,
	},

	/// One delay per frame is required
	#[error("Delay count mismatch: expected {expected} delays, got {actual}")]
	DelayCountMismatch {
		/// Number of frames
		expected: usize,
		/// Number of delays supplied
		actual: usize,
	},

	/// A record in the payload could not be reconstructed
	#[error("Corrupt record {index}: {reason}")]
	CorruptRecord {
		/// Position of the record in the stream
		index: usize,
		/// What went wrong
		reason: String,
	},

	/// Inflated payload length does not match the header
	#[error("Decompression failed: expected {expected} bytes, got {actual} bytes")]
	Decompression {
		/// Length declared in the header
		expected: usize,
		/// Length actually produced
		actual: usize,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors that can occur when loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
	/// Source could not be read or deserialized
	#[error(transparent)]
	Config(#[from] config::ConfigError),

	/// Value outside its accepted range
	#[error("Invalid setting `{key}`: {message}")]
	InvalidValue {
		/// Dotted key of the setting
		key: &'static str,
		/// Why the value was rejected
		message: String,
	},
}

/// Unified error type for every stage of the pipeline
#[derive(Debug, Error)]
pub enum EmageError {
	/// Frame construction error
	#[error(transparent)]
	Frame(#[from] FrameError),

	/// GIF decoding error
	#[error(transparent)]
	Gif(#[from] GifError),

	/// Codec error
	#[error(transparent)]
	Codec(#[from] CodecError),

	/// Settings error
	#[error(transparent)]
	Settings(#[from] SettingsError),
}

impl EmageError {
	/// Returns the stage the error originated from
	pub fn stage(&self) -> Stage {
		match self {
			EmageError::Frame(_) => Stage::Frame,
			EmageError::Gif(_) => Stage::Gif,
			EmageError::Codec(_) => Stage::Codec,
			EmageError::Settings(_) => Stage::Settings,
		}
	}
}
