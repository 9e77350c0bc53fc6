//! Runtime settings.
//!
//! Settings are read from an optional TOML file and then from environment
//! variables prefixed with `EMAGE__`, using `__` between nested keys
//! (`EMAGE__GIF__MAX_FRAMES=50`). Missing keys keep their defaults.
//!
//! ```toml
//! [palette]
//! cache_bits = 8
//!
//! [dither]
//! quality = "balanced"
//!
//! [gif]
//! max_frames = 200
//! max_memory_mb = 256
//! max_canvas_dimension = 4096
//! min_frame_delay_ms = 20
//!
//! [pool]
//! enabled = true
//! capacity = 100
//! ```

use std::fmt::Display;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dither::Quality;
use crate::error::SettingsError;
use crate::frame::{MAX_FRAME_DELAY_MS, MIN_FRAME_DELAY_MS};
use crate::gif::{DEFAULT_MAX_FRAMES, GifDecodeOptions, MAX_CANVAS_DIMENSION};
use crate::palette::{self, QuantizationCache};
use crate::pool::{DEFAULT_POOL_CAPACITY, FramePool};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "EMAGE";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Palette cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
	/// Bits per channel of the quantization cache
	pub cache_bits: u8,
}

impl Default for PaletteSettings {
	fn default() -> Self {
		Self {
			cache_bits: QuantizationCache::DEFAULT_BITS,
		}
	}
}

/// Dithering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherSettings {
	/// Default strategy
	pub quality: Quality,
}

/// GIF decoding limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GifSettings {
	/// Stop after this many frames
	pub max_frames: usize,
	/// Decode budget in MiB
	pub max_memory_mb: u64,
	/// Largest accepted logical screen width or height
	pub max_canvas_dimension: u16,
	/// Floor applied to every frame delay
	pub min_frame_delay_ms: u32,
}

impl Default for GifSettings {
	fn default() -> Self {
		Self {
			max_frames: DEFAULT_MAX_FRAMES,
			max_memory_mb: 256,
			max_canvas_dimension: MAX_CANVAS_DIMENSION,
			min_frame_delay_ms: MIN_FRAME_DELAY_MS,
		}
	}
}

impl From<&GifSettings> for GifDecodeOptions {
	fn from(settings: &GifSettings) -> Self {
		Self {
			max_frames: settings.max_frames,
			memory_budget_bytes: settings.max_memory_mb.saturating_mul(1024 * 1024),
			max_canvas_dimension: settings.max_canvas_dimension,
			min_frame_delay_ms: settings.min_frame_delay_ms,
		}
	}
}

/// Frame buffer pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
	/// Recycle frame buffers
	pub enabled: bool,
	/// Buffers kept on the free list
	pub capacity: usize,
}

impl Default for PoolSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			capacity: DEFAULT_POOL_CAPACITY,
		}
	}
}

/// All settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Palette cache
	pub palette: PaletteSettings,
	/// Dithering
	pub dither: DitherSettings,
	/// GIF decoding
	pub gif: GifSettings,
	/// Frame pool
	pub pool: PoolSettings,
}

impl Settings {
	/// Loads settings from an optional TOML file, then the environment.
	///
	/// A path that is given must exist.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut builder = Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
		}
		builder = builder.add_source(Self::environment());

		let settings: Self = builder.build()?.try_deserialize()?;
		settings.validate()?;
		debug!("Loaded settings from {}: {settings:?}", path.map_or_else(|| String::from("environment"), |p| p.display().to_string()));
		Ok(settings)
	}

	/// Parses settings from TOML text, ignoring the environment.
	pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
		let settings: Self =
			Config::builder().add_source(File::from_str(text, FileFormat::Toml)).build()?.try_deserialize()?;
		settings.validate()?;
		Ok(settings)
	}

	fn environment() -> Environment {
		Environment::with_prefix(ENV_PREFIX).prefix_separator(ENV_SEPARATOR).separator(ENV_SEPARATOR).try_parsing(true)
	}

	/// Checks every value against its accepted range.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let bits = self.palette.cache_bits;
		if !(QuantizationCache::MIN_BITS..=QuantizationCache::MAX_BITS).contains(&bits) {
			return Err(invalid(
				"palette.cache_bits",
				format_args!(
					"{bits} is outside {}..={}",
					QuantizationCache::MIN_BITS,
					QuantizationCache::MAX_BITS
				),
			));
		}
		if self.gif.max_frames == 0 {
			return Err(invalid("gif.max_frames", "must be at least 1"));
		}
		if self.gif.max_memory_mb == 0 {
			return Err(invalid("gif.max_memory_mb", "must be at least 1"));
		}
		if self.gif.max_canvas_dimension == 0 || self.gif.max_canvas_dimension > MAX_CANVAS_DIMENSION {
			return Err(invalid(
				"gif.max_canvas_dimension",
				format_args!("{} is outside 1..={MAX_CANVAS_DIMENSION}", self.gif.max_canvas_dimension),
			));
		}
		if self.gif.min_frame_delay_ms > MAX_FRAME_DELAY_MS {
			return Err(invalid(
				"gif.min_frame_delay_ms",
				format_args!("{} exceeds {MAX_FRAME_DELAY_MS}", self.gif.min_frame_delay_ms),
			));
		}
		Ok(())
	}

	/// GIF decoder limits derived from these settings
	pub fn gif_options(&self) -> GifDecodeOptions {
		GifDecodeOptions::from(&self.gif)
	}

	/// Pushes the pool settings to the global [`FramePool`].
	pub fn apply(&self) {
		let pool = FramePool::global();
		pool.set_capacity(self.pool.capacity);
		pool.set_enabled(self.pool.enabled);
	}

	/// Builds the global palette cache at the configured resolution.
	///
	/// Returns the cache actually in use, which keeps its resolution if it was
	/// built before.
	pub fn init_palette_cache(&self) -> &'static QuantizationCache {
		palette::init_cache_with_bits(self.palette.cache_bits)
	}
}

fn invalid(key: &'static str, message: impl Display) -> SettingsError {
	SettingsError::InvalidValue {
		key,
		message: message.to_string(),
	}
}
