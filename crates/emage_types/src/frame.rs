//! Indexed frames and animated cells.
//!
//! An [`IndexedFrame`] is one 128×128 tile where every byte is an index into the
//! global palette. An [`AnimatedCell`] is a fixed-length run of such frames with
//! per-frame display durations.

use std::fmt;

use crate::error::FrameError;

/// Width and height of a tile in pixels
pub const FRAME_WIDTH: usize = 128;

/// Number of pixels (and bytes) in a tile
pub const FRAME_SIZE: usize = FRAME_WIDTH * FRAME_WIDTH;

/// Shortest display duration a frame may have, in milliseconds
pub const MIN_FRAME_DELAY_MS: u32 = 20;

/// Longest display duration a frame may have, in milliseconds.
///
/// Grid headers store each delay as a signed 16-bit offset from the average,
/// so delays are kept within `i16` range.
pub const MAX_FRAME_DELAY_MS: u32 = i16::MAX as u32;

/// Average delay used when no delays are known
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// One 128×128 tile of palette indices.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IndexedFrame {
	pixels: Box<[u8]>,
}

impl IndexedFrame {
	/// Creates a fully transparent frame (all index 0).
	pub fn blank() -> Self {
		Self {
			pixels: vec![0u8; FRAME_SIZE].into_boxed_slice(),
		}
	}

	/// Creates a frame filled with a single palette index.
	pub fn filled(index: u8) -> Self {
		Self {
			pixels: vec![index; FRAME_SIZE].into_boxed_slice(),
		}
	}

	/// Wraps an owned buffer; it must be exactly [`FRAME_SIZE`] bytes.
	pub fn from_vec(pixels: Vec<u8>) -> Result<Self, FrameError> {
		if pixels.len() != FRAME_SIZE {
			return Err(FrameError::InvalidSize {
				expected: FRAME_SIZE,
				actual: pixels.len(),
			});
		}

		Ok(Self {
			pixels: pixels.into_boxed_slice(),
		})
	}

	/// Copies a borrowed buffer; it must be exactly [`FRAME_SIZE`] bytes.
	pub fn from_slice(pixels: &[u8]) -> Result<Self, FrameError> {
		Self::from_vec(pixels.to_vec())
	}

	pub(crate) fn from_boxed(pixels: Box<[u8]>) -> Self {
		debug_assert_eq!(pixels.len(), FRAME_SIZE);
		Self {
			pixels,
		}
	}

	/// Returns the palette indices in row-major order.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns the palette indices mutably.
	#[inline]
	pub fn as_bytes_mut(&mut self) -> &mut [u8] {
		&mut self.pixels
	}

	/// Returns the palette index at `(x, y)`.
	#[inline]
	pub fn get(&self, x: usize, y: usize) -> u8 {
		self.pixels[y * FRAME_WIDTH + x]
	}

	/// Sets the palette index at `(x, y)`.
	#[inline]
	pub fn set(&mut self, x: usize, y: usize, index: u8) {
		self.pixels[y * FRAME_WIDTH + x] = index;
	}

	/// Resets every pixel to transparent.
	pub fn clear(&mut self) {
		self.pixels.fill(0);
	}

	/// Counts the pixels that differ from `other`.
	pub fn count_differences(&self, other: &IndexedFrame) -> usize {
		self.pixels.iter().zip(other.pixels.iter()).filter(|(a, b)| a != b).count()
	}

	/// Consumes the frame and returns the underlying buffer.
	pub fn into_boxed_slice(self) -> Box<[u8]> {
		self.pixels
	}
}

impl Default for IndexedFrame {
	fn default() -> Self {
		Self::blank()
	}
}

impl AsRef<[u8]> for IndexedFrame {
	fn as_ref(&self) -> &[u8] {
		&self.pixels
	}
}

impl TryFrom<Vec<u8>> for IndexedFrame {
	type Error = FrameError;

	fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
		Self::from_vec(value)
	}
}

impl fmt::Debug for IndexedFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let transparent = self.pixels.iter().filter(|&&p| p < 4).count();
		f.debug_struct("IndexedFrame")
			.field("size", &self.pixels.len())
			.field("transparent", &transparent)
			.finish()
	}
}

/// Clamps a display duration to the accepted range.
#[inline]
pub fn clamp_delay(delay_ms: u32) -> u32 {
	delay_ms.clamp(MIN_FRAME_DELAY_MS, MAX_FRAME_DELAY_MS)
}

/// Returns the rounded mean of `delays`, or [`DEFAULT_FRAME_DELAY_MS`] when empty.
pub fn average_delay(delays: &[u32]) -> u32 {
	if delays.is_empty() {
		return DEFAULT_FRAME_DELAY_MS;
	}

	let sum: u64 = delays.iter().map(|&d| u64::from(d)).sum();
	let count = delays.len() as u64;
	((sum + count / 2) / count) as u32
}

/// An animated tile: frames plus their display durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedCell {
	frames: Vec<IndexedFrame>,
	delays: Vec<u32>,
	average_delay: u32,
}

impl AnimatedCell {
	/// Creates a new cell.
	///
	/// Delays are clamped to
	/// [`MIN_FRAME_DELAY_MS`]..=[`MAX_FRAME_DELAY_MS`]; missing delays take the
	/// average of the supplied ones and surplus delays are dropped.
	pub fn new(frames: Vec<IndexedFrame>, delays: Vec<u32>) -> Self {
		let mut delays: Vec<u32> = delays.into_iter().take(frames.len()).map(clamp_delay).collect();
		let fill = clamp_delay(average_delay(&delays));
		delays.resize(frames.len(), fill);

		let average_delay = average_delay(&delays);
		Self {
			frames,
			delays,
			average_delay,
		}
	}

	/// Returns the frames.
	pub fn frames(&self) -> &[IndexedFrame] {
		&self.frames
	}

	/// Returns the per-frame delays in milliseconds.
	pub fn delays(&self) -> &[u32] {
		&self.delays
	}

	/// Returns the rounded mean delay in milliseconds.
	pub fn average_delay(&self) -> u32 {
		self.average_delay
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Returns the total playback duration of one loop in milliseconds.
	pub fn duration_ms(&self) -> u64 {
		self.delays.iter().map(|&d| u64::from(d)).sum()
	}

	/// Returns the frame shown `elapsed_ms` into a looping playback.
	pub fn frame_at(&self, elapsed_ms: u64) -> Option<&IndexedFrame> {
		let total = self.duration_ms();
		if total == 0 {
			return self.frames.first();
		}

		let mut remaining = elapsed_ms % total;
		for (frame, &delay) in self.frames.iter().zip(&self.delays) {
			if remaining < u64::from(delay) {
				return Some(frame);
			}
			remaining -= u64::from(delay);
		}
		self.frames.last()
	}

	/// Consumes the cell and returns its frames and delays.
	pub fn into_parts(self) -> (Vec<IndexedFrame>, Vec<u32>) {
		(self.frames, self.delays)
	}
}
