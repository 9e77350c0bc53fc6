//! GIF decoding into fully composited canvases.
//!
//! A GIF frame is usually only a patch of the logical screen. Decoding keeps a
//! running canvas the size of the logical screen, draws every patch onto it
//! with alpha-over compositing, and emits a full copy of the canvas per frame.
//! Disposal methods are applied after each copy:
//!
//! | Disposal     | Effect on the canvas                                      |
//! |--------------|-----------------------------------------------------------|
//! | `Any`/`Keep` | left as drawn                                             |
//! | `Background` | patch rectangle set to the background colour, or cleared  |
//! | `Previous`   | restored to the snapshot taken before the patch was drawn |
//!
//! Decoding is bounded: it stops after [`GifDecodeOptions::max_frames`] frames
//! or once the estimated decoded size passes the memory budget. Truncation is
//! logged, not reported as an error.

use ::gif::{ColorOutput, DecodeOptions, DisposalMethod};
use image::{Rgba, RgbaImage};
use log::{debug, warn};

use crate::error::GifError;
use crate::frame::{DEFAULT_FRAME_DELAY_MS, MIN_FRAME_DELAY_MS, average_delay};

/// Largest accepted logical screen width or height
pub const MAX_CANVAS_DIMENSION: u16 = 4096;

/// Default frame limit
pub const DEFAULT_MAX_FRAMES: usize = 200;

/// Default decode budget (256 MiB)
pub const DEFAULT_MEMORY_BUDGET: u64 = 256 * 1024 * 1024;

/// Delay used for frames that declare 0 or 1 centiseconds
const UNSET_DELAY_MS: u32 = 50;

/// Bytes per RGBA pixel
const BYTES_PER_PIXEL: u64 = 4;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Resource limits for [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifDecodeOptions {
	/// Stop after this many frames
	pub max_frames: usize,
	/// Upper bound on the estimated decoded size in bytes
	pub memory_budget_bytes: u64,
	/// Reject logical screens wider or taller than this
	pub max_canvas_dimension: u16,
	/// Floor applied to every frame delay in milliseconds
	pub min_frame_delay_ms: u32,
}

impl Default for GifDecodeOptions {
	fn default() -> Self {
		Self {
			max_frames: DEFAULT_MAX_FRAMES,
			memory_budget_bytes: DEFAULT_MEMORY_BUDGET,
			max_canvas_dimension: MAX_CANVAS_DIMENSION,
			min_frame_delay_ms: MIN_FRAME_DELAY_MS,
		}
	}
}

/// A decoded animation: one full canvas per frame.
#[derive(Debug, Clone)]
pub struct GifAnimation {
	/// Logical screen width
	pub width: u32,
	/// Logical screen height
	pub height: u32,
	/// Composited canvases in display order
	pub frames: Vec<RgbaImage>,
	/// Display duration of each frame in milliseconds
	pub delays: Vec<u32>,
}

impl GifAnimation {
	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Returns the rounded mean delay, or the default delay if there are no frames.
	pub fn average_delay(&self) -> u32 {
		if self.delays.is_empty() {
			return DEFAULT_FRAME_DELAY_MS;
		}
		average_delay(&self.delays)
	}

	/// Returns `true` if the GIF has more than one frame.
	pub fn is_animated(&self) -> bool {
		self.frames.len() > 1
	}
}

/// Converts a GIF delay in centiseconds to milliseconds.
///
/// Delays of 0 and 1 are treated as unset, as browsers do.
#[inline]
pub fn delay_ms(centiseconds: u16, min_delay_ms: u32) -> u32 {
	let delay = if centiseconds <= 1 {
		UNSET_DELAY_MS
	} else {
		u32::from(centiseconds) * 10
	};
	delay.max(min_delay_ms)
}

/// Decodes a GIF into composited canvases.
///
/// # Errors
///
/// - [`GifError::CanvasTooLarge`] if the logical screen exceeds the dimension ceiling
/// - [`GifError::CanvasExceedsBudget`] if one canvas would take more than a quarter of the budget
/// - [`GifError::NoFrames`] if nothing could be decoded
/// - [`GifError::Decode`] if the stream is malformed before the first frame
pub fn decode(bytes: &[u8], options: &GifDecodeOptions) -> Result<GifAnimation, GifError> {
	let mut decode_options = DecodeOptions::new();
	decode_options.set_color_output(ColorOutput::RGBA);
	let mut decoder = decode_options.read_info(bytes)?;

	let width = decoder.width();
	let height = decoder.height();
	if width > options.max_canvas_dimension || height > options.max_canvas_dimension {
		return Err(GifError::CanvasTooLarge {
			width,
			height,
			max: options.max_canvas_dimension,
		});
	}
	if width == 0 || height == 0 {
		return Err(GifError::NoFrames);
	}

	let canvas_bytes = u64::from(width) * u64::from(height) * BYTES_PER_PIXEL;
	if canvas_bytes > options.memory_budget_bytes / 4 {
		return Err(GifError::CanvasExceedsBudget {
			required: canvas_bytes,
			budget: options.memory_budget_bytes,
		});
	}

	let background = background_color(decoder.bg_color(), decoder.global_palette());
	let (width, height) = (u32::from(width), u32::from(height));

	let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
	let mut frames = Vec::new();
	let mut delays = Vec::new();
	let mut decoded_bytes = 0u64;

	while frames.len() < options.max_frames {
		let frame = match decoder.read_next_frame() {
			Ok(Some(frame)) => frame,
			Ok(None) => break,
			Err(err) if !frames.is_empty() => {
				warn!("GIF frame {} failed to decode, keeping {} frames: {}", frames.len(), frames.len(), err);
				break;
			}
			Err(err) => return Err(err.into()),
		};

		let patch = Patch {
			left: u32::from(frame.left),
			top: u32::from(frame.top),
			width: u32::from(frame.width),
			height: u32::from(frame.height),
		};

		decoded_bytes += u64::from(patch.width) * u64::from(patch.height) * BYTES_PER_PIXEL + canvas_bytes;
		if decoded_bytes > options.memory_budget_bytes {
			warn!(
				"GIF exceeded decode budget at frame {} ({} MiB), truncating",
				frames.len(),
				decoded_bytes / 1024 / 1024
			);
			break;
		}

		let snapshot = (frame.dispose == DisposalMethod::Previous).then(|| canvas.clone());

		composite(&mut canvas, &frame.buffer, &patch);
		frames.push(canvas.clone());
		delays.push(delay_ms(frame.delay, options.min_frame_delay_ms));

		match frame.dispose {
			DisposalMethod::Background => fill(&mut canvas, &patch, background.unwrap_or(TRANSPARENT)),
			DisposalMethod::Previous => {
				if let Some(snapshot) = snapshot {
					canvas = snapshot;
				}
			}
			DisposalMethod::Any | DisposalMethod::Keep => {}
		}
	}

	if frames.is_empty() {
		return Err(GifError::NoFrames);
	}

	debug!("Decoded GIF {}x{} with {} frames ({} KiB estimated)", width, height, frames.len(), decoded_bytes / 1024);

	Ok(GifAnimation {
		width,
		height,
		frames,
		delays,
	})
}

/// Rectangle of a sub-frame on the logical screen
struct Patch {
	left: u32,
	top: u32,
	width: u32,
	height: u32,
}

fn background_color(index: Option<usize>, palette: Option<&[u8]>) -> Option<Rgba<u8>> {
	let rgb = palette?.get(index? * 3..index? * 3 + 3)?;
	Some(Rgba([rgb[0], rgb[1], rgb[2], 0xFF]))
}

/// Draws an RGBA patch onto the canvas with alpha-over blending.
fn composite(canvas: &mut RgbaImage, rgba: &[u8], patch: &Patch) {
	let (canvas_w, canvas_h) = canvas.dimensions();

	for (i, src) in rgba.chunks_exact(4).enumerate().take((patch.width * patch.height) as usize) {
		let x = patch.left + i as u32 % patch.width;
		let y = patch.top + i as u32 / patch.width;
		if x >= canvas_w || y >= canvas_h {
			continue;
		}

		let src_a = u32::from(src[3]);
		if src_a == 0 {
			continue;
		}
		let dst = canvas.get_pixel_mut(x, y);
		if src_a == 0xFF {
			*dst = Rgba([src[0], src[1], src[2], 0xFF]);
			continue;
		}

		let dst_a = u32::from(dst[3]) * (0xFF - src_a) / 0xFF;
		let out_a = src_a + dst_a;
		for c in 0..3 {
			dst[c] = ((u32::from(src[c]) * src_a + u32::from(dst[c]) * dst_a) / out_a) as u8;
		}
		dst[3] = out_a as u8;
	}
}

fn fill(canvas: &mut RgbaImage, patch: &Patch, color: Rgba<u8>) {
	let (canvas_w, canvas_h) = canvas.dimensions();
	for y in patch.top..(patch.top + patch.height).min(canvas_h) {
		for x in patch.left..(patch.left + patch.width).min(canvas_w) {
			canvas.put_pixel(x, y, color);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::borrow::Cow;

	use ::gif::{Encoder, Frame};

	use super::*;

	const PALETTE: [u8; 12] = [0, 0, 0, 0xFF, 0, 0, 0, 0xFF, 0, 0, 0, 0xFF];
	const BLACK: Rgba<u8> = Rgba([0, 0, 0, 0xFF]);
	const RED: Rgba<u8> = Rgba([0xFF, 0, 0, 0xFF]);
	const GREEN: Rgba<u8> = Rgba([0, 0xFF, 0, 0xFF]);
	const BLUE: Rgba<u8> = Rgba([0, 0, 0xFF, 0xFF]);

	struct SubFrame {
		left: u16,
		top: u16,
		width: u16,
		height: u16,
		index: u8,
		delay: u16,
		dispose: DisposalMethod,
	}

	fn encode(screen_w: u16, screen_h: u16, subframes: &[SubFrame]) -> Vec<u8> {
		let mut bytes = Vec::new();
		{
			let mut encoder = Encoder::new(&mut bytes, screen_w, screen_h, &PALETTE).unwrap();
			for sub in subframes {
				let frame = Frame {
					left: sub.left,
					top: sub.top,
					width: sub.width,
					height: sub.height,
					delay: sub.delay,
					dispose: sub.dispose,
					buffer: Cow::Owned(vec![sub.index; sub.width as usize * sub.height as usize]),
					..Default::default()
				};
				encoder.write_frame(&frame).unwrap();
			}
		}
		bytes
	}

	fn patch(left: u16, top: u16, size: u16, index: u8, delay: u16, dispose: DisposalMethod) -> SubFrame {
		SubFrame {
			left,
			top,
			width: size,
			height: size,
			index,
			delay,
			dispose,
		}
	}

	#[test]
	fn test_delay_conversion() {
		assert_eq!(delay_ms(0, 20), 50);
		assert_eq!(delay_ms(1, 20), 50);
		assert_eq!(delay_ms(2, 20), 20);
		assert_eq!(delay_ms(2, 30), 30);
		assert_eq!(delay_ms(7, 20), 70);
	}

	#[test]
	fn test_composites_onto_logical_screen() {
		let bytes = encode(
			4,
			4,
			&[
				patch(0, 0, 4, 1, 0, DisposalMethod::Keep),
				patch(1, 1, 2, 2, 5, DisposalMethod::Background),
				patch(0, 0, 1, 3, 10, DisposalMethod::Keep),
			],
		);

		let animation = decode(&bytes, &GifDecodeOptions::default()).unwrap();
		assert_eq!((animation.width, animation.height), (4, 4));
		assert_eq!(animation.delays, vec![50, 50, 100]);
		assert!(animation.is_animated());

		let [first, second, third] = &animation.frames[..] else {
			panic!("expected three frames");
		};
		assert!(first.pixels().all(|p| *p == RED));

		assert_eq!(*second.get_pixel(1, 1), GREEN);
		assert_eq!(*second.get_pixel(2, 2), GREEN);
		assert_eq!(*second.get_pixel(0, 0), RED);

		// Background disposal painted the patch with palette entry 0.
		assert_eq!(*third.get_pixel(0, 0), BLUE);
		assert_eq!(*third.get_pixel(1, 1), BLACK);
		assert_eq!(*third.get_pixel(2, 2), BLACK);
		assert_eq!(*third.get_pixel(3, 3), RED);
	}

	#[test]
	fn test_restore_to_previous() {
		let bytes = encode(
			4,
			4,
			&[
				patch(0, 0, 4, 1, 10, DisposalMethod::Keep),
				patch(0, 0, 2, 2, 10, DisposalMethod::Previous),
				patch(3, 3, 1, 3, 10, DisposalMethod::Keep),
			],
		);

		let animation = decode(&bytes, &GifDecodeOptions::default()).unwrap();
		assert_eq!(*animation.frames[1].get_pixel(0, 0), GREEN);
		assert_eq!(*animation.frames[2].get_pixel(0, 0), RED);
		assert_eq!(*animation.frames[2].get_pixel(3, 3), BLUE);
	}

	#[test]
	fn test_max_frames_truncates() {
		let subframes: Vec<_> = (0..5).map(|i| patch(0, 0, 2, i % 4, 10, DisposalMethod::Keep)).collect();
		let bytes = encode(2, 2, &subframes);

		let options = GifDecodeOptions {
			max_frames: 3,
			..Default::default()
		};
		let animation = decode(&bytes, &options).unwrap();
		assert_eq!(animation.frame_count(), 3);
		assert_eq!(animation.delays.len(), 3);
	}

	#[test]
	fn test_budget_truncates_midstream() {
		let bytes = encode(
			4,
			4,
			&[
				patch(0, 0, 4, 1, 10, DisposalMethod::Keep),
				patch(0, 0, 4, 2, 10, DisposalMethod::Keep),
				patch(0, 0, 1, 3, 10, DisposalMethod::Keep),
			],
		);

		// Canvas 64 bytes; frames cost 128, 128 and 68.
		let options = GifDecodeOptions {
			memory_budget_bytes: 300,
			..Default::default()
		};
		let animation = decode(&bytes, &options).unwrap();
		assert_eq!(animation.frame_count(), 2);
	}

	#[test]
	fn test_canvas_limits() {
		let bytes = encode(5000, 10, &[patch(0, 0, 1, 1, 10, DisposalMethod::Keep)]);
		let err = decode(&bytes, &GifDecodeOptions::default()).unwrap_err();
		assert!(matches!(
			err,
			GifError::CanvasTooLarge {
				width: 5000,
				height: 10,
				max: MAX_CANVAS_DIMENSION
			}
		));

		let bytes = encode(16, 16, &[patch(0, 0, 1, 1, 10, DisposalMethod::Keep)]);
		let options = GifDecodeOptions {
			memory_budget_bytes: 1024,
			..Default::default()
		};
		assert!(matches!(
			decode(&bytes, &options),
			Err(GifError::CanvasExceedsBudget {
				required: 1024,
				budget: 1024
			})
		));
	}

	#[test]
	fn test_garbage_is_a_decode_error() {
		let err = decode(b"definitely not a gif", &GifDecodeOptions::default()).unwrap_err();
		assert!(matches!(err, GifError::Decode(_)));
	}

	#[test]
	fn test_average_delay() {
		let animation = GifAnimation {
			width: 1,
			height: 1,
			frames: Vec::new(),
			delays: Vec::new(),
		};
		assert_eq!(animation.average_delay(), DEFAULT_FRAME_DELAY_MS);
	}
}
