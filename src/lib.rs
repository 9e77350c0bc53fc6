#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `emage-rs` turns arbitrary images and animated GIFs into 128×128 palette-indexed
//! tiles and stores whole grids of them in a compact, self-describing binary form.
//!
//! The heavy lifting lives in `emage_types`:
//!
//! - **palette**: perceptual (CIEDE2000) nearest-colour matching with a quantization cache
//! - **dither**: ordered, Floyd–Steinberg and Jarvis–Judice–Ninke dithering in linear light
//! - **gif**: GIF decoding into fully composited canvases
//! - **codec**: the `EM1` / `EGS` / `EGA` frame and grid formats
//!
pub use emage_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use emage_dylib;
