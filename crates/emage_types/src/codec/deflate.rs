//! zlib wrapping of block payloads.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::CodecError;

/// Compresses `data` at the best compression level.
pub(super) fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
	let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 4), Compression::best());
	encoder.write_all(data)?;
	Ok(encoder.finish()?)
}

/// Inflates `data`, which must expand to exactly `expected` bytes.
///
/// Output is read through a limit so a lying header cannot make us allocate
/// more than the stream actually produces.
pub(super) fn decompress(data: &[u8], expected: usize) -> Result<Vec<u8>, CodecError> {
	let mut output = Vec::new();
	ZlibDecoder::new(data).take(expected as u64 + 1).read_to_end(&mut output)?;

	if output.len() != expected {
		return Err(CodecError::Decompression {
			expected,
			actual: output.len(),
		});
	}
	Ok(output)
}
