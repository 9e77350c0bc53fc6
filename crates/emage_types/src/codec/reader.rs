//! Big-endian cursor over a byte slice.

use crate::error::CodecError;

#[derive(Debug, Clone)]
pub(super) struct ByteReader<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> ByteReader<'a> {
	pub(super) fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
		}
	}

	pub(super) fn position(&self) -> usize {
		self.position
	}

	pub(super) fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	pub(super) fn bytes(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
		let end = self.position.checked_add(len).filter(|&end| end <= self.data.len()).ok_or(
			CodecError::InsufficientData {
				expected: self.position.saturating_add(len),
				actual: self.data.len(),
			},
		)?;

		let slice = &self.data[self.position..end];
		self.position = end;
		Ok(slice)
	}

	pub(super) fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.bytes(N)?);
		Ok(out)
	}

	pub(super) fn skip(&mut self, len: usize) -> Result<(), CodecError> {
		self.bytes(len).map(|_| ())
	}

	pub(super) fn u8(&mut self) -> Result<u8, CodecError> {
		Ok(self.array::<1>()?[0])
	}

	pub(super) fn u16(&mut self) -> Result<u16, CodecError> {
		Ok(u16::from_be_bytes(self.array()?))
	}

	pub(super) fn i16(&mut self) -> Result<i16, CodecError> {
		Ok(i16::from_be_bytes(self.array()?))
	}

	pub(super) fn i32(&mut self) -> Result<i32, CodecError> {
		Ok(i32::from_be_bytes(self.array()?))
	}

	pub(super) fn i64(&mut self) -> Result<i64, CodecError> {
		Ok(i64::from_be_bytes(self.array()?))
	}

	/// Reads an `int32` length field, rejecting negative values.
	pub(super) fn length(&mut self) -> Result<usize, CodecError> {
		let offset = self.position;
		let value = self.i32()?;
		usize::try_from(value).map_err(|_| CodecError::CorruptRecord {
			index: offset,
			reason: format!("negative length {value}"),
		})
	}
}
