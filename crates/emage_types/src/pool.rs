//! Reusable tile buffers.
//!
//! Dithering and decoding produce a lot of short-lived 16 KiB tiles. The
//! [`FramePool`] keeps a bounded free list of them so hot loops do not hit the
//! allocator for every frame.
//!
//! Ownership is explicit: [`FramePool::acquire`] hands out an owned
//! [`IndexedFrame`] and [`FramePool::release`] takes one back. For scratch use,
//! [`FramePool::scoped`] returns a guard that gives the buffer back on drop.

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::frame::{FRAME_SIZE, IndexedFrame};

/// Default number of buffers kept on the free list
pub const DEFAULT_POOL_CAPACITY: usize = 100;

static GLOBAL_POOL: OnceLock<FramePool> = OnceLock::new();

/// A bounded free list of tile buffers.
#[derive(Debug)]
pub struct FramePool {
	available: Mutex<Vec<Box<[u8]>>>,
	capacity: AtomicUsize,
	enabled: AtomicBool,
	total_allocated: AtomicUsize,
}

impl FramePool {
	/// Creates a pool holding at most `capacity` idle buffers.
	pub fn new(capacity: usize) -> Self {
		Self {
			available: Mutex::new(Vec::with_capacity(capacity.min(DEFAULT_POOL_CAPACITY))),
			capacity: AtomicUsize::new(capacity),
			enabled: AtomicBool::new(true),
			total_allocated: AtomicUsize::new(0),
		}
	}

	/// Returns the process-wide pool.
	pub fn global() -> &'static FramePool {
		GLOBAL_POOL.get_or_init(|| FramePool::new(DEFAULT_POOL_CAPACITY))
	}

	/// Acquires a zeroed frame, reusing an idle buffer when one is available.
	pub fn acquire(&self) -> IndexedFrame {
		if self.enabled.load(Ordering::Relaxed)
			&& let Some(buffer) = self.available.lock().pop()
		{
			return IndexedFrame::from_boxed(buffer);
		}

		self.total_allocated.fetch_add(1, Ordering::Relaxed);
		IndexedFrame::blank()
	}

	/// Returns a frame to the pool. Dropped instead if the pool is full or disabled.
	pub fn release(&self, frame: IndexedFrame) {
		if !self.enabled.load(Ordering::Relaxed) {
			return;
		}

		let mut available = self.available.lock();
		if available.len() < self.capacity.load(Ordering::Relaxed) {
			let mut buffer = frame.into_boxed_slice();
			buffer.fill(0);
			available.push(buffer);
		}
	}

	/// Returns every frame of `frames` to the pool.
	pub fn release_all(&self, frames: impl IntoIterator<Item = IndexedFrame>) {
		for frame in frames {
			self.release(frame);
		}
	}

	/// Acquires a frame that goes back to the pool when the guard is dropped.
	pub fn scoped(&self) -> ScopedFrame<'_> {
		ScopedFrame {
			pool: self,
			frame: Some(self.acquire()),
		}
	}

	/// Number of idle buffers.
	pub fn available(&self) -> usize {
		self.available.lock().len()
	}

	/// Number of buffers allocated because the free list was empty.
	pub fn total_allocated(&self) -> usize {
		self.total_allocated.load(Ordering::Relaxed)
	}

	/// Changes the maximum number of idle buffers, trimming the excess.
	pub fn set_capacity(&self, capacity: usize) {
		self.capacity.store(capacity, Ordering::Relaxed);
		self.available.lock().truncate(capacity);
	}

	/// Enables or disables pooling. Disabling also drops idle buffers.
	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::Relaxed);
		if !enabled {
			self.clear();
		}
	}

	/// Returns `true` if buffers are being recycled.
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Relaxed)
	}

	/// Drops all idle buffers.
	pub fn clear(&self) {
		self.available.lock().clear();
	}
}

impl Default for FramePool {
	fn default() -> Self {
		Self::new(DEFAULT_POOL_CAPACITY)
	}
}

/// A pooled frame borrowed for the lifetime of the guard.
pub struct ScopedFrame<'a> {
	pool: &'a FramePool,
	frame: Option<IndexedFrame>,
}

impl ScopedFrame<'_> {
	/// Keeps the frame instead of returning it to the pool.
	pub fn into_inner(mut self) -> IndexedFrame {
		self.frame.take().unwrap_or_default()
	}
}

impl Deref for ScopedFrame<'_> {
	type Target = IndexedFrame;

	fn deref(&self) -> &Self::Target {
		// Only `into_inner` and `drop` take the frame out, both consume the guard.
		self.frame.as_ref().unwrap_or_else(|| unreachable!("scoped frame already taken"))
	}
}

impl DerefMut for ScopedFrame<'_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.frame.as_mut().unwrap_or_else(|| unreachable!("scoped frame already taken"))
	}
}

impl Drop for ScopedFrame<'_> {
	fn drop(&mut self) {
		if let Some(frame) = self.frame.take() {
			self.pool.release(frame);
		}
	}
}
