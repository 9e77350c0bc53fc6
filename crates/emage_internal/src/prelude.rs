//! Prelude module for `emage_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use emage_internal::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Now you can use all common types directly
//! let frame = IndexedFrame::blank();
//! let blob = encode_single(&frame)?;
//! assert_eq!(decode_single(&blob), frame);
//! # Ok(())
//! # }
//! ```

// Re-export everything from emage_types::prelude
#[doc(inline)]
pub use emage_types::prelude::*;

// Re-export the entire emage_types module for advanced usage
#[doc(inline)]
pub use emage_types;
